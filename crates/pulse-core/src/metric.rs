// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A metric source decorated with immutable descriptive metadata.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{SamplingError, SamplingResult};
use crate::metadata::{HasProperties, Named, Tagged};
use crate::source::MetricSource;

/// Wraps a [`MetricSource`] with a name, tags, and opaque properties.
///
/// The metadata is captured at construction and exposed read-only for
/// discovery tooling; the wrapped source's identity is fixed for the
/// metric's lifetime. Reading the value delegates to the source and
/// converts any failure into [`SamplingError::ReadFailure`] carrying the
/// metric name and the original cause, so callers never have to know the
/// source's native failure shape.
pub struct NamedMetric<T> {
    name: String,
    tags: HashSet<String>,
    properties: HashMap<String, Value>,
    source: Arc<dyn MetricSource<T>>,
}

impl<T> NamedMetric<T> {
    /// Creates a named metric over the given source.
    pub fn new(
        name: impl Into<String>,
        tags: HashSet<String>,
        properties: HashMap<String, Value>,
        source: Arc<dyn MetricSource<T>>,
    ) -> Self {
        Self {
            name: name.into(),
            tags,
            properties,
            source,
        }
    }

    /// The metric name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The tag set attached at construction.
    pub fn tags(&self) -> &HashSet<String> {
        &self.tags
    }

    /// The property map attached at construction.
    pub fn properties(&self) -> &HashMap<String, Value> {
        &self.properties
    }
}

impl<T> Named for NamedMetric<T> {
    fn name(&self) -> &str {
        &self.name
    }
}

impl<T> Tagged for NamedMetric<T> {
    fn tags(&self) -> &HashSet<String> {
        &self.tags
    }
}

impl<T> HasProperties for NamedMetric<T> {
    fn properties(&self) -> &HashMap<String, Value> {
        &self.properties
    }
}

impl<T: 'static> MetricSource<T> for NamedMetric<T> {
    fn value(&self) -> SamplingResult<T> {
        self.source.value().map_err(|err| {
            let cause = match err {
                SamplingError::SourceFailure(inner) => inner,
                other => Box::new(other) as Box<dyn std::error::Error + Send + Sync>,
            };
            SamplingError::ReadFailure {
                metric: self.name.clone(),
                cause,
            }
        })
    }
}

impl<T> fmt::Debug for NamedMetric<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedMetric")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .field("properties", &self.properties)
            .finish_non_exhaustive()
    }
}
