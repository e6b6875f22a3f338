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

//! Explicit-registration directory of named metrics.

use std::sync::{Arc, Mutex};

use pulse_core::NamedMetric;

/// A thread-safe directory of named metrics for discovery tooling.
///
/// Registration is the only way in; nothing is scanned or inferred.
/// Discovery code enumerates registered metrics and reads their metadata
/// and current value through the capability accessors, from any thread.
#[derive(Debug, Clone)]
pub struct MetricRegistry<T> {
    metrics: Arc<Mutex<Vec<Arc<NamedMetric<T>>>>>,
}

impl<T> MetricRegistry<T> {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self {
            metrics: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Registers a metric for discovery.
    pub fn register(&self, metric: Arc<NamedMetric<T>>) {
        let mut metrics = self.metrics.lock().unwrap();
        log::info!("registered metric `{}`", metric.name());
        metrics.push(metric);
    }

    /// All registered metrics, in registration order.
    pub fn all(&self) -> Vec<Arc<NamedMetric<T>>> {
        self.metrics.lock().unwrap().clone()
    }

    /// The first registered metric with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<Arc<NamedMetric<T>>> {
        self.metrics
            .lock()
            .unwrap()
            .iter()
            .find(|metric| metric.name() == name)
            .cloned()
    }

    /// Every registered metric carrying the given tag.
    pub fn with_tag(&self, tag: &str) -> Vec<Arc<NamedMetric<T>>> {
        self.metrics
            .lock()
            .unwrap()
            .iter()
            .filter(|metric| metric.tags().contains(tag))
            .cloned()
            .collect()
    }

    /// Number of registered metrics.
    pub fn len(&self) -> usize {
        self.metrics.lock().unwrap().len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for MetricRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
