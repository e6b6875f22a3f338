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

//! Timestamped sample values.

use std::time::Instant;

/// A single captured reading paired with the instant it was taken.
///
/// Samples are immutable once created; one is produced per successful tick
/// of a sampler.
#[derive(Debug, Clone)]
pub struct Sample<T> {
    timestamp: Instant,
    value: T,
}

impl<T> Sample<T> {
    /// Creates a sample with an explicit timestamp.
    pub fn new(timestamp: Instant, value: T) -> Self {
        Self { timestamp, value }
    }

    /// Creates a sample timestamped with the current instant.
    pub fn now(value: T) -> Self {
        Self::new(Instant::now(), value)
    }

    /// The instant the reading was taken.
    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    /// The captured value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Consumes the sample, returning the captured value.
    pub fn into_value(self) -> T {
        self.value
    }
}
