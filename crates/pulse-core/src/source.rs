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

//! The "read a value on demand" capability.

use crate::error::SamplingResult;

/// A measurement that can be produced on demand.
///
/// Implementations are polled from a sampling worker thread, so they must
/// be shareable across threads. A reading that cannot be produced is
/// reported through the `Err` arm rather than by panicking; reading must
/// have no side effects beyond the measurement itself.
pub trait MetricSource<T>: Send + Sync + 'static {
    /// Returns the current reading.
    fn value(&self) -> SamplingResult<T>;
}
