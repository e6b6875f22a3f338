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

//! The consumer side of the sampling pipeline.

use crate::sample::Sample;

/// A destination for captured samples.
///
/// Sinks receive samples from a sampler's worker thread while readers may
/// be inspecting them from other threads, so implementations must be safe
/// for concurrent use.
pub trait SampleSink<T>: Send + Sync + 'static {
    /// Accepts one captured sample.
    fn accept(&self, sample: Sample<T>);
}

/// A sink that discards every sample it receives.
///
/// Useful when a metric should be ticked without retaining history, and as
/// a stand-in sink in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl<T> SampleSink<T> for NullSink
where
    T: 'static,
{
    fn accept(&self, _sample: Sample<T>) {}
}
