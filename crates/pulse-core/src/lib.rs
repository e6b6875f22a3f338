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

//! # Pulse Core
//!
//! Foundational crate containing the traits, data types, and error
//! contracts for the periodic sampling facility.
//!
//! This crate defines the "common language" of the facility: what a metric
//! source is, what a captured sample looks like, where samples go, and how
//! failures are reported. The `pulse-sampling` crate provides the engine
//! that drives these contracts at a fixed period.

#![warn(missing_docs)]

pub mod error;
pub mod metadata;
pub mod metric;
pub mod sample;
pub mod sink;
pub mod source;

pub use error::{SamplingError, SamplingResult};
pub use metadata::{HasProperties, Named, Tagged};
pub use metric::NamedMetric;
pub use sample::Sample;
pub use sink::{NullSink, SampleSink};
pub use source::MetricSource;
