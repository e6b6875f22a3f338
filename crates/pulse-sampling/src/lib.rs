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

//! # Pulse Sampling
//!
//! The periodic sampling engine, bounded sample history, and metric
//! discovery registry built on the contracts in `pulse-core`.
//!
//! The flow: a [`Sampler`] ticks on a [`PeriodicScheduler`], reads its
//! metric source, and forwards timestamped samples to a sink — by default
//! a [`SampleHistory`] that monitoring code snapshots later. The
//! [`SamplingService`] facade wires a whole registry of named metrics
//! through one shared scheduler.

#![warn(missing_docs)]

pub mod history;
pub mod registry;
pub mod sampler;
pub mod scheduler;
pub mod service;

pub use history::SampleHistory;
pub use registry::MetricRegistry;
pub use sampler::{Sampler, SamplerState};
pub use scheduler::{PeriodicScheduler, TaskId};
pub use service::SamplingService;
