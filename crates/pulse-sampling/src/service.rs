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

//! Service coupling a metric registry with periodic sampling.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pulse_core::{MetricSource, NamedMetric, Sample, SampleSink, SamplingError, SamplingResult};

use crate::history::SampleHistory;
use crate::registry::MetricRegistry;
use crate::sampler::Sampler;
use crate::scheduler::PeriodicScheduler;

struct ServiceEntry {
    name: String,
    sampler: Sampler<f64>,
    history: Arc<SampleHistory<f64>>,
}

/// Samples every registered metric into a per-metric bounded history.
///
/// The service owns a single scheduler shared by all of its samplers; the
/// samplers borrow it, so tearing the engine down is the service's
/// decision alone ([`shutdown`](Self::shutdown)). Registered metrics are
/// also published through a [`MetricRegistry`] for discovery tooling.
pub struct SamplingService {
    scheduler: Arc<PeriodicScheduler>,
    registry: MetricRegistry<f64>,
    entries: Mutex<Vec<ServiceEntry>>,
    period: Duration,
    history_capacity: usize,
}

impl SamplingService {
    /// Creates a service sampling every `period` and retaining
    /// `history_capacity` samples per metric.
    ///
    /// Fails with [`SamplingError::InvalidConfiguration`] for a zero
    /// period or capacity.
    pub fn new(period: Duration, history_capacity: usize) -> SamplingResult<Self> {
        if period.is_zero() {
            return Err(SamplingError::InvalidConfiguration(
                "sampling period must be positive".to_string(),
            ));
        }
        if history_capacity == 0 {
            return Err(SamplingError::InvalidConfiguration(
                "history capacity must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            scheduler: Arc::new(PeriodicScheduler::new()),
            registry: MetricRegistry::new(),
            entries: Mutex::new(Vec::new()),
            period,
            history_capacity,
        })
    }

    /// Registers a metric and returns the history its samples land in.
    ///
    /// Sampling begins with the next [`start_all`](Self::start_all). Fails
    /// with [`SamplingError::IllegalState`] once the service has shut
    /// down.
    pub fn register(&self, metric: NamedMetric<f64>) -> SamplingResult<Arc<SampleHistory<f64>>> {
        if self.scheduler.is_shut_down() {
            return Err(SamplingError::IllegalState(
                "cannot register a metric after the service has shut down".to_string(),
            ));
        }
        let metric = Arc::new(metric);
        let history = Arc::new(SampleHistory::new(self.history_capacity)?);
        let sampler = Sampler::with_scheduler(
            Arc::clone(&self.scheduler),
            self.period,
            Arc::clone(&metric) as Arc<dyn MetricSource<f64>>,
            Arc::clone(&history) as Arc<dyn SampleSink<f64>>,
        )?;

        self.registry.register(Arc::clone(&metric));
        let mut entries = self.entries.lock().unwrap();
        entries.push(ServiceEntry {
            name: metric.name().to_string(),
            sampler,
            history: Arc::clone(&history),
        });
        Ok(history)
    }

    /// Starts sampling every registered metric. Idempotent for metrics
    /// already being sampled.
    pub fn start_all(&self) -> SamplingResult<()> {
        let entries = self.entries.lock().unwrap();
        for entry in entries.iter() {
            entry.sampler.start()?;
        }
        Ok(())
    }

    /// Stops sampling every registered metric; archived samples are
    /// preserved.
    pub fn stop_all(&self) -> SamplingResult<()> {
        let entries = self.entries.lock().unwrap();
        for entry in entries.iter() {
            entry.sampler.stop()?;
        }
        Ok(())
    }

    /// Snapshot of the named metric's history, if such a metric is
    /// registered.
    pub fn snapshot(&self, name: &str) -> Option<Vec<Sample<f64>>> {
        let entries = self.entries.lock().unwrap();
        entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.history.snapshot())
    }

    /// The discovery registry for this service's metrics.
    pub fn registry(&self) -> &MetricRegistry<f64> {
        &self.registry
    }

    /// Stops every sampler and terminates the shared scheduler. Terminal.
    pub fn shutdown(&self) {
        let entries = self.entries.lock().unwrap();
        for entry in entries.iter() {
            let _ = entry.sampler.stop();
        }
        drop(entries);
        self.scheduler.shutdown();
        log::debug!("sampling service shut down");
    }
}

impl fmt::Debug for SamplingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SamplingService")
            .field("period", &self.period)
            .field("history_capacity", &self.history_capacity)
            .field("metrics", &self.registry.len())
            .finish_non_exhaustive()
    }
}
