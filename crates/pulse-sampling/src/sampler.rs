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

//! Periodic capture of a metric source into a sink.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pulse_core::{MetricSource, Sample, SampleSink, SamplingError, SamplingResult};

use crate::scheduler::{PeriodicScheduler, TaskId};

/// Lifecycle state of a [`Sampler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerState {
    /// Constructed but never started.
    Created,
    /// The periodic task is scheduled.
    Running,
    /// The periodic task is cancelled; the sampler can be started again.
    Stopped,
    /// Terminal state; no further transitions are valid.
    ShutDown,
}

struct Lifecycle {
    state: SamplerState,
    task: Option<TaskId>,
}

/// Periodically reads a metric source and forwards timestamped samples to
/// a sink.
///
/// The execution engine is either created internally and exclusively owned
/// ([`Sampler::new`]) or supplied by the caller and merely borrowed
/// ([`Sampler::with_scheduler`]); which of the two is recorded at
/// construction and never changes. A borrowed engine's lifecycle belongs
/// to its owner: [`shutdown`](Self::shutdown) refuses to touch it, while
/// [`stop`](Self::stop) only ever cancels the sampler's own task and is
/// legal in both modes.
///
/// A failing read during a tick is logged and discarded; it never escapes
/// the periodic callback, so one bad reading cannot cancel the schedule.
pub struct Sampler<T> {
    period: Duration,
    metric: Arc<dyn MetricSource<T>>,
    sink: Arc<dyn SampleSink<T>>,
    scheduler: Arc<PeriodicScheduler>,
    owns_scheduler: bool,
    lifecycle: Mutex<Lifecycle>,
}

impl<T: 'static> Sampler<T> {
    /// Creates a sampler with its own dedicated execution engine.
    ///
    /// Fails with [`SamplingError::InvalidConfiguration`] for a zero
    /// period.
    pub fn new(
        period: Duration,
        metric: Arc<dyn MetricSource<T>>,
        sink: Arc<dyn SampleSink<T>>,
    ) -> SamplingResult<Self> {
        validate_period(period)?;
        Ok(Self::assemble(
            Arc::new(PeriodicScheduler::new()),
            true,
            period,
            metric,
            sink,
        ))
    }

    /// Creates a sampler that schedules on a caller-supplied engine.
    ///
    /// The sampler never terminates a borrowed engine; its
    /// [`shutdown`](Self::shutdown) fails instead. Fails with
    /// [`SamplingError::InvalidConfiguration`] for a zero period.
    pub fn with_scheduler(
        scheduler: Arc<PeriodicScheduler>,
        period: Duration,
        metric: Arc<dyn MetricSource<T>>,
        sink: Arc<dyn SampleSink<T>>,
    ) -> SamplingResult<Self> {
        validate_period(period)?;
        Ok(Self::assemble(scheduler, false, period, metric, sink))
    }

    fn assemble(
        scheduler: Arc<PeriodicScheduler>,
        owns_scheduler: bool,
        period: Duration,
        metric: Arc<dyn MetricSource<T>>,
        sink: Arc<dyn SampleSink<T>>,
    ) -> Self {
        Self {
            period,
            metric,
            sink,
            scheduler,
            owns_scheduler,
            lifecycle: Mutex::new(Lifecycle {
                state: SamplerState::Created,
                task: None,
            }),
        }
    }

    /// Schedules the fixed-period sampling task.
    ///
    /// Idempotent while running; legal again after [`stop`](Self::stop).
    /// Fails with [`SamplingError::IllegalState`] after
    /// [`shutdown`](Self::shutdown).
    pub fn start(&self) -> SamplingResult<()> {
        let mut lifecycle = self.lifecycle.lock().unwrap();
        match lifecycle.state {
            SamplerState::Running => Ok(()),
            SamplerState::ShutDown => Err(SamplingError::IllegalState(
                "cannot start a sampler after shutdown".to_string(),
            )),
            SamplerState::Created | SamplerState::Stopped => {
                let metric = Arc::clone(&self.metric);
                let sink = Arc::clone(&self.sink);
                let task = self.scheduler.schedule(self.period, move || {
                    // A failing read must not escape the periodic callback:
                    // an escaping failure would cancel every future tick.
                    match metric.value() {
                        Ok(value) => sink.accept(Sample::now(value)),
                        Err(err) => log::debug!("sample discarded: {err}"),
                    }
                })?;
                lifecycle.task = Some(task);
                lifecycle.state = SamplerState::Running;
                log::debug!("sampler started with period {:?}", self.period);
                Ok(())
            }
        }
    }

    /// Cancels the sampling task; an in-flight tick is allowed to finish.
    ///
    /// Archived samples in the sink are untouched, and the execution
    /// engine itself is never stopped. Safe no-op when not running; fails
    /// with [`SamplingError::IllegalState`] after
    /// [`shutdown`](Self::shutdown).
    pub fn stop(&self) -> SamplingResult<()> {
        let mut lifecycle = self.lifecycle.lock().unwrap();
        match lifecycle.state {
            SamplerState::ShutDown => Err(SamplingError::IllegalState(
                "cannot stop a sampler after shutdown".to_string(),
            )),
            SamplerState::Created | SamplerState::Stopped => Ok(()),
            SamplerState::Running => {
                if let Some(task) = lifecycle.task.take() {
                    self.scheduler.cancel(task);
                }
                lifecycle.state = SamplerState::Stopped;
                log::debug!("sampler stopped");
                Ok(())
            }
        }
    }

    /// Cancels any active task, terminates the owned engine, and moves to
    /// the terminal [`SamplerState::ShutDown`] state.
    ///
    /// On a borrowed engine this fails with
    /// [`SamplingError::IllegalState`] and performs no destructive action:
    /// the engine's lifecycle belongs to its owner. Shutting down a
    /// never-started sampler is valid and simply releases the unused
    /// engine.
    pub fn shutdown(&self) -> SamplingResult<()> {
        let mut lifecycle = self.lifecycle.lock().unwrap();
        if !self.owns_scheduler {
            return Err(SamplingError::IllegalState(
                "cannot shut down a borrowed scheduler; stop the sampler and let the \
                 scheduler's owner terminate it"
                    .to_string(),
            ));
        }
        if let Some(task) = lifecycle.task.take() {
            self.scheduler.cancel(task);
        }
        lifecycle.state = SamplerState::ShutDown;
        drop(lifecycle);
        self.scheduler.shutdown();
        log::debug!("sampler shut down");
        Ok(())
    }

    /// The current lifecycle state.
    pub fn state(&self) -> SamplerState {
        self.lifecycle.lock().unwrap().state
    }
}

impl<T> Drop for Sampler<T> {
    fn drop(&mut self) {
        if let Ok(lifecycle) = self.lifecycle.get_mut() {
            if let Some(task) = lifecycle.task.take() {
                self.scheduler.cancel(task);
            }
        }
        if self.owns_scheduler {
            self.scheduler.shutdown();
        }
    }
}

impl<T> fmt::Debug for Sampler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sampler")
            .field("period", &self.period)
            .field("owns_scheduler", &self.owns_scheduler)
            .field("state", &self.lifecycle.lock().unwrap().state)
            .finish_non_exhaustive()
    }
}

fn validate_period(period: Duration) -> SamplingResult<()> {
    if period.is_zero() {
        return Err(SamplingError::InvalidConfiguration(
            "sampling period must be positive".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::SampleHistory;
    use pulse_core::NullSink;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    struct Constant(f64);

    impl MetricSource<f64> for Constant {
        fn value(&self) -> SamplingResult<f64> {
            Ok(self.0)
        }
    }

    /// A source that must never be read.
    struct Unreadable;

    impl MetricSource<f64> for Unreadable {
        fn value(&self) -> SamplingResult<f64> {
            unreachable!("source must not be read")
        }
    }

    /// Fails every other read.
    struct Flaky {
        calls: AtomicUsize,
    }

    impl MetricSource<f64> for Flaky {
        fn value(&self) -> SamplingResult<f64> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call % 2 == 0 {
                Err(SamplingError::source_failure("intermittent"))
            } else {
                Ok(call as f64)
            }
        }
    }

    fn constant(value: f64) -> Arc<dyn MetricSource<f64>> {
        Arc::new(Constant(value))
    }

    fn null_sink() -> Arc<dyn SampleSink<f64>> {
        Arc::new(NullSink)
    }

    fn history(capacity: usize) -> Arc<SampleHistory<f64>> {
        Arc::new(SampleHistory::new(capacity).unwrap())
    }

    #[test]
    fn test_unstarted_sampler_shuts_down_cleanly() {
        let sampler = Sampler::new(
            Duration::from_millis(1),
            Arc::new(Unreadable) as Arc<dyn MetricSource<f64>>,
            null_sink(),
        )
        .unwrap();

        sampler.shutdown().unwrap();
        assert_eq!(sampler.state(), SamplerState::ShutDown);
    }

    #[test]
    fn test_shutdown_of_borrowed_scheduler_is_rejected() {
        let scheduler = Arc::new(PeriodicScheduler::new());
        let sampler = Sampler::with_scheduler(
            Arc::clone(&scheduler),
            Duration::from_millis(1),
            constant(1.0),
            null_sink(),
        )
        .unwrap();

        let result = sampler.shutdown();
        assert!(matches!(result, Err(SamplingError::IllegalState(_))));

        // The borrowed engine must remain usable afterwards.
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        scheduler
            .schedule(Duration::from_millis(10), move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        thread::sleep(Duration::from_millis(100));
        assert!(ticks.load(Ordering::SeqCst) >= 1);

        scheduler.shutdown();
    }

    #[test]
    fn test_long_period_sampler_produces_nothing() {
        let archive = history(1);
        let sampler = Sampler::new(
            Duration::from_secs(3600),
            Arc::new(Unreadable) as Arc<dyn MetricSource<f64>>,
            Arc::clone(&archive) as Arc<dyn SampleSink<f64>>,
        )
        .unwrap();

        sampler.start().unwrap();
        thread::sleep(Duration::from_millis(200));
        assert!(archive.is_empty());
        sampler.shutdown().unwrap();
    }

    #[test]
    fn test_short_period_sampler_fills_history() {
        let archive = history(20);
        let sampler = Sampler::new(
            Duration::from_millis(50),
            constant(1.0),
            Arc::clone(&archive) as Arc<dyn SampleSink<f64>>,
        )
        .unwrap();

        sampler.start().unwrap();
        thread::sleep(Duration::from_millis(700));
        sampler.shutdown().unwrap();

        let samples = archive.snapshot();
        assert!(samples.len() >= 3);
        assert!(samples.len() <= 20);
        assert!(samples
            .windows(2)
            .all(|pair| pair[0].timestamp() <= pair[1].timestamp()));
    }

    #[test]
    fn test_stopping_and_starting_preserves_history() {
        let archive = history(20);
        let sampler = Sampler::new(
            Duration::from_millis(50),
            constant(1.0),
            Arc::clone(&archive) as Arc<dyn SampleSink<f64>>,
        )
        .unwrap();

        sampler.start().unwrap();
        thread::sleep(Duration::from_millis(300));
        sampler.stop().unwrap();
        thread::sleep(Duration::from_millis(100));

        let archived = archive.len();
        assert!(archived >= 1);

        thread::sleep(Duration::from_millis(300));
        assert_eq!(archive.len(), archived);

        sampler.start().unwrap();
        thread::sleep(Duration::from_millis(300));
        assert!(archive.len() > archived);

        sampler.shutdown().unwrap();
    }

    #[test]
    fn test_start_is_idempotent_while_running() {
        let sampler = Sampler::new(Duration::from_millis(500), constant(1.0), null_sink()).unwrap();
        sampler.start().unwrap();
        sampler.start().unwrap();
        assert_eq!(sampler.state(), SamplerState::Running);
        sampler.shutdown().unwrap();
    }

    #[test]
    fn test_stop_before_start_is_a_noop() {
        let sampler = Sampler::new(Duration::from_millis(500), constant(1.0), null_sink()).unwrap();
        sampler.stop().unwrap();
        assert_eq!(sampler.state(), SamplerState::Created);
        sampler.shutdown().unwrap();
    }

    #[test]
    fn test_lifecycle_calls_rejected_after_shutdown() {
        let sampler = Sampler::new(Duration::from_millis(500), constant(1.0), null_sink()).unwrap();
        sampler.shutdown().unwrap();

        assert!(matches!(
            sampler.start(),
            Err(SamplingError::IllegalState(_))
        ));
        assert!(matches!(
            sampler.stop(),
            Err(SamplingError::IllegalState(_))
        ));
    }

    #[test]
    fn test_read_failures_do_not_cancel_sampling() {
        let archive = history(50);
        let sampler = Sampler::new(
            Duration::from_millis(20),
            Arc::new(Flaky {
                calls: AtomicUsize::new(0),
            }) as Arc<dyn MetricSource<f64>>,
            Arc::clone(&archive) as Arc<dyn SampleSink<f64>>,
        )
        .unwrap();

        sampler.start().unwrap();
        thread::sleep(Duration::from_millis(400));
        sampler.shutdown().unwrap();

        // Every other tick fails; successes keep arriving regardless.
        assert!(archive.len() >= 2);
    }

    #[test]
    fn test_zero_period_is_rejected() {
        let owned = Sampler::new(Duration::ZERO, constant(1.0), null_sink());
        assert!(matches!(
            owned,
            Err(SamplingError::InvalidConfiguration(_))
        ));

        let scheduler = Arc::new(PeriodicScheduler::new());
        let borrowed =
            Sampler::with_scheduler(Arc::clone(&scheduler), Duration::ZERO, constant(1.0), null_sink());
        assert!(matches!(
            borrowed,
            Err(SamplingError::InvalidConfiguration(_))
        ));
        scheduler.shutdown();
    }
}
