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

//! A periodic-execution engine backed by a single dedicated worker thread.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use pulse_core::{SamplingError, SamplingResult};

/// Identifies a repeating task registered with a [`PeriodicScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

enum Command {
    Schedule(ScheduledTask),
    Cancel(TaskId),
    Shutdown,
}

struct ScheduledTask {
    id: TaskId,
    period: Duration,
    next_run: Instant,
    run: Box<dyn FnMut() + Send>,
}

/// Drives any number of fixed-period repeating tasks on one worker thread.
///
/// The single worker serializes execution, so a slow task delays — never
/// overlaps — later runs. A task's first run happens one full period after
/// it is scheduled. A task that falls behind runs once immediately and then
/// realigns to its period; there are no catch-up bursts.
///
/// A panicking task is caught at the worker boundary, logged, and removed
/// from the schedule; the worker and every other task keep running.
#[derive(Debug)]
pub struct PeriodicScheduler {
    commands: Sender<Command>,
    worker: Mutex<Option<JoinHandle<()>>>,
    next_id: AtomicU64,
    shut_down: AtomicBool,
}

impl PeriodicScheduler {
    /// Creates a scheduler and spawns its worker thread.
    pub fn new() -> Self {
        let (commands, inbox) = crossbeam_channel::unbounded();
        let worker = thread::spawn(move || run_worker(inbox));
        Self {
            commands,
            worker: Mutex::new(Some(worker)),
            next_id: AtomicU64::new(0),
            shut_down: AtomicBool::new(false),
        }
    }

    /// Registers a repeating task executed every `period`.
    ///
    /// The first run happens one full period from now. Fails with
    /// [`SamplingError::InvalidConfiguration`] for a zero period, and with
    /// [`SamplingError::IllegalState`] once the scheduler has shut down.
    pub fn schedule<F>(&self, period: Duration, run: F) -> SamplingResult<TaskId>
    where
        F: FnMut() + Send + 'static,
    {
        if period.is_zero() {
            return Err(SamplingError::InvalidConfiguration(
                "scheduling period must be positive".to_string(),
            ));
        }
        if self.shut_down.load(Ordering::SeqCst) {
            return Err(SamplingError::IllegalState(
                "cannot schedule a task on a scheduler that has shut down".to_string(),
            ));
        }
        let id = TaskId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let task = ScheduledTask {
            id,
            period,
            next_run: Instant::now() + period,
            run: Box::new(run),
        };
        self.commands
            .send(Command::Schedule(task))
            .map_err(|_| {
                SamplingError::IllegalState("scheduler worker is no longer running".to_string())
            })?;
        Ok(id)
    }

    /// Removes a task from the schedule.
    ///
    /// Unknown ids and calls after shutdown are no-ops; a run already in
    /// flight is allowed to finish.
    pub fn cancel(&self, id: TaskId) {
        let _ = self.commands.send(Command::Cancel(id));
    }

    /// Stops the worker thread and joins it. Idempotent.
    pub fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }
        let _ = self.commands.send(Command::Shutdown);
        if let Some(handle) = self.worker.lock().unwrap().take() {
            let _ = handle.join();
        }
        log::debug!("periodic scheduler shut down");
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }
}

impl Default for PeriodicScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PeriodicScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker(inbox: Receiver<Command>) {
    let mut tasks: Vec<ScheduledTask> = Vec::new();
    log::debug!("periodic scheduler worker started");

    loop {
        let now = Instant::now();

        let mut i = 0;
        while i < tasks.len() {
            if tasks[i].next_run > now {
                i += 1;
                continue;
            }
            let id = tasks[i].id;
            let panicked = {
                let task = &mut tasks[i];
                panic::catch_unwind(AssertUnwindSafe(|| (task.run)())).is_err()
            };
            if panicked {
                log::error!("periodic task {id:?} panicked and was removed from the schedule");
                tasks.swap_remove(i);
                continue;
            }
            let task = &mut tasks[i];
            task.next_run += task.period;
            if task.next_run <= now {
                // Fell behind; realign instead of bursting.
                task.next_run = now + task.period;
            }
            i += 1;
        }

        let next_deadline = tasks.iter().map(|task| task.next_run).min();
        let command = match next_deadline {
            Some(deadline) => {
                let timeout = deadline.saturating_duration_since(Instant::now());
                match inbox.recv_timeout(timeout) {
                    Ok(command) => Some(command),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match inbox.recv() {
                Ok(command) => Some(command),
                Err(_) => break,
            },
        };

        match command {
            Some(Command::Schedule(task)) => tasks.push(task),
            Some(Command::Cancel(id)) => tasks.retain(|task| task.id != id),
            Some(Command::Shutdown) => break,
            None => {}
        }
    }

    if !tasks.is_empty() {
        log::debug!(
            "scheduler worker exiting with {} task(s) still scheduled",
            tasks.len()
        );
    }
}
