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

//! Bounded, time-ordered retention of captured samples.

use std::collections::VecDeque;
use std::sync::RwLock;

use pulse_core::{Sample, SampleSink, SamplingError, SamplingResult};

/// A fixed-capacity, thread-safe history of captured samples.
///
/// Samples arrive from a single periodic producer and are appended in
/// arrival order, which matches timestamp order. Once `capacity` samples
/// are held, accepting another evicts the oldest first. Readers take
/// [`snapshot`](Self::snapshot)s concurrently with the writer; a snapshot
/// is an independent copy unaffected by later mutation.
#[derive(Debug)]
pub struct SampleHistory<T> {
    capacity: usize,
    buffer: RwLock<VecDeque<Sample<T>>>,
}

impl<T> SampleHistory<T> {
    /// Creates a history retaining at most `capacity` samples.
    ///
    /// Fails with [`SamplingError::InvalidConfiguration`] when `capacity`
    /// is zero.
    pub fn new(capacity: usize) -> SamplingResult<Self> {
        if capacity == 0 {
            return Err(SamplingError::InvalidConfiguration(
                "history capacity must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            capacity,
            buffer: RwLock::new(VecDeque::with_capacity(capacity)),
        })
    }

    /// Maximum number of retained samples, fixed at construction.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of samples currently retained.
    pub fn len(&self) -> usize {
        self.buffer.read().map(|buffer| buffer.len()).unwrap_or(0)
    }

    /// Whether the history holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> SampleHistory<T> {
    /// Returns an independent copy of the retained samples, oldest first.
    pub fn snapshot(&self) -> Vec<Sample<T>> {
        self.buffer
            .read()
            .map(|buffer| buffer.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl<T: Send + Sync + 'static> SampleSink<T> for SampleHistory<T> {
    fn accept(&self, sample: Sample<T>) {
        let mut buffer = self.buffer.write().unwrap();
        if buffer.len() >= self.capacity {
            buffer.pop_front();
        }
        buffer.push_back(sample);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    #[test]
    fn test_zero_capacity_is_rejected() {
        let result = SampleHistory::<u64>::new(0);
        assert!(matches!(
            result,
            Err(SamplingError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_fifo_eviction_drops_the_oldest() {
        let history = SampleHistory::new(3).unwrap();
        for value in 1..=4 {
            history.accept(Sample::now(value));
        }

        let samples = history.snapshot();
        let values: Vec<i32> = samples.iter().map(|sample| *sample.value()).collect();
        assert_eq!(values, vec![2, 3, 4]);
    }

    #[test]
    fn test_len_never_exceeds_capacity() {
        let history = SampleHistory::new(5).unwrap();
        for value in 0..100 {
            history.accept(Sample::now(value));
            assert!(history.len() <= 5);
        }
        assert_eq!(history.len(), 5);
    }

    #[test]
    fn test_snapshot_is_ordered_by_timestamp() {
        let history = SampleHistory::new(8).unwrap();
        let base = Instant::now();
        for i in 0..8u64 {
            history.accept(Sample::new(base + Duration::from_millis(i), i));
        }

        let samples = history.snapshot();
        assert!(samples
            .windows(2)
            .all(|pair| pair[0].timestamp() <= pair[1].timestamp()));
    }

    #[test]
    fn test_snapshot_is_independent_of_later_writes() {
        let history = SampleHistory::new(4).unwrap();
        history.accept(Sample::now(1));
        history.accept(Sample::now(2));

        let snapshot = history.snapshot();
        history.accept(Sample::now(3));

        assert_eq!(snapshot.len(), 2);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_concurrent_writer_and_reader() {
        let history = Arc::new(SampleHistory::new(16).unwrap());

        let writer = {
            let history = Arc::clone(&history);
            thread::spawn(move || {
                for value in 0..500u64 {
                    history.accept(Sample::now(value));
                }
            })
        };

        for _ in 0..200 {
            let samples = history.snapshot();
            assert!(samples.len() <= 16);
            assert!(samples
                .windows(2)
                .all(|pair| pair[0].timestamp() <= pair[1].timestamp()));
        }

        writer.join().unwrap();
        assert_eq!(history.len(), 16);
    }
}
