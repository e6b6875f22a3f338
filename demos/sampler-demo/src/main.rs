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

//! Samples a couple of in-process metrics for two seconds and prints the
//! retained history of each.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use pulse_core::{MetricSource, NamedMetric, SamplingResult};
use pulse_sampling::SamplingService;
use serde_json::json;

/// Seconds elapsed since process start.
struct Uptime {
    started: Instant,
}

impl MetricSource<f64> for Uptime {
    fn value(&self) -> SamplingResult<f64> {
        Ok(self.started.elapsed().as_secs_f64())
    }
}

/// A counter that grows by a pseudo-random step on every read.
struct BusyCounter {
    count: AtomicU64,
}

impl MetricSource<f64> for BusyCounter {
    fn value(&self) -> SamplingResult<f64> {
        let step = 1 + self.count.load(Ordering::Relaxed) % 7;
        Ok(self.count.fetch_add(step, Ordering::Relaxed) as f64)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let service = SamplingService::new(Duration::from_millis(200), 32)?;

    let mut properties = HashMap::new();
    properties.insert("unit".to_string(), json!("seconds"));
    service.register(NamedMetric::new(
        "process:uptime",
        HashSet::from(["process".to_string()]),
        properties,
        Arc::new(Uptime {
            started: Instant::now(),
        }),
    ))?;

    service.register(NamedMetric::new(
        "demo:busy_counter",
        HashSet::from(["demo".to_string()]),
        HashMap::new(),
        Arc::new(BusyCounter {
            count: AtomicU64::new(0),
        }),
    ))?;

    service.start_all()?;
    log::info!("sampling {} metric(s) for two seconds", service.registry().len());
    std::thread::sleep(Duration::from_secs(2));
    service.stop_all()?;

    for metric in service.registry().all() {
        let samples = service.snapshot(metric.name()).unwrap_or_default();
        println!("{} ({} sample(s)):", metric.name(), samples.len());
        if let Some(first) = samples.first().map(|sample| sample.timestamp()) {
            for sample in &samples {
                let offset = sample.timestamp().duration_since(first);
                println!("  +{:>5.2}s  {:.3}", offset.as_secs_f64(), sample.value());
            }
        }
    }

    service.shutdown();
    Ok(())
}
