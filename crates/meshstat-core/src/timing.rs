//! Opt-in stage timing.
//!
//! Loading and each metric computation run inside [`timed`]. When timing
//! is enabled (`--timing` or `MESHSTAT_TIMING=1`) every call records a
//! sample on the current thread; [`collect_report`] drains them into a
//! per-stage summary.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use serde_json::json;

/// Per-stage timing summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingReport {
    pub stages: Vec<StageTiming>,
}

/// Aggregated samples for one named stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageTiming {
    pub name: String,
    pub count: usize,
    pub total: Duration,
    pub max: Duration,
}

thread_local! {
    static SAMPLES: RefCell<Vec<(String, Duration)>> = const { RefCell::new(Vec::new()) };
}

static TIMING_ENABLED: AtomicBool = AtomicBool::new(false);

/// Returns true when `MESHSTAT_TIMING` holds a truthy value
/// (`1`, `true`, `yes`, `on`, case-insensitive).
#[must_use]
pub fn timing_enabled_from_env() -> bool {
    std::env::var("MESHSTAT_TIMING")
        .ok()
        .is_some_and(|value| is_truthy(&value))
}

/// Enable or disable timing collection.
pub fn set_timing_enabled(enabled: bool) {
    TIMING_ENABLED.store(enabled, Ordering::Relaxed);
    if !enabled {
        clear_timings();
    }
}

#[must_use]
pub fn is_timing_enabled() -> bool {
    TIMING_ENABLED.load(Ordering::Relaxed)
}

/// Drop every sample recorded on the current thread.
pub fn clear_timings() {
    SAMPLES.with(|samples| samples.borrow_mut().clear());
}

/// Run `f`, recording its duration under `stage` when timing is enabled.
pub fn timed<R>(stage: &str, f: impl FnOnce() -> R) -> R {
    if !is_timing_enabled() {
        return f();
    }

    let started = Instant::now();
    let result = f();
    record_sample(stage, started.elapsed());
    result
}

/// Drain the current thread's samples into a report ordered by stage name.
#[must_use]
pub fn collect_report() -> TimingReport {
    let samples = SAMPLES.with(|samples| std::mem::take(&mut *samples.borrow_mut()));

    let mut grouped: BTreeMap<String, StageTiming> = BTreeMap::new();
    for (name, elapsed) in samples {
        let stage = grouped.entry(name.clone()).or_insert_with(|| StageTiming {
            name,
            count: 0,
            total: Duration::ZERO,
            max: Duration::ZERO,
        });
        stage.count += 1;
        stage.total += elapsed;
        stage.max = stage.max.max(elapsed);
    }

    TimingReport {
        stages: grouped.into_values().collect(),
    }
}

impl TimingReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let stages = self
            .stages
            .iter()
            .map(|stage| {
                json!({
                    "name": stage.name,
                    "count": stage.count,
                    "total_us": stage.total.as_micros(),
                    "max_us": stage.max.as_micros(),
                })
            })
            .collect::<Vec<_>>();

        json!({ "stages": stages })
    }

    /// Render as a fixed-width table for stderr.
    #[must_use]
    pub fn display_table(&self) -> String {
        if self.stages.is_empty() {
            return "No timing samples recorded.".to_string();
        }

        let mut out = String::new();
        out.push_str("stage                        count      total        max\n");
        out.push_str("--------------------------------------------------------\n");
        for stage in &self.stages {
            out.push_str(&format!(
                "{:<28} {:>5} {:>10} {:>10}\n",
                stage.name,
                stage.count,
                format_duration(stage.total),
                format_duration(stage.max),
            ));
        }
        out
    }
}

fn record_sample(stage: &str, elapsed: Duration) {
    SAMPLES.with(|samples| samples.borrow_mut().push((stage.to_string(), elapsed)));
}

fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();
    if micros >= 1_000_000 {
        format!("{}.{:03}s", micros / 1_000_000, (micros % 1_000_000) / 1_000)
    } else if micros >= 1_000 {
        format!("{}.{:03}ms", micros / 1_000, micros % 1_000)
    } else {
        format!("{micros}µs")
    }
}

fn is_truthy(value: &str) -> bool {
    ["1", "true", "yes", "on"]
        .iter()
        .any(|truthy| value.trim().eq_ignore_ascii_case(truthy))
}
