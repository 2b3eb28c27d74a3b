//! Wall clock time spent per compiler phase.
//!
//! Wrap a phase in `timed_scope!("label")`. At the end of a run, `print`
//! writes a nested table to stderr if `MEASURE_STDERR` is set, and a JSON
//! array to the file named by `MEASURE_JSON`. Phases that run inside other
//! phases are indented below them.
//!
//! These are single measurements, not benchmarks.

use failure::{Error, ResultExt};
use serde_derive::Serialize;
use std::{
    fmt,
    fs::File,
    sync::{Mutex, MutexGuard},
    time::{Duration, Instant},
};

lazy_static::lazy_static! {
    static ref FINISHED: Mutex<Vec<Interval>> = Mutex::new(Vec::new());
}

fn finished() -> MutexGuard<'static, Vec<Interval>> {
    // a panicking phase must not hide the measurements of the others
    FINISHED.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[macro_export]
macro_rules! timed_scope {
    ($label:expr) => {
        let _timer = $crate::timing::PhaseTimer::start($label);
    };
}

/// Records the time from `start` until it is dropped.
pub struct PhaseTimer {
    label: &'static str,
    start: Instant,
}

impl PhaseTimer {
    pub fn start(label: &'static str) -> Self {
        log::debug!("phase {} started", label);
        PhaseTimer {
            label,
            start: Instant::now(),
        }
    }
}

impl Drop for PhaseTimer {
    fn drop(&mut self) {
        let interval = Interval {
            label: self.label,
            start: self.start,
            stop: Instant::now(),
        };
        log::debug!(
            "phase {} took {}ms",
            self.label,
            interval.duration().as_millis()
        );
        finished().push(interval);
    }
}

#[derive(Debug, Clone, Copy)]
struct Interval {
    label: &'static str,
    start: Instant,
    stop: Instant,
}

impl Interval {
    fn duration(&self) -> Duration {
        self.stop.duration_since(self.start)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseTiming {
    pub label: String,
    /// Number of phases this one ran inside of.
    pub depth: usize,
    pub duration: Duration,
}

/// Orders the intervals by start time and computes how deeply each one is
/// nested in the ones started before it.
fn nest(mut intervals: Vec<Interval>) -> Vec<PhaseTiming> {
    intervals.sort_by_key(|interval| interval.start);

    let mut enclosing: Vec<Interval> = Vec::new();
    intervals
        .into_iter()
        .map(|interval| {
            enclosing.retain(|outer| outer.stop > interval.start);
            let timing = PhaseTiming {
                label: interval.label.to_string(),
                depth: enclosing.len(),
                duration: interval.duration(),
            };
            enclosing.push(interval);
            timing
        })
        .collect()
}

struct Table<'a>(&'a [PhaseTiming]);

impl fmt::Display for Table<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LABEL_WIDTH: usize = 50;

        for timing in self.0 {
            let indent = "  ".repeat(timing.depth);
            writeln!(
                f,
                "{}{:<width$}    {:>6}ms",
                indent,
                timing.label,
                timing.duration.as_millis(),
                width = LABEL_WIDTH.saturating_sub(indent.len())
            )?;
        }
        Ok(())
    }
}

pub fn print() -> Result<(), Error> {
    let timings = nest(finished().clone());

    if std::env::var_os("MEASURE_STDERR").is_some() {
        eprintln!("Performance Analysis");
        eprintln!("====================\n");
        eprintln!("{}", Table(&timings));
    }

    if let Some(path) = std::env::var_os("MEASURE_JSON") {
        let file = File::create(&path).context("cannot create MEASURE_JSON output file")?;
        serde_json::to_writer(file, &timings).context("cannot write MEASURE_JSON output file")?;
    }

    Ok(())
}
