//! # Progress — Run Checkpoints and Sweep Counters
//!
//! Three layers of progress reporting sit on top of the engine's sink:
//!
//! - [`ProgressEvent`]: one engine checkpoint (iteration, percent, digest),
//!   serializable so the CLI can stream it as JSON lines.
//! - [`StepReporter`]: turns checkpoints into coarse "p=… 40%" lines, one
//!   per 20 % step, for human output.
//! - [`SweepProgress`]: atomic tested/found counters shared between the
//!   rayon workers of a sweep and a background reporter thread. A Mutex
//!   guards only the current-exponent string (updated once per exponent).
//!
//! The reporter logs every `interval` and wakes in short slices so that
//! [`SweepProgress::stop`] ends it promptly.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

use crate::digest::ResidueDigest;

/// One progress checkpoint of an LL run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    pub exponent: u32,
    pub iteration: u32,
    pub pct: u32,
    pub digest: String,
}

impl ProgressEvent {
    pub fn new(exponent: u32, iteration: u32, digest: &ResidueDigest) -> Self {
        ProgressEvent {
            exponent,
            iteration,
            pct: percent_complete(exponent, iteration),
            digest: digest.to_hex(),
        }
    }
}

/// Percent of the p − 2 iterations done once `iteration` (0-based) finished.
pub fn percent_complete(p: u32, iteration: u32) -> u32 {
    let total = p.saturating_sub(2).max(1) as u64;
    ((iteration as u64 + 1) * 100 / total).min(100) as u32
}

/// Emits a line each time a run crosses another 20 % step.
pub struct StepReporter {
    exponent: u32,
    last_step: Option<u32>,
}

impl StepReporter {
    pub fn new(exponent: u32) -> Self {
        StepReporter {
            exponent,
            last_step: None,
        }
    }

    /// Returns the percentage to print when `iteration` starts a new step.
    pub fn observe(&mut self, iteration: u32) -> Option<u32> {
        if self.exponent <= 2 {
            return None;
        }
        let pct = percent_complete(self.exponent, iteration);
        let step = pct / 20;
        match self.last_step {
            Some(last) if step <= last => None,
            _ => {
                self.last_step = Some(step);
                Some(pct)
            }
        }
    }
}

pub struct SweepProgress {
    pub tested: AtomicU64,
    pub found: AtomicU64,
    pub current: Mutex<String>,
    start: Instant,
    shutdown: AtomicBool,
}

impl SweepProgress {
    pub fn new() -> Arc<Self> {
        Arc::new(SweepProgress {
            tested: AtomicU64::new(0),
            found: AtomicU64::new(0),
            current: Mutex::new(String::new()),
            start: Instant::now(),
            shutdown: AtomicBool::new(false),
        })
    }

    pub fn set_current(&self, label: String) {
        if let Ok(mut current) = self.current.lock() {
            *current = label;
        }
    }

    pub fn start_reporter(self: &Arc<Self>, interval: Duration) -> thread::JoinHandle<()> {
        let progress = Arc::clone(self);
        let slice = Duration::from_millis(100).min(interval);
        thread::spawn(move || {
            let mut last = Instant::now();
            loop {
                thread::sleep(slice);
                if progress.shutdown.load(Ordering::Relaxed) {
                    break;
                }
                if last.elapsed() >= interval {
                    progress.print_status();
                    last = Instant::now();
                }
            }
        })
    }

    pub fn print_status(&self) {
        let elapsed = self.start.elapsed();
        let tested = self.tested.load(Ordering::Relaxed);
        let found = self.found.load(Ordering::Relaxed);
        let current = self
            .current
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default();
        let rate = if elapsed.as_secs() > 0 {
            tested as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };
        let h = elapsed.as_secs() / 3600;
        let m = (elapsed.as_secs() % 3600) / 60;
        let s = elapsed.as_secs() % 60;
        info!(
            current = %current,
            tested,
            rate = format_args!("{:.2}", rate),
            found,
            elapsed = format_args!("{:02}:{:02}:{:02}", h, m, s),
            "sweep progress"
        );
    }

    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }
}
