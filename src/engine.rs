//! # Engine — Lucas–Lehmer Test for M_p = 2^p − 1
//!
//! For prime p > 2, M_p is prime iff s_{p−2} ≡ 0 (mod M_p), where s_0 = 4
//! and s_{k+1} = s_k² − 2. The engine runs exactly p − 2 squarings, each
//! followed by a one-fold Mersenne reduction ([`crate::reduce`]).
//!
//! ## State Machine
//!
//! ```text
//! Init ──invalid p──▶ Rejected (LlError::InvalidExponent)
//!  │
//!  ├─ p = 2 ─▶ Prime (zero iterations)
//!  └─ p > 2 ─▶ Running ─▶ Composite(EarlyExit) | Composite(FinalNonzero) | Prime
//! ```
//!
//! A residue of zero before the final iteration certifies compositeness, so
//! the loop stops there instead of finishing.
//!
//! ## Progress
//!
//! When enabled, the caller's sink is called synchronously every `stride`
//! iterations and after the last one, with the 0-based iteration index and a
//! [`ResidueDigest`] of the new residue. The loop does not continue until the
//! sink returns. A sink error aborts the run with
//! [`LlError::ProgressAborted`]; there is no other cancellation path.
//!
//! ## Resources
//!
//! M_p, the residue and the squaring buffer are sized once from p and reused
//! across every iteration. Nothing is shared between runs, so runs for
//! different exponents can execute on different threads without locking.

use rug::{Assign, Integer};
use std::cmp::Ordering;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::digest::{digest_residue, ResidueDigest};
use crate::error::LlError;
use crate::exponent::is_prime_exponent;
use crate::outcome::{CompositeKind, LlResult, Outcome};
use crate::reduce::MersenneReducer;

/// Per-run configuration. Immutable for the duration of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LlConfig {
    pub exponent: u32,
    pub progress_enabled: bool,
    /// Iterations between progress notifications; 0 selects ~100 per run.
    pub progress_stride: u32,
}

impl LlConfig {
    pub fn new(exponent: u32) -> Self {
        LlConfig {
            exponent,
            progress_enabled: true,
            progress_stride: 0,
        }
    }

    pub fn with_stride(mut self, stride: u32) -> Self {
        self.progress_stride = stride;
        self
    }

    pub fn without_progress(mut self) -> Self {
        self.progress_enabled = false;
        self
    }

    pub fn effective_stride(&self) -> u32 {
        effective_stride(self.exponent, self.progress_stride)
    }
}

/// Stride actually used: the requested one if nonzero, else max(1, (p−2)/100).
pub fn effective_stride(p: u32, requested: u32) -> u32 {
    if requested != 0 {
        requested
    } else {
        (p.saturating_sub(2) / 100).max(1)
    }
}

/// Number of sink calls a full run of p − 2 iterations makes at `stride`.
pub fn expected_notifications(p: u32, stride: u32) -> u64 {
    let total = p.saturating_sub(2) as u64;
    if total == 0 {
        return 0;
    }
    total.div_ceil(effective_stride(p, stride) as u64)
}

type ProgressSink<'a> = dyn FnMut(u32, &ResidueDigest) -> anyhow::Result<()> + 'a;

/// Run the Lucas–Lehmer test without progress reporting.
pub fn ll_test(config: &LlConfig) -> Result<LlResult, LlError> {
    run(config, None)
}

/// Run the Lucas–Lehmer test, calling `sink(iteration, digest)` at each checkpoint.
///
/// The sink is only called when `config.progress_enabled` is set.
pub fn ll_test_with_progress<F>(config: &LlConfig, mut sink: F) -> Result<LlResult, LlError>
where
    F: FnMut(u32, &ResidueDigest) -> anyhow::Result<()>,
{
    let sink: &mut ProgressSink<'_> = &mut sink;
    run(config, Some(sink))
}

fn run(config: &LlConfig, mut sink: Option<&mut ProgressSink<'_>>) -> Result<LlResult, LlError> {
    let p = config.exponent;
    if p < 2 || !is_prime_exponent(p) {
        return Err(LlError::InvalidExponent { p });
    }

    // M_2 = 3 is prime. The loop has no iterations, and the residue counts
    // as zero by convention.
    if p == 2 {
        debug!(p, "M_2 fast path");
        return Ok(LlResult::assemble(p, Outcome::Prime, 0, Duration::ZERO, true));
    }

    let total = p - 2;
    let stride = effective_stride(p, config.progress_stride);
    if !config.progress_enabled {
        sink = None;
    }
    debug!(p, iterations = total, stride, progress = sink.is_some(), "starting Lucas-Lehmer run");

    let start = Instant::now();
    let mut reducer = MersenneReducer::new(p);
    let mut s = Integer::with_capacity(p as usize + 1);
    s.assign(4u32);
    let mut square = Integer::with_capacity(2 * p as usize + 2);

    let mut executed: u64 = 0;
    let mut early_exit = false;

    for i in 0..total {
        if i > 0 && s.cmp0() == Ordering::Equal {
            early_exit = true;
            break;
        }

        square.assign(s.square_ref());
        square -= 2u32;
        reducer.reduce(&mut square);
        std::mem::swap(&mut s, &mut square);
        executed += 1;

        if !reducer.is_reduced(&s) {
            return Err(LlError::InvariantViolation { p, iteration: i });
        }

        if let Some(sink) = sink.as_deref_mut() {
            if (i + 1) % stride == 0 || i + 1 == total {
                sink(i, &digest_residue(&s)).map_err(LlError::ProgressAborted)?;
            }
        }
    }

    let elapsed = start.elapsed();
    let (outcome, final_zero) = if early_exit {
        (Outcome::Composite(CompositeKind::EarlyExit), false)
    } else if s.cmp0() == Ordering::Equal {
        (Outcome::Prime, true)
    } else {
        (Outcome::Composite(CompositeKind::FinalNonzero), false)
    };

    debug!(
        p,
        iterations = executed,
        elapsed_ms = elapsed.as_millis() as u64,
        outcome = %outcome,
        "Lucas-Lehmer run finished"
    );

    Ok(LlResult::assemble(p, outcome, executed, elapsed, final_zero))
}
