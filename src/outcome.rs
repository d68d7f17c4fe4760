//! # Outcome — Result Assembly for a Finished LL Run
//!
//! Packages the terminal state of the engine, the executed iteration count,
//! the arithmetic-phase timing and a description of the arithmetic backend
//! into an immutable [`LlResult`].

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;

use crate::LL_VERSION;

/// Why a run ended as composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeKind {
    /// A zero residue appeared before the final iteration.
    EarlyExit,
    /// All p − 2 iterations ran and the final residue was nonzero.
    FinalNonzero,
}

/// Terminal state of a run that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "reason")]
pub enum Outcome {
    Prime,
    Composite(CompositeKind),
}

impl Outcome {
    pub fn is_prime(&self) -> bool {
        matches!(self, Outcome::Prime)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Prime => write!(f, "PRIME"),
            Outcome::Composite(_) => write!(f, "COMPOSITE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlResult {
    pub exponent: u32,
    pub is_prime: bool,
    pub iterations: u64,
    pub elapsed_ns: u64,
    pub final_residue_is_zero: bool,
    pub engine_info: String,
    pub outcome: Outcome,
}

impl LlResult {
    /// Build the result record for a finished run.
    ///
    /// `final_residue_is_zero` is reported separately from `outcome` because
    /// the p = 2 fast path sets it by convention without running the loop.
    pub fn assemble(
        exponent: u32,
        outcome: Outcome,
        iterations: u64,
        elapsed: Duration,
        final_residue_is_zero: bool,
    ) -> Self {
        LlResult {
            exponent,
            is_prime: outcome.is_prime(),
            iterations,
            elapsed_ns: u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX),
            final_residue_is_zero,
            engine_info: engine_info().to_string(),
            outcome,
        }
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.elapsed_ns)
    }
}

/// Version string of the linked GMP library.
pub fn gmp_version() -> String {
    // SAFETY: `__gmp_version` is a NUL-terminated static string set by GMP at build time.
    let version = unsafe { std::ffi::CStr::from_ptr(gmp_mpfr_sys::gmp::version) };
    version.to_string_lossy().into_owned()
}

fn cpu_brand() -> String {
    use sysinfo::{CpuRefreshKind, RefreshKind, System};
    let sys = System::new_with_specifics(RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing()));
    sys.cpus()
        .first()
        .map(|cpu| cpu.brand().trim().to_string())
        .filter(|brand| !brand.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Informational description of the arithmetic backend and build, e.g.
/// `gmp:6.3.0; llcore:0.1.0; target:x86_64-linux; profile:release; cpu:...`.
///
/// Computed once per process.
pub fn engine_info() -> &'static str {
    static INFO: OnceLock<String> = OnceLock::new();
    INFO.get_or_init(|| {
        format!(
            "gmp:{}; llcore:{}; target:{}-{}; profile:{}; cpu:{}",
            gmp_version(),
            LL_VERSION,
            std::env::consts::ARCH,
            std::env::consts::OS,
            if cfg!(debug_assertions) { "debug" } else { "release" },
            cpu_brand()
        )
    })
}
