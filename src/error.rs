//! # Error — Failure Kinds for the Engine and the Decimal Exporter
//!
//! The engine and the exporter share no state, so each has its own error
//! enum. Invalid input is rejected before any arithmetic starts; an invariant
//! violation is an internal bug and is never reported as "composite".

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by [`crate::engine::ll_test`].
#[derive(Debug, Error)]
pub enum LlError {
    /// The exponent is < 2 or not prime. No arithmetic was performed.
    #[error("invalid exponent {p}: the Mersenne exponent must be a prime >= 2")]
    InvalidExponent { p: u32 },

    /// The residue left [0, M) after a reduction step.
    #[error("internal invariant violated for p={p}: residue out of range after iteration {iteration}")]
    InvariantViolation { p: u32, iteration: u32 },

    /// The caller's progress sink returned an error; the run was abandoned.
    #[error("progress sink aborted the run")]
    ProgressAborted(#[source] anyhow::Error),
}

impl LlError {
    /// True for errors caused by the caller's input rather than by the engine.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, LlError::InvalidExponent { .. })
    }
}

/// Errors returned by [`crate::export::write_mersenne_decimal`].
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid exponent {p}: decimal export requires p >= 1")]
    InvalidExponent { p: u32 },

    #[error("M_{p} has {digits} decimal digits, above the export limit of {limit}")]
    TooLarge { p: u32, digits: u64, limit: u64 },

    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
