//! # llcore — Lucas–Lehmer Primality Engine for Mersenne Numbers
//!
//! Decides whether M_p = 2^p − 1 is prime for a prime exponent p, using GMP
//! (via `rug`) for the big-integer arithmetic.
//!
//! ## Data Flow
//!
//! ```text
//! caller ─▶ exponent::is_prime_exponent (gate)
//!        ─▶ engine::ll_test ── reduce::MersenneReducer every iteration
//!                           └─ digest::digest_residue at checkpoints ─▶ caller's sink
//!        ─▶ outcome::LlResult
//! ```
//!
//! [`export`] writes M_p in decimal and shares nothing with the engine.
//! [`sieve`] and [`sweep`] enumerate and test whole exponent ranges.

pub mod config;
pub mod digest;
pub mod engine;
pub mod error;
pub mod export;
pub mod exponent;
pub mod outcome;
pub mod progress;
pub mod reduce;
pub mod sieve;
pub mod sweep;

pub use digest::ResidueDigest;
pub use engine::{ll_test, ll_test_with_progress, LlConfig};
pub use error::{ExportError, LlError};
pub use export::{write_mersenne_decimal, DecimalExport};
pub use exponent::is_prime_exponent;
pub use outcome::{CompositeKind, LlResult, Outcome};

/// Crate version, reported in `engine_info` and by the CLI.
pub const LL_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!LL_VERSION.is_empty());
        assert_eq!(LL_VERSION.split('.').count(), 3);
    }

    #[test]
    fn reexports_compose() {
        let r = ll_test(&LlConfig::new(5).without_progress()).unwrap();
        assert!(r.is_prime && is_prime_exponent(r.exponent));
        assert_eq!(r.outcome, Outcome::Prime);
    }
}
