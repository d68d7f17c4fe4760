//! # Reduce — One-Fold Reduction Modulo 2^p − 1
//!
//! Since 2^p ≡ 1 (mod M) for M = 2^p − 1, any x = hi·2^p + lo satisfies
//! x ≡ hi + lo (mod M). Folding the high half onto the low half replaces a
//! general division with a shift, a mask and an add.
//!
//! For x = s² − 2 with 0 ≤ s < M, both halves are below 2^p, so the folded
//! sum is at most 2M + 1 and two conditional subtractions bring it into
//! [0, M). The second subtraction is only taken when the sum lands exactly on
//! 2M; skipping it would leave x == M.
//!
//! GMP's `>>` on `rug::Integer` rounds toward −∞, so the identity also holds
//! for the slightly negative values s² − 2 produces when s < 2.
//!
//! The LL loop calls this once per iteration, so the `hi` scratch buffer is
//! allocated once per run and reused.

use rug::{Assign, Integer};
use std::cmp::Ordering;

/// Reduce `x` modulo `modulus` = 2^p − 1 in place, using `hi` as scratch.
///
/// `x` must lie in [−2, 2^(2p)).
pub fn reduce_once(x: &mut Integer, modulus: &Integer, p: u32, hi: &mut Integer) {
    hi.assign(&*x >> p);
    x.keep_bits_mut(p);
    *x += &*hi;
    if *x >= *modulus {
        *x -= modulus;
    }
    if *x >= *modulus {
        *x -= modulus;
    }
    if x.cmp0() == Ordering::Less {
        *x += modulus;
    }
}

/// Owns the modulus M_p and the scratch buffer for one LL run.
pub struct MersenneReducer {
    p: u32,
    modulus: Integer,
    hi: Integer,
}

impl MersenneReducer {
    pub fn new(p: u32) -> Self {
        let bits = p as usize + 1;
        let mut modulus = Integer::with_capacity(bits);
        modulus.assign(Integer::u_pow_u(2, p));
        modulus -= 1u32;
        MersenneReducer {
            p,
            modulus,
            hi: Integer::with_capacity(bits),
        }
    }

    pub fn exponent(&self) -> u32 {
        self.p
    }

    /// M_p = 2^p − 1.
    pub fn modulus(&self) -> &Integer {
        &self.modulus
    }

    /// Reduce `x` into [0, M) in place.
    pub fn reduce(&mut self, x: &mut Integer) {
        reduce_once(x, &self.modulus, self.p, &mut self.hi);
    }

    /// Whether `x` is a fully reduced residue, 0 ≤ x < M.
    pub fn is_reduced(&self, x: &Integer) -> bool {
        x.cmp0() != Ordering::Less && *x < self.modulus
    }
}
