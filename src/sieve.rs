//! # Sieve — Enumerating Candidate Mersenne Exponents
//!
//! Only prime p can give a Mersenne prime, so sweeps over exponent ranges
//! start by listing the primes in the range.
//!
//! 1. **Base primes** below 2^16 from a plain odd-only sieve. These cover
//!    every composite in the 32-bit exponent domain.
//! 2. **Segments** of at most [`BLOCK_WIDTH`] exponents, aligned to block
//!    boundaries. Each segment crosses off multiples of the base primes in
//!    its own window, so memory stays bounded by the block width however
//!    wide the requested range is.
//!
//! [`exponent_segments`] yields the segments lazily; [`prime_exponents`]
//! collects them for callers that want a flat list of a short range.

/// Width of one exponent block.
pub const BLOCK_WIDTH: u64 = 1_000_000;

const EXPONENT_LIMIT: u64 = u32::MAX as u64 + 1;

/// Half-open exponent range `[start, end)` covered by block `id`.
///
/// Blocks past the 32-bit exponent domain are clamped to it.
pub fn block_bounds(id: u32) -> (u64, u64) {
    let start = id as u64 * BLOCK_WIDTH;
    let end = start + BLOCK_WIDTH;
    (start.min(EXPONENT_LIMIT), end.min(EXPONENT_LIMIT))
}

/// Primes `q <= limit`, ascending.
pub fn base_primes(limit: u32) -> Vec<u32> {
    if limit < 2 {
        return vec![];
    }
    // odd[i] stands for 2i + 1
    let mut odd = vec![true; limit as usize / 2 + 1];
    odd[0] = false;
    let mut q = 3usize;
    while q * q <= limit as usize {
        if odd[q / 2] {
            for m in (q * q..=limit as usize).step_by(2 * q) {
                odd[m / 2] = false;
            }
        }
        q += 2;
    }
    let mut primes = vec![2];
    primes.extend(
        odd.iter()
            .enumerate()
            .filter(|&(i, &keep)| keep && 2 * i + 1 <= limit as usize)
            .map(|(i, _)| 2 * i as u32 + 1),
    );
    primes
}

/// Lazy iterator over the prime exponents of a range, one segment at a time.
pub struct ExponentSegments {
    base: Vec<u32>,
    next: u64,
    hi: u64,
}

impl ExponentSegments {
    /// Exponents not yet covered by a yielded segment.
    pub fn remaining(&self) -> (u64, u64) {
        (self.next, self.hi)
    }
}

impl Iterator for ExponentSegments {
    type Item = Vec<u32>;

    fn next(&mut self) -> Option<Vec<u32>> {
        while self.next < self.hi {
            let lo = self.next;
            let hi = ((lo / BLOCK_WIDTH + 1) * BLOCK_WIDTH).min(self.hi);
            self.next = hi;
            let primes = sieve_segment(lo, hi, &self.base);
            if !primes.is_empty() {
                return Some(primes);
            }
        }
        None
    }
}

/// Segments of prime exponents in `[lo, hi)`, each within a single block.
///
/// `hi` is clamped to 2^32, the exponent domain of the engine. Segments with
/// no primes are skipped.
pub fn exponent_segments(lo: u64, hi: u64) -> ExponentSegments {
    let hi = hi.min(EXPONENT_LIMIT);
    let lo = lo.max(2);
    let base = if hi > lo {
        base_primes((hi as f64).sqrt() as u32 + 1)
    } else {
        vec![]
    };
    ExponentSegments {
        base,
        next: lo,
        hi: hi.max(lo),
    }
}

/// Prime exponents in the half-open range `[lo, hi)`, ascending.
pub fn prime_exponents(lo: u64, hi: u64) -> Vec<u32> {
    exponent_segments(lo, hi).flatten().collect()
}

fn sieve_segment(lo: u64, hi: u64, base: &[u32]) -> Vec<u32> {
    let mut is_prime = vec![true; (hi - lo) as usize];
    for &q in base {
        let q = q as u64;
        if q * q >= hi {
            break;
        }
        let mut m = (q * q).max(lo.div_ceil(q) * q);
        while m < hi {
            is_prime[(m - lo) as usize] = false;
            m += q;
        }
    }
    is_prime
        .iter()
        .enumerate()
        .filter(|&(_, &keep)| keep)
        .map(|(i, _)| (lo + i as u64) as u32)
        .collect()
}
