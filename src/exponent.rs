//! # Exponent — Deterministic Primality of 32-bit Mersenne Exponents
//!
//! M_p can only be prime when p is prime, so the engine gates every run on
//! [`is_prime_exponent`]. The check is exact over the whole `u32` domain:
//!
//! 1. Trial division by the primes 3..=37 rejects cheap composites and
//!    accepts those primes directly.
//! 2. Miller–Rabin with the witness bases {2, 3, 5, 7, 11}. This base set is
//!    deterministic for every n < 2,152,302,898,747, which covers all 32-bit
//!    inputs, so the answer is not probabilistic.
//!
//! Modular products are widened to u128, so two residues modulo a 32-bit n
//! never overflow.
//!
//! ## References
//!
//! - G. Jaeschke, "On Strong Pseudoprimes to Several Bases", Mathematics of
//!   Computation, 61(204):915–926, 1993.

/// Small primes used for the trial-division pre-filter.
const SMALL_PRIMES: [u32; 11] = [3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Miller–Rabin witnesses, deterministic below 2.15 · 10^12.
const WITNESSES: [u32; 5] = [2, 3, 5, 7, 11];

/// Modular exponentiation base^exp mod modulus using u128 intermediates.
pub fn pow_mod(mut base: u64, mut exp: u64, modulus: u64) -> u64 {
    if modulus == 1 {
        return 0;
    }
    let mut result: u64 = 1;
    base %= modulus;
    while exp > 0 {
        if exp & 1 == 1 {
            result = (result as u128 * base as u128 % modulus as u128) as u64;
        }
        exp >>= 1;
        base = (base as u128 * base as u128 % modulus as u128) as u64;
    }
    result
}

/// One strong-probable-prime round. Returns false when `a` proves n composite.
fn passes_witness(n: u32, a: u32) -> bool {
    if a % n == 0 {
        return true;
    }
    // n - 1 = d * 2^s with d odd
    let mut d = n - 1;
    let mut s = 0u32;
    while d & 1 == 0 {
        d >>= 1;
        s += 1;
    }
    let n64 = n as u64;
    let mut x = pow_mod(a as u64, d as u64, n64);
    if x == 1 || x == n64 - 1 {
        return true;
    }
    for _ in 1..s {
        x = (x as u128 * x as u128 % n64 as u128) as u64;
        if x == n64 - 1 {
            return true;
        }
    }
    false
}

/// Exact primality test for a Mersenne exponent. Never panics; 0 and 1 are not prime.
pub fn is_prime_exponent(p: u32) -> bool {
    if p == 2 {
        return true;
    }
    if p < 2 || p & 1 == 0 {
        return false;
    }
    for &q in &SMALL_PRIMES {
        if p == q {
            return true;
        }
        if p % q == 0 {
            return false;
        }
    }
    WITNESSES.iter().all(|&a| passes_witness(p, a))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trial_division(n: u32) -> bool {
        if n < 2 {
            return false;
        }
        let mut d = 2u32;
        while (d as u64) * (d as u64) <= n as u64 {
            if n % d == 0 {
                return false;
            }
            d += 1;
        }
        true
    }

    #[test]
    fn small_values() {
        assert!(!is_prime_exponent(0));
        assert!(!is_prime_exponent(1));
        assert!(is_prime_exponent(2));
        assert!(is_prime_exponent(3));
        assert!(!is_prime_exponent(4));
        assert!(!is_prime_exponent(9));
        assert!(!is_prime_exponent(21));
    }

    #[test]
    fn table_primes_accepted() {
        for &q in &SMALL_PRIMES {
            assert!(is_prime_exponent(q), "{} rejected", q);
        }
    }

    #[test]
    fn agrees_with_trial_division_up_to_10000() {
        for n in 0..=10_000u32 {
            assert_eq!(is_prime_exponent(n), trial_division(n), "disagreement at {}", n);
        }
    }

    #[test]
    fn known_mersenne_exponents_are_prime() {
        for &p in &[61u32, 89, 107, 127, 521, 607, 1279, 2203, 2281, 3217, 82_589_933] {
            assert!(is_prime_exponent(p), "{} rejected", p);
        }
    }

    #[test]
    fn strong_pseudoprimes_rejected() {
        // 2047 = 23 * 89 is a strong pseudoprime to base 2.
        // 3215031751 = 151 * 751 * 28351 is a strong pseudoprime to bases 2, 3, 5, 7.
        assert!(!is_prime_exponent(2047));
        assert!(!is_prime_exponent(3_215_031_751));
        // Carmichael numbers
        assert!(!is_prime_exponent(561));
        assert!(!is_prime_exponent(41_041));
    }

    #[test]
    fn extremes_of_u32() {
        // 4294967291 is the largest 32-bit prime.
        assert!(is_prime_exponent(4_294_967_291));
        assert!(!is_prime_exponent(u32::MAX));
        assert!(!is_prime_exponent(u32::MAX - 1));
    }

    #[test]
    fn pow_mod_known_values() {
        assert_eq!(pow_mod(2, 10, 1000), 24);
        assert_eq!(pow_mod(3, 0, 7), 1);
        assert_eq!(pow_mod(5, 3, 1), 0);
        assert_eq!(pow_mod(u32::MAX as u64, 2, 4_294_967_291), 16);
    }
}
