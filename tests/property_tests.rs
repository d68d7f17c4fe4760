//! Property-based tests for llcore's arithmetic building blocks.
//!
//! These tests use the `proptest` framework to check invariants across
//! randomly generated inputs rather than fixed examples.
//!
//! # How to run
//!
//! ```bash
//! cargo test --test property_tests
//! PROPTEST_CASES=10000 cargo test --test property_tests
//! ```
//!
//! # Properties
//!
//! - **Reducer**: one-fold Mersenne reduction agrees with generic `%` for
//!   any x in [0, M²) and with the LL step input s² − 2.
//! - **Exponent checker**: agrees with trial division and with GMP.
//! - **Digest**: stable for identical input, sensitive to single-bit flips.
//! - **Engine**: small runs agree with a straightforward LL reference.

use llcore::digest::{digest_bytes, digest_residue};
use llcore::exponent::{is_prime_exponent, pow_mod};
use llcore::reduce::MersenneReducer;
use llcore::sieve::base_primes;
use llcore::{ll_test, LlConfig};
use proptest::prelude::*;
use rug::integer::{IsPrime, Order};
use rug::Integer;

fn primes_to_600() -> Vec<u32> {
    base_primes(600)
}

fn generic_mod(x: &Integer, m: &Integer) -> Integer {
    let mut r = Integer::from(x % m);
    if r < 0 {
        r += m;
    }
    r
}

// == Reducer ===================================================================

proptest! {
    /// For random x in [0, M²), the folded reduction equals x mod M.
    #[test]
    fn prop_reduce_matches_generic_mod(
        p_idx in 0usize..109,
        bytes in prop::collection::vec(any::<u8>(), 1..160),
    ) {
        let p = primes_to_600()[p_idx];
        let mut red = MersenneReducer::new(p);
        let m = red.modulus().clone();
        let m_sq = Integer::from(m.square_ref());
        let mut x = Integer::from_digits(&bytes, Order::Lsf);
        x %= &m_sq;
        let expected = generic_mod(&x, &m);
        red.reduce(&mut x);
        prop_assert_eq!(&x, &expected, "p={}", p);
        prop_assert!(red.is_reduced(&x));
    }

    /// The LL step input s² − 2 for any reduced s reduces into [0, M).
    #[test]
    fn prop_reduce_ll_step(
        p_idx in 0usize..109,
        bytes in prop::collection::vec(any::<u8>(), 1..80),
    ) {
        let p = primes_to_600()[p_idx];
        let mut red = MersenneReducer::new(p);
        let m = red.modulus().clone();
        let s = generic_mod(&Integer::from_digits(&bytes, Order::Lsf), &m);
        let mut x = Integer::from(s.square_ref()) - 2u32;
        let expected = generic_mod(&x, &m);
        red.reduce(&mut x);
        prop_assert_eq!(x, expected);
    }
}

// == Exponent checker ==========================================================

proptest! {
    /// Deterministic Miller–Rabin agrees with GMP across the whole u32 domain.
    #[test]
    fn prop_exponent_checker_matches_gmp(n in any::<u32>()) {
        let gmp = Integer::from(n).is_probably_prime(30) != IsPrime::No;
        prop_assert_eq!(is_prime_exponent(n), gmp, "n={}", n);
    }

    /// pow_mod matches GMP modular exponentiation.
    #[test]
    fn prop_pow_mod_matches_big_int(
        base in 0u64..u32::MAX as u64,
        exp in 0u64..10_000,
        modulus in 1u64..u32::MAX as u64,
    ) {
        let expected = Integer::from(base)
            .pow_mod(&Integer::from(exp), &Integer::from(modulus))
            .unwrap()
            .to_u64()
            .unwrap();
        prop_assert_eq!(pow_mod(base, exp, modulus), expected);
    }
}

#[test]
fn exponent_checker_agrees_with_trial_division_to_10000() {
    for n in 2..=10_000u32 {
        let trial = (2..n).take_while(|d| d * d <= n).all(|d| n % d != 0);
        assert_eq!(is_prime_exponent(n), trial, "n={}", n);
    }
}

// == Digest ====================================================================

proptest! {
    /// Hashing the same bytes twice yields the same digest.
    #[test]
    fn prop_digest_stable(data in prop::collection::vec(any::<u8>(), 0..512)) {
        prop_assert_eq!(digest_bytes(&data), digest_bytes(&data.clone()));
    }

    /// Flipping any single bit changes the digest.
    #[test]
    fn prop_digest_bit_flip(
        data in prop::collection::vec(any::<u8>(), 1..512),
        pos in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let mut flipped = data.clone();
        let i = pos.index(flipped.len());
        flipped[i] ^= 1 << bit;
        prop_assert_ne!(digest_bytes(&data), digest_bytes(&flipped));
    }

    /// Residue digests depend only on the value.
    #[test]
    fn prop_residue_digest_value_only(v in any::<u128>()) {
        let a = Integer::from(v);
        let mut b = Integer::with_capacity(4096);
        b += v;
        prop_assert_eq!(digest_residue(&a), digest_residue(&b));
    }
}

// == Engine ====================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// The engine agrees with a plain `%`-based LL for prime exponents below 600.
    #[test]
    fn prop_engine_matches_reference(p_idx in 0usize..109) {
        let p = primes_to_600()[p_idx];
        let expected = if p == 2 {
            true
        } else {
            let m = Integer::from(Integer::u_pow_u(2, p)) - 1u32;
            let mut s = Integer::from(4);
            for _ in 0..p - 2 {
                s = generic_mod(&(Integer::from(s.square_ref()) - 2u32), &m);
            }
            s == 0
        };
        let r = ll_test(&LlConfig::new(p).without_progress()).unwrap();
        prop_assert_eq!(r.is_prime, expected, "p={}", p);
    }
}
