//! BLISS parameter sets.
//!
//! The key-side parameters of the five published BLISS configurations.
//! Signature-side parameters (sigma, kappa, rejection constants) live with
//! the signing code and are not part of this table.
//!
//! | idx | name      | n   | q     | +1 | -1 | bits |
//! |-----|-----------|-----|-------|----|----|------|
//! | 0   | BLISS-0   | 256 | 7681  | 71 | 70 | 14   |
//! | 1   | BLISS-I   | 512 | 12289 | 77 | 77 | 15   |
//! | 2   | BLISS-II  | 512 | 12289 | 77 | 77 | 15   |
//! | 3   | BLISS-III | 512 | 12289 | 108| 108| 15   |
//! | 4   | BLISS-IV  | 512 | 12289 | 116| 115| 15   |

use crate::error::{BlissError, Result};

/// Minimum entropy seed length in bytes (the SHA-512 digest size).
pub const SEED_BYTES: usize = 64;

/// Maximum number of `s1` candidates drawn before key generation gives up.
///
/// A sparse ternary `s1` is singular modulo `q` only when one of its `n`
/// NTT evaluations vanishes, which happens with probability about `n/q`
/// (3.3% for BLISS-0, 4.2% for the others). Sixteen consecutive
/// failures therefore indicate a broken entropy source, not bad luck.
pub const MAX_KEYGEN_ATTEMPTS: usize = 16;

/// Position draws allowed per sparse polynomial, as a multiple of `n`.
///
/// Placing `w` nonzeros among `n` slots needs about `n * ln(n / (n - w))`
/// draws (roughly `0.8n` for the heaviest set).
pub const POSITION_DRAW_FACTOR: usize = 16;

/// Width of the parameter index header in the compact serialization.
pub const HEADER_BITS: usize = 8;

/// Number of `+1` and `-1` coefficients in a sparse ternary secret.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct SecretWeight {
    /// Count of `+1` coefficients.
    pub plus_ones: usize,
    /// Count of `-1` coefficients.
    pub minus_ones: usize,
}

impl SecretWeight {
    /// Total number of nonzero coefficients.
    #[inline]
    pub const fn total(&self) -> usize {
        self.plus_ones + self.minus_ones
    }
}

/// Key-side parameters of one BLISS configuration.
///
/// Instances exist only in [`PARAMETER_SETS`]; NTT tables are cached by
/// [`ParameterSet::index`], so sets cannot be built outside this crate:
///
/// ```compile_fail
/// use bth_crypto_bliss::params::{ParameterSet, SecretWeight};
///
/// static ROGUE: ParameterSet = ParameterSet {
///     index: 9,
///     name: "ROGUE",
///     n: 256,
///     q: 7681,
///     psi: 4055,
///     s1_weight: SecretWeight { plus_ones: 71, minus_ones: 70 },
///     s2_weight: SecretWeight { plus_ones: 71, minus_ones: 70 },
///     coeff_bits: 14,
/// };
/// ```
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct ParameterSet {
    /// Registry index, also the serialized header byte.
    pub index: u8,
    /// Human-readable name.
    pub name: &'static str,
    /// Ring degree (power of two).
    pub n: usize,
    /// Prime modulus with `q ≡ 1 (mod 2n)`.
    pub q: u32,
    /// Primitive 2n-th root of unity modulo `q`.
    pub psi: u32,
    /// Weight of the secret `s1`.
    pub s1_weight: SecretWeight,
    /// Weight of the secret `s2`.
    pub s2_weight: SecretWeight,
    /// Serialized bits per coefficient, `ceil(log2 q) + 1`.
    pub coeff_bits: usize,
}

impl ParameterSet {
    /// Largest canonical coefficient, `(q - 1) / 2`.
    #[inline]
    pub const fn half_q(&self) -> i32 {
        (self.q / 2) as i32
    }

    /// Whether `c` lies in the canonical range `(-q/2, q/2]`.
    #[inline]
    pub const fn is_canonical(&self, c: i32) -> bool {
        c >= -self.half_q() && c <= self.half_q()
    }

    /// Map any integer to its canonical representative.
    #[inline]
    pub fn reduce(&self, x: i64) -> i32 {
        let q = self.q as i64;
        let r = x.rem_euclid(q);
        if r > q / 2 {
            (r - q) as i32
        } else {
            r as i32
        }
    }

    /// Map a canonical coefficient to `[0, q)`.
    #[inline]
    pub fn to_unsigned(&self, c: i32) -> u32 {
        (c as i64).rem_euclid(self.q as i64) as u32
    }

    /// Bit length of one packed polynomial.
    #[inline]
    pub const fn poly_bits(&self) -> usize {
        self.n * self.coeff_bits
    }

    /// Size in bytes of a compactly serialized public key.
    #[inline]
    pub const fn public_key_bytes(&self) -> usize {
        (HEADER_BITS + self.poly_bits()).div_ceil(8)
    }

    /// Size in bytes of a compactly serialized private key.
    #[inline]
    pub const fn private_key_bytes(&self) -> usize {
        (HEADER_BITS + 3 * self.poly_bits()).div_ceil(8)
    }

    /// Upper bound on entropy draws when placing one sparse polynomial.
    #[inline]
    pub const fn max_position_draws(&self) -> usize {
        POSITION_DRAW_FACTOR * self.n
    }
}

/// Number of parameter sets in the registry.
pub const PARAMETER_SET_COUNT: usize = 5;

/// The five BLISS parameter sets, indexed by [`ParameterSet::index`].
pub static PARAMETER_SETS: [ParameterSet; PARAMETER_SET_COUNT] = [
    ParameterSet {
        index: 0,
        name: "BLISS-0",
        n: 256,
        q: 7681,
        psi: 4055,
        s1_weight: SecretWeight { plus_ones: 71, minus_ones: 70 },
        s2_weight: SecretWeight { plus_ones: 71, minus_ones: 70 },
        coeff_bits: 14,
    },
    ParameterSet {
        index: 1,
        name: "BLISS-I",
        n: 512,
        q: 12289,
        psi: 10302,
        s1_weight: SecretWeight { plus_ones: 77, minus_ones: 77 },
        s2_weight: SecretWeight { plus_ones: 77, minus_ones: 77 },
        coeff_bits: 15,
    },
    ParameterSet {
        index: 2,
        name: "BLISS-II",
        n: 512,
        q: 12289,
        psi: 10302,
        s1_weight: SecretWeight { plus_ones: 77, minus_ones: 77 },
        s2_weight: SecretWeight { plus_ones: 77, minus_ones: 77 },
        coeff_bits: 15,
    },
    ParameterSet {
        index: 3,
        name: "BLISS-III",
        n: 512,
        q: 12289,
        psi: 10302,
        s1_weight: SecretWeight { plus_ones: 108, minus_ones: 108 },
        s2_weight: SecretWeight { plus_ones: 108, minus_ones: 108 },
        coeff_bits: 15,
    },
    ParameterSet {
        index: 4,
        name: "BLISS-IV",
        n: 512,
        q: 12289,
        psi: 10302,
        s1_weight: SecretWeight { plus_ones: 116, minus_ones: 115 },
        s2_weight: SecretWeight { plus_ones: 116, minus_ones: 115 },
        coeff_bits: 15,
    },
];

/// Look up a parameter set by index.
pub fn parameter_set(index: u8) -> Result<&'static ParameterSet> {
    PARAMETER_SETS
        .get(index as usize)
        .ok_or(BlissError::InvalidParameter(index))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pow_mod(mut base: u64, mut exp: u64, q: u64) -> u64 {
        let mut acc = 1u64;
        base %= q;
        while exp > 0 {
            if exp & 1 == 1 {
                acc = acc * base % q;
            }
            base = base * base % q;
            exp >>= 1;
        }
        acc
    }

    #[test]
    fn test_registry_indices() {
        for (i, p) in PARAMETER_SETS.iter().enumerate() {
            assert_eq!(p.index as usize, i);
            assert_eq!(parameter_set(i as u8).unwrap().name, p.name);
        }
        assert_eq!(parameter_set(5), Err(BlissError::InvalidParameter(5)));
        assert_eq!(parameter_set(255), Err(BlissError::InvalidParameter(255)));
    }

    #[test]
    fn test_lookup_returns_registry_entries() {
        for p in PARAMETER_SETS.iter() {
            let found = parameter_set(p.index).unwrap();
            assert!(core::ptr::eq(found, p));
            assert!((p.index as usize) < PARAMETER_SET_COUNT);
        }
    }

    #[test]
    fn test_parameters_consistency() {
        for p in PARAMETER_SETS.iter() {
            assert!(p.n.is_power_of_two());
            assert_eq!(p.q as usize % (2 * p.n), 1, "{} is not NTT friendly", p.name);
            // psi^n = -1 and psi^2n = 1
            assert_eq!(pow_mod(p.psi as u64, p.n as u64, p.q as u64), p.q as u64 - 1);
            assert_eq!(pow_mod(p.psi as u64, 2 * p.n as u64, p.q as u64), 1);
            // ceil(log2 q) + 1
            let log2_q = 32 - (p.q - 1).leading_zeros() as usize;
            assert_eq!(p.coeff_bits, log2_q + 1);
            assert!(p.s1_weight.total() < p.n);
            assert!(p.s2_weight.total() < p.n);
        }
    }

    #[test]
    fn test_reduce_and_canonical_range() {
        let p = &PARAMETER_SETS[0];
        assert_eq!(p.half_q(), 3840);
        assert_eq!(p.reduce(0), 0);
        assert_eq!(p.reduce(3840), 3840);
        assert_eq!(p.reduce(3841), -3840);
        assert_eq!(p.reduce(-1), -1);
        assert_eq!(p.reduce(7681 * 5 + 2), 2);
        assert!(p.is_canonical(3840));
        assert!(p.is_canonical(-3840));
        assert!(!p.is_canonical(3841));
        assert!(!p.is_canonical(-3841));
        assert_eq!(p.to_unsigned(-1), 7680);
    }

    #[test]
    fn test_serialized_sizes() {
        assert_eq!(PARAMETER_SETS[0].public_key_bytes(), 449);
        assert_eq!(PARAMETER_SETS[0].private_key_bytes(), 1345);
        for p in PARAMETER_SETS[1..].iter() {
            assert_eq!(p.public_key_bytes(), 961);
            assert_eq!(p.private_key_bytes(), 2881);
        }
    }
}
