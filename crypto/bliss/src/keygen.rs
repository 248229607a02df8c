//! BLISS key generation.
//!
//! `s1` is drawn as a sparse ternary polynomial and redrawn until it is
//! invertible in R_q, at most [`MAX_KEYGEN_ATTEMPTS`] times. `s2` is drawn
//! once with its own weight, and the public polynomial is
//! `a = (2*s2 + 1) * s1^-1`.
//!
//! Identical seeds and parameter indices reproduce identical keys.

use crate::{
    entropy::EntropySource,
    error::{BlissError, Result},
    keys::{relation_with_inverse, PrivateKey},
    params::{parameter_set, ParameterSet, SecretWeight, MAX_KEYGEN_ATTEMPTS},
    polynomial::Poly,
};
use subtle::{ConditionallySelectable, ConstantTimeEq};
use tracing::{debug, warn};
use zeroize::Zeroizing;

/// Sample a sparse ternary polynomial with exactly the given weight.
///
/// All `+1` coefficients are placed first, then all `-1`. Each candidate
/// position is the low `log2 n` bits of a little-endian `u16` from the
/// entropy stream; occupied positions are skipped. Fails with
/// [`BlissError::GenerationFailed`] if placement needs more than
/// [`ParameterSet::max_position_draws`] draws.
pub fn sample_sparse_ternary<E: EntropySource + ?Sized>(
    params: &'static ParameterSet,
    weight: SecretWeight,
    entropy: &mut E,
) -> Result<Poly> {
    debug_assert!(weight.total() <= params.n);
    let mask = (params.n - 1) as u16;
    let max_draws = params.max_position_draws();

    let mut coeffs = Zeroizing::new(vec![0i32; params.n]);
    let mut draws = 0usize;

    for (value, count) in [(1i32, weight.plus_ones), (-1i32, weight.minus_ones)] {
        let mut placed = 0usize;
        while placed < count {
            if draws == max_draws {
                warn!(
                    parameter_set = params.name,
                    draws, "sparse sampling exceeded its draw budget"
                );
                return Err(BlissError::GenerationFailed { attempts: draws });
            }
            draws += 1;

            let draw = entropy
                .next_u16()
                .inspect_err(|err| warn!(parameter_set = params.name, %err, "entropy source failed"))?;
            let j = (draw & mask) as usize;
            let free = coeffs[j].ct_eq(&0);
            coeffs[j].conditional_assign(&value, free);
            placed += free.unwrap_u8() as usize;
        }
    }

    Ok(Poly::from_canonical(params, core::mem::take(&mut *coeffs)))
}

/// Configurable BLISS key generator for one parameter set.
#[derive(Clone, Copy, Debug)]
pub struct KeyGenerator {
    params: &'static ParameterSet,
    max_attempts: usize,
}

impl KeyGenerator {
    /// Generator for the parameter set at `index`.
    pub fn new(index: u8) -> Result<Self> {
        Ok(Self {
            params: parameter_set(index)?,
            max_attempts: MAX_KEYGEN_ATTEMPTS,
        })
    }

    /// Override the number of `s1` candidates tried before giving up.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Parameter set keys are generated for.
    pub fn params(&self) -> &'static ParameterSet {
        self.params
    }

    /// Generate a private key from `entropy`.
    pub fn generate<E: EntropySource + ?Sized>(&self, entropy: &mut E) -> Result<PrivateKey> {
        let params = self.params;
        let (s1, s1_inv) = self.sample_invertible_s1(entropy)?;
        let s2 = sample_sparse_ternary(params, params.s2_weight, entropy)?;
        let a = relation_with_inverse(&s1_inv, &s2);

        debug!(parameter_set = params.name, "generated BLISS private key");
        Ok(PrivateKey::from_generated(s1, s2, a))
    }

    fn sample_invertible_s1<E: EntropySource + ?Sized>(&self, entropy: &mut E) -> Result<(Poly, Poly)> {
        let params = self.params;
        for attempt in 1..=self.max_attempts {
            let s1 = sample_sparse_ternary(params, params.s1_weight, entropy)?;
            match s1.invert() {
                Ok(s1_inv) => return Ok((s1, s1_inv)),
                Err(_) => debug!(parameter_set = params.name, attempt, "s1 not invertible, redrawing"),
            }
        }
        warn!(
            parameter_set = params.name,
            attempts = self.max_attempts,
            "no invertible s1 found"
        );
        Err(BlissError::GenerationFailed {
            attempts: self.max_attempts,
        })
    }
}

/// Generate a private key for the parameter set at `index`.
pub fn generate_private_key<E: EntropySource + ?Sized>(index: u8, entropy: &mut E) -> Result<PrivateKey> {
    KeyGenerator::new(index)?.generate(entropy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entropy::{Entropy, RngEntropy},
        params::{PARAMETER_SETS, SEED_BYTES},
    };
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    fn test_entropy() -> Entropy {
        let seed: Vec<u8> = (0..SEED_BYTES).map(|i| (i % 8) as u8).collect();
        Entropy::new(&seed).unwrap()
    }

    /// Always returns zero bytes, so every position draw hits slot 0.
    struct StuckSource;

    impl EntropySource for StuckSource {
        fn try_fill(&mut self, dest: &mut [u8]) -> Result<()> {
            dest.fill(0);
            Ok(())
        }
    }

    #[test]
    fn test_sparse_ternary_weights() {
        let mut entropy = test_entropy();
        for params in PARAMETER_SETS.iter() {
            let p = sample_sparse_ternary(params, params.s1_weight, &mut entropy).unwrap();
            assert_eq!(p.ternary_weight(), Some(params.s1_weight), "{}", params.name);
            assert_eq!(p.size(), params.n);
        }
    }

    #[test]
    fn test_invalid_parameter() {
        let mut entropy = test_entropy();
        assert_eq!(
            generate_private_key(5, &mut entropy).map(|_| ()),
            Err(BlissError::InvalidParameter(5))
        );
        assert!(KeyGenerator::new(200).is_err());
    }

    #[test]
    fn test_keys_are_deterministic() {
        for index in 0..5u8 {
            let k1 = generate_private_key(index, &mut test_entropy()).unwrap();
            let k2 = generate_private_key(index, &mut test_entropy()).unwrap();
            assert_eq!(k1, k2);
            assert_eq!(k1.parameter_index(), index);
        }
    }

    #[test]
    fn test_ring_invariants_all_sets() {
        let mut entropy = RngEntropy(ChaCha20Rng::seed_from_u64(2024));
        for params in PARAMETER_SETS.iter() {
            let key = generate_private_key(params.index, &mut entropy).unwrap();
            let inv = key.s1().invert().unwrap();
            assert_eq!(key.s1() * &inv, Poly::constant(params, 1));
            assert!(key.verify_relation());
            assert_eq!(key.s2().ternary_weight(), Some(params.s2_weight));
        }
    }

    #[test]
    fn test_stuck_source_fails_bounded() {
        let result = generate_private_key(0, &mut StuckSource);
        assert_eq!(
            result.map(|_| ()),
            Err(BlissError::GenerationFailed {
                attempts: PARAMETER_SETS[0].max_position_draws()
            })
        );
    }

    #[test]
    fn test_zero_attempt_budget() {
        let generator = KeyGenerator::new(1).unwrap().with_max_attempts(0);
        assert_eq!(
            generator.generate(&mut test_entropy()).map(|_| ()),
            Err(BlissError::GenerationFailed { attempts: 0 })
        );
    }

    #[test]
    fn test_exhausted_entropy() {
        let mut entropy = test_entropy().with_limit(64);
        assert!(matches!(
            generate_private_key(0, &mut entropy),
            Err(BlissError::Entropy(_))
        ));
    }

    #[test]
    fn test_different_seeds_different_keys() {
        let k1 = generate_private_key(0, &mut Entropy::new(&[1u8; SEED_BYTES]).unwrap()).unwrap();
        let k2 = generate_private_key(0, &mut Entropy::new(&[2u8; SEED_BYTES]).unwrap()).unwrap();
        assert_ne!(k1.public_key(), k2.public_key());
    }
}
