//! BLISS private and public keys.
//!
//! A private key holds the sparse ternary secrets `s1`, `s2` together with
//! the public polynomial
//!
//! ```text
//! a = (2*s2 + 1) * s1^-1  in Z_q[X]/(X^n + 1)
//! ```
//!
//! which is all a public key contains. Keys are immutable once built.

use crate::{
    error::{BlissError, Result},
    params::ParameterSet,
    polynomial::{NotInvertible, Poly},
};
use core::fmt;
use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Compute `a = (2*s2 + 1) * s1^-1`.
pub fn public_relation(s1: &Poly, s2: &Poly) -> core::result::Result<Poly, NotInvertible> {
    let s1_inv = s1.invert()?;
    Ok(relation_with_inverse(&s1_inv, s2))
}

/// `(2*s2 + 1) * s1_inv`, for callers that already hold the inverse.
pub(crate) fn relation_with_inverse(s1_inv: &Poly, s2: &Poly) -> Poly {
    let numerator = &s2.scalar_mul(2) + &Poly::constant(s2.params(), 1);
    &numerator * s1_inv
}

/// BLISS public key.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey {
    a: Poly,
}

impl PublicKey {
    /// Wrap a public polynomial.
    pub fn new(a: Poly) -> Self {
        Self { a }
    }

    /// Parameter set of this key.
    #[inline]
    pub fn params(&self) -> &'static ParameterSet {
        self.a.params()
    }

    /// Parameter set index.
    #[inline]
    pub fn parameter_index(&self) -> u8 {
        self.a.params().index
    }

    /// The public polynomial `a`.
    #[inline]
    pub fn a(&self) -> &Poly {
        &self.a
    }
}

/// BLISS private key.
///
/// Contains the secret polynomials `s1` and `s2`, plus the public `a`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    #[zeroize(skip)]
    params: &'static ParameterSet,
    s1: Poly,
    s2: Poly,
    #[zeroize(skip)]
    a: Poly,
}

impl PrivateKey {
    /// Assemble a key whose invariants the caller has already established.
    pub(crate) fn from_generated(s1: Poly, s2: Poly, a: Poly) -> Self {
        Self {
            params: s1.params(),
            s1,
            s2,
            a,
        }
    }

    /// Assemble a key from decoded parts, checking every key invariant.
    ///
    /// `s1` and `s2` must be sparse ternary with the weights of their
    /// parameter set, `s1` must be invertible and `a` must equal
    /// `(2*s2 + 1) * s1^-1`.
    pub fn from_parts(s1: Poly, s2: Poly, a: Poly) -> Result<Self> {
        let params = s1.params();
        if s2.params().index != params.index || a.params().index != params.index {
            return Err(BlissError::MalformedEncoding("mixed parameter sets"));
        }
        if s1.ternary_weight() != Some(params.s1_weight) {
            return Err(BlissError::MalformedEncoding("s1 is not a sparse ternary secret"));
        }
        if s2.ternary_weight() != Some(params.s2_weight) {
            return Err(BlissError::MalformedEncoding("s2 is not a sparse ternary secret"));
        }
        let s1_inv = s1
            .invert()
            .map_err(|_| BlissError::MalformedEncoding("s1 is not invertible"))?;
        if !bool::from(relation_with_inverse(&s1_inv, &s2).ct_eq(&a)) {
            return Err(BlissError::MalformedEncoding("public polynomial does not match secret"));
        }
        Ok(Self { params, s1, s2, a })
    }

    /// Parameter set of this key.
    #[inline]
    pub fn params(&self) -> &'static ParameterSet {
        self.params
    }

    /// Parameter set index.
    #[inline]
    pub fn parameter_index(&self) -> u8 {
        self.params.index
    }

    /// Secret polynomial `s1`.
    #[inline]
    pub fn s1(&self) -> &Poly {
        &self.s1
    }

    /// Secret polynomial `s2`.
    #[inline]
    pub fn s2(&self) -> &Poly {
        &self.s2
    }

    /// Public polynomial `a`.
    #[inline]
    pub fn a(&self) -> &Poly {
        &self.a
    }

    /// Derive the public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey::new(self.a.clone())
    }

    /// Check `a * s1 == 2*s2 + 1` without inverting `s1`.
    pub fn verify_relation(&self) -> bool {
        let lhs = &self.a * &self.s1;
        let rhs = &self.s2.scalar_mul(2) + &Poly::constant(self.params, 1);
        bool::from(lhs.ct_eq(&rhs))
    }
}

impl ConstantTimeEq for PrivateKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.params.index.ct_eq(&other.params.index)
            & self.s1.ct_eq(&other.s1)
            & self.s2.ct_eq(&other.s2)
            & self.a.ct_eq(&other.a)
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.ct_eq(other))
    }
}

impl Eq for PrivateKey {}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("params", &self.params().name)
            .field("a", &self.a.coefficients())
            .finish()
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("params", &self.params.name)
            .field("s1", &"<redacted>")
            .field("s2", &"<redacted>")
            .field("a", &self.a.coefficients())
            .finish()
    }
}
