//! Polynomial arithmetic for BLISS keys.
//!
//! Polynomials are elements of R_q = Z_q[X]/(X^n + 1) for the `n` and `q` of
//! their parameter set. Coefficients are kept canonical, in `(-q/2, q/2]`.
//! NTT (Number Theoretic Transform) is used for multiplication and inversion.

use crate::{
    error::{BlissError, Result},
    ntt::{pow_mod, NegacyclicNtt},
    params::{ParameterSet, SecretWeight},
};
use core::{
    fmt,
    ops::{Add, Mul, Neg, Sub},
};
use subtle::{Choice, ConstantTimeEq};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The polynomial has no inverse in R_q.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("polynomial is not invertible in R_q")]
pub struct NotInvertible;

/// A polynomial in R_q = Z_q[X]/(X^n + 1).
///
/// Coefficients are stored in standard order [a_0, a_1, ..., a_{n-1}].
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Poly {
    #[zeroize(skip)]
    params: &'static ParameterSet,
    coeffs: Vec<i32>,
}

impl fmt::Debug for Poly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Poly {{ {}, n: {}, coeffs: [...] }}", self.params.name, self.params.n)
    }
}

impl PartialEq for Poly {
    fn eq(&self, other: &Self) -> bool {
        self.params.index == other.params.index && self.coeffs == other.coeffs
    }
}

impl Eq for Poly {}

impl ConstantTimeEq for Poly {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.params.index.ct_eq(&other.params.index) & self.coeffs.as_slice().ct_eq(other.coeffs.as_slice())
    }
}

impl Poly {
    /// Create the zero polynomial.
    pub fn zero(params: &'static ParameterSet) -> Self {
        Self {
            params,
            coeffs: vec![0; params.n],
        }
    }

    /// Create a constant polynomial.
    pub fn constant(params: &'static ParameterSet, c: i64) -> Self {
        let mut p = Self::zero(params);
        p.coeffs[0] = params.reduce(c);
        p
    }

    /// Build a polynomial from arbitrary integers, reducing each into range.
    ///
    /// Missing trailing coefficients are zero; extra ones are rejected.
    pub fn from_reduced(params: &'static ParameterSet, values: &[i64]) -> Result<Self> {
        if values.len() > params.n {
            return Err(BlissError::MalformedEncoding("too many coefficients"));
        }
        let mut p = Self::zero(params);
        for (c, &v) in p.coeffs.iter_mut().zip(values) {
            *c = params.reduce(v);
        }
        Ok(p)
    }

    /// Build a polynomial from exactly `n` canonical coefficients.
    pub fn from_coefficients(params: &'static ParameterSet, coeffs: Vec<i32>) -> Result<Self> {
        if coeffs.len() != params.n {
            return Err(BlissError::MalformedEncoding("wrong coefficient count"));
        }
        if !coeffs.iter().all(|&c| params.is_canonical(c)) {
            return Err(BlissError::MalformedEncoding("coefficient out of range"));
        }
        Ok(Self { params, coeffs })
    }

    /// Construct from coefficients already known to be canonical.
    pub(crate) fn from_canonical(params: &'static ParameterSet, coeffs: Vec<i32>) -> Self {
        debug_assert_eq!(coeffs.len(), params.n);
        debug_assert!(coeffs.iter().all(|&c| params.is_canonical(c)));
        Self { params, coeffs }
    }

    /// Parameter set this polynomial belongs to.
    #[inline]
    pub fn params(&self) -> &'static ParameterSet {
        self.params
    }

    /// Number of coefficients (the ring degree `n`).
    #[inline]
    pub fn size(&self) -> usize {
        self.coeffs.len()
    }

    /// Raw canonical coefficients.
    #[inline]
    pub fn coefficients(&self) -> &[i32] {
        &self.coeffs
    }

    /// Check that every coefficient is canonical.
    pub fn is_canonical(&self) -> bool {
        self.coeffs.len() == self.params.n && self.coeffs.iter().all(|&c| self.params.is_canonical(c))
    }

    /// Maximum absolute coefficient.
    pub fn infinity_norm(&self) -> u32 {
        self.coeffs.iter().map(|c| c.unsigned_abs()).max().unwrap_or(0)
    }

    /// Counts of `+1` and `-1` coefficients, if every coefficient is in {-1, 0, 1}.
    pub fn ternary_weight(&self) -> Option<SecretWeight> {
        let mut weight = SecretWeight { plus_ones: 0, minus_ones: 0 };
        for &c in self.coeffs.iter() {
            match c {
                1 => weight.plus_ones += 1,
                -1 => weight.minus_ones += 1,
                0 => {}
                _ => return None,
            }
        }
        Some(weight)
    }

    /// Multiply by a scalar.
    pub fn scalar_mul(&self, s: i64) -> Self {
        let coeffs = self
            .coeffs
            .iter()
            .map(|&c| self.params.reduce(c as i64 * s))
            .collect();
        Self::from_canonical(self.params, coeffs)
    }

    fn zip_with(&self, other: &Self, f: impl Fn(i64, i64) -> i64) -> Self {
        debug_assert_eq!(self.params.index, other.params.index);
        let coeffs = self
            .coeffs
            .iter()
            .zip(other.coeffs.iter())
            .map(|(&a, &b)| self.params.reduce(f(a as i64, b as i64)))
            .collect();
        Self::from_canonical(self.params, coeffs)
    }

    /// Coefficients lifted to `[0, q)`.
    fn to_unsigned(&self) -> Vec<u32> {
        self.coeffs.iter().map(|&c| self.params.to_unsigned(c)).collect()
    }

    fn from_unsigned(params: &'static ParameterSet, values: &[u32]) -> Self {
        let coeffs = values.iter().map(|&v| params.reduce(v as i64)).collect();
        Self::from_canonical(params, coeffs)
    }

    /// Multiply two polynomials using NTT.
    pub fn ntt_mul(&self, other: &Self) -> Self {
        debug_assert_eq!(self.params.index, other.params.index);
        let ntt = NegacyclicNtt::for_params(self.params);

        let mut a = self.to_unsigned();
        let mut b = other.to_unsigned();
        ntt.forward(&mut a);
        ntt.forward(&mut b);
        let mut c = ntt.pointwise_mul(&a, &b);
        ntt.inverse(&mut c);

        let result = Self::from_unsigned(self.params, &c);
        a.zeroize();
        b.zeroize();
        c.zeroize();
        result
    }

    /// Naive polynomial multiplication in R_q = Z_q[X]/(X^n + 1).
    /// Slower than NTT but guaranteed correct.
    pub fn naive_mul(&self, other: &Self) -> Self {
        debug_assert_eq!(self.params.index, other.params.index);
        let n = self.params.n;
        let mut acc = vec![0i64; n];

        for (i, &a) in self.coeffs.iter().enumerate() {
            for (j, &b) in other.coeffs.iter().enumerate() {
                let prod = a as i64 * b as i64;
                let k = i + j;
                if k < n {
                    acc[k] += prod;
                } else {
                    // X^n = -1
                    acc[k - n] -= prod;
                }
            }
        }

        let coeffs = acc.iter().map(|&v| self.params.reduce(v)).collect();
        acc.zeroize();
        Self::from_canonical(self.params, coeffs)
    }

    /// Inverse in R_q.
    ///
    /// Fails with [`NotInvertible`] when any NTT evaluation is zero; the
    /// scan over evaluations does not short-circuit.
    pub fn invert(&self) -> core::result::Result<Self, NotInvertible> {
        let params = self.params;
        let ntt = NegacyclicNtt::for_params(params);

        let mut hat = self.to_unsigned();
        ntt.forward(&mut hat);

        let singular = hat
            .iter()
            .fold(Choice::from(0u8), |acc, x| acc | x.ct_eq(&0u32));
        if bool::from(singular) {
            hat.zeroize();
            return Err(NotInvertible);
        }

        // Fermat: x^(q-2) = x^-1 for prime q
        for x in hat.iter_mut() {
            *x = pow_mod(*x, params.q - 2, params.q);
        }
        ntt.inverse(&mut hat);

        let result = Self::from_unsigned(params, &hat);
        hat.zeroize();
        Ok(result)
    }
}

// ============================================================================
// Operator implementations
// ============================================================================

impl Add for &Poly {
    type Output = Poly;

    fn add(self, other: Self) -> Poly {
        self.zip_with(other, |a, b| a + b)
    }
}

impl Sub for &Poly {
    type Output = Poly;

    fn sub(self, other: Self) -> Poly {
        self.zip_with(other, |a, b| a - b)
    }
}

impl Neg for &Poly {
    type Output = Poly;

    fn neg(self) -> Poly {
        self.scalar_mul(-1)
    }
}

impl Mul for &Poly {
    type Output = Poly;

    fn mul(self, other: Self) -> Poly {
        self.ntt_mul(other)
    }
}
