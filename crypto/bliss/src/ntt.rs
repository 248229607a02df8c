//! Negacyclic NTT over Z_q[X]/(X^n + 1).
//!
//! Every BLISS modulus satisfies `q ≡ 1 (mod 2n)`, so `X^n + 1` splits into
//! linear factors `X - ψ^(2i+1)` and a polynomial is invertible exactly when
//! none of its NTT evaluations is zero.
//!
//! Tables are built lazily, once per parameter set, and shared read-only.

use crate::params::{ParameterSet, PARAMETER_SET_COUNT};
use std::sync::OnceLock;

static TABLES: [OnceLock<NegacyclicNtt>; PARAMETER_SET_COUNT] =
    [const { OnceLock::new() }; PARAMETER_SET_COUNT];

#[inline(always)]
fn add_mod(a: u32, b: u32, q: u32) -> u32 {
    let s = a + b;
    if s >= q {
        s - q
    } else {
        s
    }
}

#[inline(always)]
fn sub_mod(a: u32, b: u32, q: u32) -> u32 {
    if a >= b {
        a - b
    } else {
        a + q - b
    }
}

#[inline(always)]
pub(crate) fn mul_mod(a: u32, b: u32, q: u32) -> u32 {
    ((a as u64 * b as u64) % q as u64) as u32
}

/// Compute `base^exp mod q` by square-and-multiply.
pub(crate) fn pow_mod(base: u32, mut exp: u32, q: u32) -> u32 {
    let mut result = 1u32;
    let mut base = base % q;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mod(result, base, q);
        }
        base = mul_mod(base, base, q);
        exp >>= 1;
    }
    result
}

/// Bit-reverse the low `log_n` bits of `x`.
fn bit_reverse(x: usize, log_n: u32) -> usize {
    (0..log_n).fold(0, |acc, i| (acc << 1) | ((x >> i) & 1))
}

/// Precomputed tables for one `(n, q, ψ)` triple.
#[derive(Debug)]
pub struct NegacyclicNtt {
    n: usize,
    q: u32,
    /// ω = ψ², a primitive n-th root of unity.
    omega: u32,
    omega_inv: u32,
    n_inv: u32,
    /// ψ^i, applied before the cyclic transform.
    psi_powers: Vec<u32>,
    /// ψ^-i, applied after the inverse transform.
    psi_inv_powers: Vec<u32>,
}

impl NegacyclicNtt {
    /// Shared tables for a parameter set.
    pub fn for_params(params: &'static ParameterSet) -> &'static Self {
        TABLES[params.index as usize].get_or_init(|| Self::new(params.n, params.q, params.psi))
    }

    /// Build tables. `psi` must be a primitive 2n-th root of unity mod `q`.
    pub fn new(n: usize, q: u32, psi: u32) -> Self {
        assert!(n.is_power_of_two(), "NTT requires n to be a power of 2, got n={n}");
        debug_assert_eq!(pow_mod(psi, n as u32, q), q - 1);

        let psi_inv = pow_mod(psi, q - 2, q);
        let omega = mul_mod(psi, psi, q);
        let omega_inv = pow_mod(omega, q - 2, q);
        let n_inv = pow_mod(n as u32, q - 2, q);

        let psi_powers = core::iter::successors(Some(1u32), |&p| Some(mul_mod(p, psi, q)))
            .take(n)
            .collect();
        let psi_inv_powers = core::iter::successors(Some(1u32), |&p| Some(mul_mod(p, psi_inv, q)))
            .take(n)
            .collect();

        Self {
            n,
            q,
            omega,
            omega_inv,
            n_inv,
            psi_powers,
            psi_inv_powers,
        }
    }

    /// Forward transform in place. Input and output coefficients are in `[0, q)`.
    pub fn forward(&self, a: &mut [u32]) {
        debug_assert_eq!(a.len(), self.n);
        for (c, &p) in a.iter_mut().zip(&self.psi_powers) {
            *c = mul_mod(*c, p, self.q);
        }
        self.bit_reverse_permute(a);
        self.cooley_tukey(a);
    }

    /// Inverse transform in place.
    pub fn inverse(&self, a: &mut [u32]) {
        debug_assert_eq!(a.len(), self.n);
        self.gentleman_sande(a);
        self.bit_reverse_permute(a);
        for (c, &p) in a.iter_mut().zip(&self.psi_inv_powers) {
            *c = mul_mod(mul_mod(*c, p, self.q), self.n_inv, self.q);
        }
    }

    /// Pointwise product of two transformed vectors.
    pub fn pointwise_mul(&self, a: &[u32], b: &[u32]) -> Vec<u32> {
        a.iter().zip(b).map(|(&x, &y)| mul_mod(x, y, self.q)).collect()
    }

    fn bit_reverse_permute(&self, a: &mut [u32]) {
        let log_n = self.n.trailing_zeros();
        for i in 0..self.n {
            let j = bit_reverse(i, log_n);
            if i < j {
                a.swap(i, j);
            }
        }
    }

    /// Cooley-Tukey decimation-in-time, bit-reversed input.
    fn cooley_tukey(&self, a: &mut [u32]) {
        let (n, q) = (self.n, self.q);
        let mut m = 2;
        while m <= n {
            let w_m = pow_mod(self.omega, (n / m) as u32, q);
            for chunk in a.chunks_mut(m) {
                let (lo, hi) = chunk.split_at_mut(m / 2);
                let mut w = 1u32;
                for (u, v) in lo.iter_mut().zip(hi.iter_mut()) {
                    let t = mul_mod(w, *v, q);
                    (*u, *v) = (add_mod(*u, t, q), sub_mod(*u, t, q));
                    w = mul_mod(w, w_m, q);
                }
            }
            m <<= 1;
        }
    }

    /// Gentleman-Sande decimation-in-frequency, bit-reversed output.
    fn gentleman_sande(&self, a: &mut [u32]) {
        let (n, q) = (self.n, self.q);
        let mut m = n;
        while m >= 2 {
            let w_m = pow_mod(self.omega_inv, (n / m) as u32, q);
            for chunk in a.chunks_mut(m) {
                let (lo, hi) = chunk.split_at_mut(m / 2);
                let mut w = 1u32;
                for (u, v) in lo.iter_mut().zip(hi.iter_mut()) {
                    let sum = add_mod(*u, *v, q);
                    let diff = mul_mod(sub_mod(*u, *v, q), w, q);
                    (*u, *v) = (sum, diff);
                    w = mul_mod(w, w_m, q);
                }
            }
            m >>= 1;
        }
    }
}
