//! Compact binary serialization of BLISS keys.
//!
//! Layout: one header byte holding the parameter index, then every
//! coefficient as a `coeff_bits`-wide two's complement field, packed
//! most-significant bit first into one continuous bit stream. The last
//! byte is padded with zero bits.

use crate::{
    error::{BlissError, Result},
    keys::{PrivateKey, PublicKey},
    params::{parameter_set, ParameterSet, HEADER_BITS},
    polynomial::Poly,
};

/// MSB-first bit packer.
struct BitWriter {
    bytes: Vec<u8>,
    bit_len: usize,
}

impl BitWriter {
    fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
            bit_len: 0,
        }
    }

    /// Append the low `bits` bits of `value`.
    fn write(&mut self, value: u32, bits: usize) {
        for i in (0..bits).rev() {
            if self.bit_len % 8 == 0 {
                self.bytes.push(0);
            }
            if let Some(last) = self.bytes.last_mut() {
                *last |= (((value >> i) & 1) as u8) << (7 - self.bit_len % 8);
            }
            self.bit_len += 1;
        }
    }

    fn write_poly(&mut self, poly: &Poly) {
        let bits = poly.params().coeff_bits;
        let mask = (1u32 << bits) - 1;
        for &c in poly.coefficients() {
            self.write(c as u32 & mask, bits);
        }
    }

    fn finish(self) -> Vec<u8> {
        self.bytes
    }
}

/// MSB-first bit unpacker. Callers check the input length up front.
struct BitReader<'a> {
    bytes: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, bit_pos: 0 }
    }

    fn read(&mut self, bits: usize) -> u32 {
        debug_assert!(self.bit_pos + bits <= self.bytes.len() * 8);
        let mut value = 0u32;
        for _ in 0..bits {
            let byte = self.bytes[self.bit_pos / 8];
            let bit = (byte >> (7 - self.bit_pos % 8)) & 1;
            value = (value << 1) | bit as u32;
            self.bit_pos += 1;
        }
        value
    }

    fn read_poly(&mut self, params: &'static ParameterSet) -> Result<Poly> {
        let bits = params.coeff_bits;
        let shift = 32 - bits;
        let coeffs = (0..params.n)
            .map(|_| ((self.read(bits) << shift) as i32) >> shift)
            .collect();
        Poly::from_coefficients(params, coeffs)
    }

    /// Whether every bit after the current position is zero.
    fn rest_is_zero(&self) -> bool {
        let (byte, bit) = (self.bit_pos / 8, self.bit_pos % 8);
        let partial = match (bit, self.bytes.get(byte)) {
            (0, _) | (_, None) => 0,
            (bit, Some(b)) => b & (0xFF >> bit),
        };
        let tail_start = if bit == 0 { byte } else { byte + 1 };
        partial == 0 && self.bytes.get(tail_start..).is_none_or(|t| t.iter().all(|&b| b == 0))
    }
}

fn serialize_polys(params: &'static ParameterSet, polys: &[&Poly]) -> Vec<u8> {
    let total = (HEADER_BITS + polys.len() * params.poly_bits()).div_ceil(8);
    let mut writer = BitWriter::with_capacity(total);
    writer.write(params.index as u32, HEADER_BITS);
    for poly in polys {
        writer.write_poly(poly);
    }
    writer.finish()
}

fn deserialize_polys(input: &[u8], count: usize) -> Result<Vec<Poly>> {
    let (&index, _) = input
        .split_first()
        .ok_or(BlissError::MalformedEncoding("empty input"))?;
    let params =
        parameter_set(index).map_err(|_| BlissError::MalformedEncoding("unknown parameter set"))?;
    if input.len() != (HEADER_BITS + count * params.poly_bits()).div_ceil(8) {
        return Err(BlissError::MalformedEncoding("wrong length"));
    }

    let mut reader = BitReader::new(input);
    reader.read(HEADER_BITS);
    let polys = (0..count)
        .map(|_| reader.read_poly(params))
        .collect::<Result<Vec<_>>>()?;
    if !reader.rest_is_zero() {
        return Err(BlissError::MalformedEncoding("nonzero padding"));
    }
    Ok(polys)
}

impl PublicKey {
    /// Compact binary form.
    pub fn serialize(&self) -> Vec<u8> {
        serialize_polys(self.params(), &[self.a()])
    }

    /// Parse the output of [`PublicKey::serialize`].
    pub fn deserialize(input: &[u8]) -> Result<Self> {
        let [a]: [Poly; 1] = deserialize_polys(input, 1)?
            .try_into()
            .map_err(|_| BlissError::MalformedEncoding("wrong length"))?;
        Ok(Self::new(a))
    }
}

impl PrivateKey {
    /// Compact binary form. The output contains the secret polynomials.
    pub fn serialize(&self) -> Vec<u8> {
        serialize_polys(self.params(), &[self.s1(), self.s2(), self.a()])
    }

    /// Parse the output of [`PrivateKey::serialize`], re-checking every key
    /// invariant.
    pub fn deserialize(input: &[u8]) -> Result<Self> {
        let [s1, s2, a]: [Poly; 3] = deserialize_polys(input, 3)?
            .try_into()
            .map_err(|_| BlissError::MalformedEncoding("wrong length"))?;
        Self::from_parts(s1, s2, a)
    }
}
