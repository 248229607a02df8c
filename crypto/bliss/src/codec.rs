//! Verbose text encoding of BLISS keys.
//!
//! The first line is the parameter set index, followed by one line per
//! polynomial (`s1`, `s2`, `a` for a private key, `a` for a public key).
//! Coefficients are centered decimals separated by single spaces:
//!
//! ```text
//! 0
//! 0 1 -1 0 ...
//! ```
//!
//! Decoding accepts any ASCII whitespace between tokens.

use crate::{
    error::{BlissError, Result},
    keys::{PrivateKey, PublicKey},
    params::parameter_set,
    polynomial::Poly,
};
use core::fmt;
use zeroize::Zeroizing;

fn write_poly(f: &mut fmt::Formatter<'_>, poly: &Poly) -> fmt::Result {
    let mut coeffs = poly.coefficients().iter();
    if let Some(first) = coeffs.next() {
        write!(f, "{first}")?;
    }
    for c in coeffs {
        write!(f, " {c}")?;
    }
    writeln!(f)
}

/// Whether `token` is a decimal exactly as `encode` writes it: an optional
/// `-`, no `+`, no leading zeros and no `-0`.
fn is_canonical_decimal(token: &str) -> bool {
    let digits = token.strip_prefix('-').unwrap_or(token);
    match digits.as_bytes() {
        [] => false,
        [b'0'] => digits.len() == token.len(),
        [first, rest @ ..] => {
            (b'1'..=b'9').contains(first) && rest.iter().all(u8::is_ascii_digit)
        }
    }
}

/// Parse the index header and exactly `count` polynomials.
fn decode_polys(input: &[u8], count: usize) -> Result<Vec<Poly>> {
    let text =
        core::str::from_utf8(input).map_err(|_| BlissError::MalformedEncoding("not valid UTF-8"))?;
    let mut tokens = text.split_ascii_whitespace();

    let header = tokens
        .next()
        .ok_or(BlissError::MalformedEncoding("empty input"))?;
    let index: u8 = is_canonical_decimal(header)
        .then(|| header.parse().ok())
        .flatten()
        .ok_or(BlissError::MalformedEncoding("invalid parameter index"))?;
    let params =
        parameter_set(index).map_err(|_| BlissError::MalformedEncoding("unknown parameter set"))?;

    let values = Zeroizing::new(
        tokens
            .map(|t| {
                is_canonical_decimal(t)
                    .then(|| t.parse::<i32>().ok())
                    .flatten()
                    .ok_or(BlissError::MalformedEncoding("invalid coefficient"))
            })
            .collect::<Result<Vec<i32>>>()?,
    );
    if values.len() != count * params.n {
        return Err(BlissError::MalformedEncoding("wrong coefficient count"));
    }

    values
        .chunks(params.n)
        .map(|chunk| Poly::from_coefficients(params, chunk.to_vec()))
        .collect()
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.parameter_index())?;
        write_poly(f, self.a())
    }
}

impl fmt::Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.parameter_index())?;
        write_poly(f, self.s1())?;
        write_poly(f, self.s2())?;
        write_poly(f, self.a())
    }
}

impl PublicKey {
    /// Verbose text encoding.
    pub fn encode(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }

    /// Decode the output of [`PublicKey::encode`].
    pub fn decode(input: &[u8]) -> Result<Self> {
        let [a]: [Poly; 1] = decode_polys(input, 1)?
            .try_into()
            .map_err(|_| BlissError::MalformedEncoding("wrong coefficient count"))?;
        Ok(Self::new(a))
    }
}

impl PrivateKey {
    /// Verbose text encoding. The output contains the secret polynomials.
    pub fn encode(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }

    /// Decode the output of [`PrivateKey::encode`], re-checking every key
    /// invariant.
    pub fn decode(input: &[u8]) -> Result<Self> {
        let [s1, s2, a]: [Poly; 3] = decode_polys(input, 3)?
            .try_into()
            .map_err(|_| BlissError::MalformedEncoding("wrong coefficient count"))?;
        Self::from_parts(s1, s2, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{entropy::Entropy, keygen::generate_private_key, params::SEED_BYTES};

    fn test_key(index: u8) -> PrivateKey {
        let seed: Vec<u8> = (0..SEED_BYTES).map(|i| (i % 8) as u8).collect();
        let mut entropy = Entropy::new(&seed).unwrap();
        generate_private_key(index, &mut entropy).unwrap()
    }

    fn malformed(reason: &'static str) -> Result<PublicKey> {
        Err(BlissError::MalformedEncoding(reason))
    }

    #[test]
    fn test_encode_layout() {
        let key = test_key(0);
        let text = String::from_utf8(key.encode()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "0");
        assert!(text.ends_with('\n'));
        for line in &lines[1..] {
            assert_eq!(line.split(' ').count(), 256);
        }

        let public = String::from_utf8(key.public_key().encode()).unwrap();
        assert_eq!(public.lines().nth(1), Some(lines[3]));
        assert_eq!(public, key.public_key().to_string());
    }

    #[test]
    fn test_roundtrip() {
        for index in [0u8, 4] {
            let key = test_key(index);
            assert_eq!(PrivateKey::decode(&key.encode()).unwrap(), key);
            let public = key.public_key();
            assert_eq!(PublicKey::decode(&public.encode()).unwrap(), public);
        }
    }

    #[test]
    fn test_decode_accepts_any_whitespace() {
        let public = test_key(0).public_key();
        let text = public.to_string().replace('\n', "\r\n").replacen(' ', "\t  ", 10);
        assert_eq!(PublicKey::decode(text.as_bytes()).unwrap(), public);
    }

    #[test]
    fn test_decode_rejects_bad_header() {
        assert_eq!(PublicKey::decode(b""), malformed("empty input"));
        assert_eq!(PublicKey::decode(b"  \n\t"), malformed("empty input"));
        assert_eq!(PublicKey::decode(&[0xff, 0xfe]), malformed("not valid UTF-8"));
        assert_eq!(PublicKey::decode(b"x\n0 0"), malformed("invalid parameter index"));
        assert_eq!(PublicKey::decode(b"5\n0 0"), malformed("unknown parameter set"));
        assert_eq!(PublicKey::decode(b"300\n0 0"), malformed("invalid parameter index"));
    }

    #[test]
    fn test_decode_rejects_bad_body() {
        let public = test_key(0).public_key();
        let text = public.to_string();

        // Truncated by one coefficient.
        let cut = text.trim_end().rsplit_once(' ').unwrap().0;
        assert_eq!(PublicKey::decode(cut.as_bytes()), malformed("wrong coefficient count"));

        let extra = format!("{text} 1");
        assert_eq!(PublicKey::decode(extra.as_bytes()), malformed("wrong coefficient count"));

        let garbage = format!("{text} zz");
        assert_eq!(PublicKey::decode(garbage.as_bytes()), malformed("invalid coefficient"));

        let mut tokens: Vec<String> = text.split_ascii_whitespace().map(str::to_owned).collect();
        tokens[1] = "3841".to_owned();
        assert_eq!(
            PublicKey::decode(tokens.join(" ").as_bytes()),
            malformed("coefficient out of range")
        );
    }

    #[test]
    fn test_canonical_decimal() {
        for ok in ["0", "7", "-1", "3840", "-3840"] {
            assert!(is_canonical_decimal(ok), "{ok}");
        }
        for bad in ["", "-", "+1", "007", "-0", "-01", "1a", "--1", "1-"] {
            assert!(!is_canonical_decimal(bad), "{bad}");
        }
    }

    #[test]
    fn test_decode_rejects_non_canonical_text() {
        let public = test_key(0).public_key();
        let text = public.to_string();
        let mut tokens: Vec<String> = text.split_ascii_whitespace().map(str::to_owned).collect();

        // Leading zeros and explicit signs would re-encode differently.
        for (position, token) in [(1, format!("+{}", tokens[1])), (2, format!("00{}", tokens[2]))] {
            let saved = core::mem::replace(&mut tokens[position], token);
            assert_eq!(
                PublicKey::decode(tokens.join(" ").as_bytes()),
                malformed("invalid coefficient")
            );
            tokens[position] = saved;
        }
        assert_eq!(PublicKey::decode(tokens.join(" ").as_bytes()).unwrap(), public);

        tokens[0] = "00".to_owned();
        assert_eq!(
            PublicKey::decode(tokens.join(" ").as_bytes()),
            malformed("invalid parameter index")
        );
        tokens[0] = "+0".to_owned();
        assert_eq!(
            PublicKey::decode(tokens.join(" ").as_bytes()),
            malformed("invalid parameter index")
        );
    }

    #[test]
    fn test_private_decode_checks_key_invariants() {
        let key = test_key(0);

        // Public key text is too short to be a private key.
        assert_eq!(
            PrivateKey::decode(&key.public_key().encode()).map(|_| ()),
            Err(BlissError::MalformedEncoding("wrong coefficient count"))
        );

        // Flip one coefficient of a: still well-formed text, broken relation.
        let mut lines: Vec<String> = key.to_string().lines().map(str::to_owned).collect();
        let mut a: Vec<i32> = key.a().coefficients().to_vec();
        a[0] = if a[0] == 0 { 1 } else { 0 };
        lines[3] = a.iter().map(i32::to_string).collect::<Vec<_>>().join(" ");
        assert_eq!(
            PrivateKey::decode(lines.join("\n").as_bytes()).map(|_| ()),
            Err(BlissError::MalformedEncoding("public polynomial does not match secret"))
        );

        // A non-ternary s1.
        let mut s1: Vec<i32> = key.s1().coefficients().to_vec();
        s1[0] = 2;
        lines[1] = s1.iter().map(i32::to_string).collect::<Vec<_>>().join(" ");
        assert_eq!(
            PrivateKey::decode(lines.join("\n").as_bytes()).map(|_| ()),
            Err(BlissError::MalformedEncoding("s1 is not a sparse ternary secret"))
        );
    }
}
