// Copyright (c) 2024 Botho Foundation

#![deny(unsafe_code)]

//! BLISS key management for Botho
//!
//! This crate implements the key side of the BLISS lattice signature
//! scheme: deterministic key generation over the five published parameter
//! sets, plus verbose text and compact binary key encodings.
//!
//! # Overview
//!
//! A private key holds two sparse ternary secrets `s1`, `s2` and the
//! public polynomial
//!
//! ```text
//! a = (2*s2 + 1) * s1^-1   in Z_q[X]/(X^n + 1)
//! ```
//!
//! - **Deterministic**: the same seed and parameter set always produce the
//!   same key, so keys can be reproduced from golden vectors
//! - **Bounded**: every rejection loop has a fixed attempt budget and fails
//!   with [`BlissError::GenerationFailed`] instead of spinning
//! - **Validated decoding**: decoded private keys are re-checked against
//!   the public relation before they are handed out
//!
//! # Example
//!
//! ```rust
//! use bth_crypto_bliss::{generate_private_key, Entropy, PrivateKey, PublicKey, SEED_BYTES};
//!
//! let seed: Vec<u8> = (0..SEED_BYTES).map(|i| (i % 8) as u8).collect();
//! let mut entropy = Entropy::new(&seed).expect("seed is long enough");
//!
//! // BLISS-0
//! let key = generate_private_key(0, &mut entropy).expect("key generation");
//! assert!(key.verify_relation());
//!
//! // Compact form: 1 header byte + 3 * 256 coefficients of 14 bits
//! let bytes = key.serialize();
//! assert_eq!(bytes.len(), 1345);
//! assert_eq!(PrivateKey::deserialize(&bytes).unwrap(), key);
//!
//! // Verbose form of the public key
//! let public = key.public_key();
//! assert_eq!(PublicKey::decode(&public.encode()).unwrap(), public);
//! ```
//!
//! # Parameter Sets
//!
//! | Index | Name      | n   | q     | Public key | Private key |
//! |-------|-----------|-----|-------|------------|-------------|
//! | 0     | BLISS-0   | 256 | 7681  | 449 bytes  | 1,345 bytes |
//! | 1     | BLISS-I   | 512 | 12289 | 961 bytes  | 2,881 bytes |
//! | 2     | BLISS-II  | 512 | 12289 | 961 bytes  | 2,881 bytes |
//! | 3     | BLISS-III | 512 | 12289 | 961 bytes  | 2,881 bytes |
//! | 4     | BLISS-IV  | 512 | 12289 | 961 bytes  | 2,881 bytes |

pub mod codec;
pub mod entropy;
pub mod error;
pub mod keygen;
pub mod keys;
pub mod ntt;
pub mod params;
pub mod polynomial;
pub mod serialize;

// Re-export commonly used types
pub use entropy::{Entropy, EntropySource, RngEntropy};
pub use error::{BlissError, Result};
pub use keygen::{generate_private_key, KeyGenerator};
pub use keys::{public_relation, PrivateKey, PublicKey};
pub use params::{parameter_set, ParameterSet, PARAMETER_SETS, SEED_BYTES};
pub use polynomial::{NotInvertible, Poly};
