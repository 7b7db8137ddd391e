use std::fmt;

use k256::ecdsa::SigningKey;
use rand::rngs::OsRng;
use sha3::{Digest, Keccak256};
use thiserror::Error;

/// Length in bytes of a secp256k1 private scalar.
pub const PRIVATE_KEY_LEN: usize = 32;

#[derive(Debug, Error, PartialEq)]
pub enum KeyFormatError {
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("expected 32 bytes, got {0}")]
    Length(usize),
    #[error("scalar is zero or not below the curve order")]
    Scalar,
}

/// secp256k1 private key handle.
///
/// The `Debug` impl never prints key bytes; use [`PrivateKey::to_hex`] when the
/// encoded form is really needed.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    inner: SigningKey,
}

impl PrivateKey {
    /// Parse a hex-encoded 32-byte scalar (no `0x` prefix).
    pub fn from_hex(encoded: &str) -> Result<Self, KeyFormatError> {
        let bytes = hex::decode(encoded)?;
        if bytes.len() != PRIVATE_KEY_LEN {
            return Err(KeyFormatError::Length(bytes.len()));
        }
        let inner = SigningKey::from_slice(&bytes).map_err(|_| KeyFormatError::Scalar)?;
        Ok(Self { inner })
    }

    /// Fresh key from the OS random source.
    pub fn generate() -> Self {
        Self {
            inner: SigningKey::random(&mut OsRng),
        }
    }

    /// Lowercase hex of the private scalar.
    pub fn to_hex(&self) -> String {
        hex::encode(self.inner.to_bytes())
    }

    /// Uncompressed SEC1 public key (`04 || x || y`) as lowercase hex.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.uncompressed_public_key())
    }

    /// EIP-55 checksummed address derived from the public key.
    pub fn address(&self) -> String {
        let public = self.uncompressed_public_key();
        let hash = Keccak256::digest(&public[1..]);
        checksum_address(&hex::encode(&hash[12..]))
    }

    fn uncompressed_public_key(&self) -> Vec<u8> {
        self.inner
            .verifying_key()
            .to_encoded_point(false)
            .as_bytes()
            .to_vec()
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

fn checksum_address(lower_hex: &str) -> String {
    let hash = Keccak256::digest(lower_hex.as_bytes());
    let mut out = String::with_capacity(2 + lower_hex.len());
    out.push_str("0x");
    for (i, c) in lower_hex.chars().enumerate() {
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}
