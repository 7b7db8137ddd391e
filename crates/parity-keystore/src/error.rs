use std::{io, path::PathBuf};

use parity_core::keys::KeyFormatError;
use thiserror::Error;

/// Errors produced by the credential store. Every failure is returned to the caller.
#[derive(Debug, Error)]
pub enum KeystoreError {
    #[error("token cannot be empty")]
    EmptyToken,
    /// The record file does not exist yet (nothing was ever saved).
    #[error("no keystore found at {} - please authenticate first", .path.display())]
    NoKeystore { path: PathBuf },
    #[error("token has expired - please re-authenticate")]
    TokenExpired,
    /// The record file exists but holds no token.
    #[error("invalid token found in keystore")]
    InvalidToken,
    #[error("no private key found in keystore")]
    NoPrivateKey,
    #[error("invalid private key format: {0}")]
    InvalidKeyFormat(#[source] KeyFormatError),
    /// Stored key material no longer parses even though it was validated on save.
    #[error("stored private key is corrupted: {0}")]
    KeyDecode(#[source] KeyFormatError),
    #[error("could not resolve home directory for the default keystore location")]
    HomeDirectory,
    #[error("failed to create keystore directory {}: {source}", .path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read keystore {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write keystore {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse keystore {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize keystore: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl KeystoreError {
    /// True for failures a caller should answer by asking the user to
    /// authenticate (or import a key) again, as opposed to I/O trouble.
    pub fn is_reauthentication_required(&self) -> bool {
        matches!(
            self,
            KeystoreError::NoKeystore { .. }
                | KeystoreError::InvalidToken
                | KeystoreError::TokenExpired
                | KeystoreError::NoPrivateKey
        )
    }
}
