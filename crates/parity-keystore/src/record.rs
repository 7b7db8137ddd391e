use std::fmt;

use serde::{Deserialize, Serialize};

/// The persisted keystore record. Field names on disk match existing
/// keystore files; the camelCase spellings are accepted on read.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, alias = "authToken", skip_serializing_if = "is_blank")]
    pub auth_token: Option<String>,
    /// Hex-encoded secp256k1 scalar.
    #[serde(
        default,
        rename = "private_key",
        alias = "keyMaterial",
        skip_serializing_if = "is_blank"
    )]
    pub key_material: Option<String>,
    /// Unix seconds at which `auth_token` was last written.
    #[serde(default, alias = "createdAt", skip_serializing_if = "is_zero")]
    pub created_at: i64,
}

/// Validity of the stored token at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    Missing,
    Valid { expires_in_secs: i64 },
    Expired { expired_for_secs: i64 },
}

impl Record {
    /// Stored token, treating an empty string as absent.
    pub fn token(&self) -> Option<&str> {
        self.auth_token.as_deref().filter(|t| !t.is_empty())
    }

    /// Stored key hex, treating an empty string as absent.
    pub fn key_hex(&self) -> Option<&str> {
        self.key_material.as_deref().filter(|k| !k.is_empty())
    }

    /// A token is expired once its age is strictly greater than `expiry_secs`.
    pub fn token_state(&self, now_unix: i64, expiry_secs: u64) -> TokenState {
        if self.token().is_none() {
            return TokenState::Missing;
        }
        let expiry = i64::try_from(expiry_secs).unwrap_or(i64::MAX);
        let age = now_unix.saturating_sub(self.created_at);
        if age > expiry {
            TokenState::Expired {
                expired_for_secs: age.saturating_sub(expiry),
            }
        } else {
            TokenState::Valid {
                expires_in_secs: expiry.saturating_sub(age),
            }
        }
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("auth_token", &self.token().map(|_| "<redacted>"))
            .field("key_material", &self.key_hex().map(|_| "<redacted>"))
            .field("created_at", &self.created_at)
            .finish()
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}
