//! File-backed credential store holding one auth token and one private key.
//! The record lives in a single JSON file (default `~/.parity/keystore.json`)
//! that is rewritten whole on every save and re-read before every load.

pub mod config;
pub mod error;
mod file;
pub mod record;
pub mod store;

pub use config::{KeystoreConfig, ResolvedConfig};
pub use error::KeystoreError;
pub use record::{Record, TokenState};
pub use store::{CredentialStore, KeystoreStatus};
