use color_eyre::Result;
use parity_keystore::{CredentialStore, KeystoreConfig};
use tracing::debug;

/// Open the keystore, creating its directory when needed.
pub fn open_store(keystore: &KeystoreConfig) -> Result<CredentialStore> {
    debug!(?keystore, "opening keystore");
    Ok(CredentialStore::open(keystore)?)
}
