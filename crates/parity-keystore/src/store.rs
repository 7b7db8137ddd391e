use std::path::{Path, PathBuf};

use parity_core::{
    clock::{Clock, SystemClock},
    keys::PrivateKey,
};
use tracing::{debug, instrument, warn};

use crate::{
    config::{KeystoreConfig, ResolvedConfig},
    error::KeystoreError,
    file,
    record::{Record, TokenState},
};

/// Single-file store for one auth token and one private key.
///
/// Every read re-loads the file and replaces the in-memory record, so edits made
/// by another process are picked up. Saves write the whole in-memory record, so
/// a token and a key saved through the same instance both survive. There is no
/// locking; share one instance behind your own synchronization if needed.
pub struct CredentialStore<C: Clock = SystemClock> {
    config: ResolvedConfig,
    path: PathBuf,
    record: Record,
    clock: C,
}

/// Snapshot of what the keystore currently holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeystoreStatus {
    pub path: PathBuf,
    pub exists: bool,
    pub token: TokenState,
    pub token_created_at: Option<i64>,
    pub has_private_key: bool,
}

impl CredentialStore<SystemClock> {
    /// Open a store using the system clock. Creates the directory if needed;
    /// the record file itself is not touched until the first save or load.
    pub fn open(config: &KeystoreConfig) -> Result<Self, KeystoreError> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> CredentialStore<C> {
    pub fn with_clock(config: &KeystoreConfig, clock: C) -> Result<Self, KeystoreError> {
        let config = config.resolve()?;
        file::ensure_dir(&config.dir)?;
        let path = config.path();
        debug!(path = %path.display(), "keystore opened");

        Ok(Self {
            config,
            path,
            record: Record::default(),
            clock,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn token_expiry_secs(&self) -> u64 {
        self.config.token_expiry_secs
    }

    #[instrument(skip_all)]
    pub fn save_token(&mut self, token: &str) -> Result<(), KeystoreError> {
        if token.is_empty() {
            return Err(KeystoreError::EmptyToken);
        }

        self.record.auth_token = Some(token.to_string());
        self.record.created_at = self.clock.now_unix();
        self.save()
    }

    #[instrument(skip_all)]
    pub fn load_token(&mut self) -> Result<String, KeystoreError> {
        self.load()?;

        let state = self
            .record
            .token_state(self.clock.now_unix(), self.config.token_expiry_secs);
        match (state, self.record.token()) {
            (TokenState::Valid { .. }, Some(token)) => Ok(token.to_string()),
            (TokenState::Expired { expired_for_secs }, _) => {
                warn!(expired_for_secs, "stored token has expired");
                Err(KeystoreError::TokenExpired)
            }
            _ => Err(KeystoreError::InvalidToken),
        }
    }

    /// Validate and persist a hex-encoded private key. An invalid key is never written.
    #[instrument(skip_all)]
    pub fn save_private_key(&mut self, key_hex: &str) -> Result<(), KeystoreError> {
        PrivateKey::from_hex(key_hex).map_err(KeystoreError::InvalidKeyFormat)?;

        self.record.key_material = Some(key_hex.to_string());
        self.save()
    }

    #[instrument(skip_all)]
    pub fn load_private_key(&mut self) -> Result<PrivateKey, KeystoreError> {
        let key_hex = self.stored_key_hex()?;
        PrivateKey::from_hex(&key_hex).map_err(KeystoreError::KeyDecode)
    }

    /// Stored key exactly as saved, without decoding it.
    #[instrument(skip_all)]
    pub fn private_key_hex(&mut self) -> Result<String, KeystoreError> {
        self.stored_key_hex()
    }

    /// Refresh the in-memory record from disk so a following save keeps what
    /// other instances stored. A missing file resets the record and returns `false`.
    #[instrument(skip_all)]
    pub fn reload(&mut self) -> Result<bool, KeystoreError> {
        match self.load() {
            Ok(()) => Ok(true),
            Err(KeystoreError::NoKeystore { .. }) => {
                self.record = Record::default();
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Report what is stored without failing on a missing file.
    #[instrument(skip_all)]
    pub fn status(&mut self) -> Result<KeystoreStatus, KeystoreError> {
        let exists = self.reload()?;
        let token = if exists {
            self.record
                .token_state(self.clock.now_unix(), self.config.token_expiry_secs)
        } else {
            TokenState::Missing
        };

        Ok(KeystoreStatus {
            path: self.path.clone(),
            exists,
            token,
            token_created_at: self.record.token().map(|_| self.record.created_at),
            has_private_key: exists && self.record.key_hex().is_some(),
        })
    }

    fn stored_key_hex(&mut self) -> Result<String, KeystoreError> {
        self.load()?;
        self.record
            .key_hex()
            .map(str::to_string)
            .ok_or(KeystoreError::NoPrivateKey)
    }

    fn save(&self) -> Result<(), KeystoreError> {
        file::write_record(&self.path, &self.record)?;
        debug!(path = %self.path.display(), "keystore saved");
        Ok(())
    }

    fn load(&mut self) -> Result<(), KeystoreError> {
        self.record = file::read_record(&self.path)?;
        debug!(path = %self.path.display(), "keystore loaded");
        Ok(())
    }
}
