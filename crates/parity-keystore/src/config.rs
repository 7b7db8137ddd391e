use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::KeystoreError;

/// Directory under the user's home that holds the keystore by default.
pub const DEFAULT_DIR_NAME: &str = ".parity";
/// Record file name used when none is configured.
pub const DEFAULT_FILE_NAME: &str = "keystore.json";
/// Seconds after which a saved token is treated as expired.
pub const DEFAULT_TOKEN_EXPIRY_SECS: u64 = 3600;

/// User-facing keystore options. Every field is optional; unset (or empty)
/// values fall back to the defaults above.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeystoreConfig {
    /// Directory holding the record file.
    pub dir: Option<PathBuf>,
    /// Name of the record file inside `dir`.
    pub file_name: Option<String>,
    /// Token lifetime in seconds.
    pub token_expiry_secs: Option<u64>,
}

/// Concrete settings after defaults have been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub dir: PathBuf,
    pub file_name: String,
    pub token_expiry_secs: u64,
}

impl KeystoreConfig {
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_token_expiry_secs(mut self, secs: u64) -> Self {
        self.token_expiry_secs = Some(secs);
        self
    }

    /// Apply defaults. Only touches the home directory lookup when `dir` is unset.
    pub fn resolve(&self) -> Result<ResolvedConfig, KeystoreError> {
        let dir = match self.dir.as_deref() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => default_dir()?,
        };
        let file_name = match self.file_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => DEFAULT_FILE_NAME.to_string(),
        };

        Ok(ResolvedConfig {
            dir,
            file_name,
            token_expiry_secs: self.token_expiry_secs.unwrap_or(DEFAULT_TOKEN_EXPIRY_SECS),
        })
    }
}

impl ResolvedConfig {
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

/// `<home>/.parity`
pub fn default_dir() -> Result<PathBuf, KeystoreError> {
    let home = dirs::home_dir().ok_or(KeystoreError::HomeDirectory)?;
    Ok(default_dir_in(&home))
}

fn default_dir_in(home: &Path) -> PathBuf {
    home.join(DEFAULT_DIR_NAME)
}
