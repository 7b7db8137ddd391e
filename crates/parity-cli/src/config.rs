use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use color_eyre::{eyre::WrapErr, Result};
use parity_keystore::KeystoreConfig;
use serde::{Deserialize, Serialize};

/// On-disk CLI settings: `<config dir>/parity/config.toml`.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub keystore: KeystoreConfig,
}

/// Command-line flags that win over the `[keystore]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub dir: Option<PathBuf>,
    pub file_name: Option<String>,
}

impl Overrides {
    fn apply(&self, mut keystore: KeystoreConfig) -> KeystoreConfig {
        if let Some(dir) = &self.dir {
            keystore.dir = Some(dir.clone());
        }
        if let Some(file_name) = &self.file_name {
            keystore.file_name = Some(file_name.clone());
        }
        keystore
    }
}

/// Keystore settings for this run: the user's config file with flags on top.
pub fn load(overrides: &Overrides) -> Result<KeystoreConfig> {
    load_from(&config_path()?, overrides)
}

fn load_from(path: &Path, overrides: &Overrides) -> Result<KeystoreConfig> {
    let config = read_config(path)?;
    Ok(overrides.apply(config.keystore))
}

/// A missing or blank file means "all defaults".
fn read_config(path: &Path) -> Result<Config> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(err) => {
            return Err(err).wrap_err_with(|| format!("reading {}", path.display()));
        }
    };
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    toml::from_str(&contents).wrap_err_with(|| format!("parsing {}", path.display()))
}

pub fn config_path() -> Result<PathBuf> {
    let base =
        dirs::config_dir().ok_or_else(|| color_eyre::eyre::eyre!("no config dir available"))?;
    Ok(base.join("parity").join("config.toml"))
}

/// Write `config` to the default location. Returns the path and whether a
/// new file was created; an existing file is left as the user wrote it.
pub fn init(config: &Config) -> Result<(PathBuf, bool)> {
    let path = config_path()?;
    let created = create_if_missing(config, &path)?;
    Ok((path, created))
}

fn create_if_missing(config: &Config, path: &Path) -> Result<bool> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(err) => return Err(err.into()),
    };
    file.write_all(toml::to_string_pretty(config)?.as_bytes())?;
    Ok(true)
}
