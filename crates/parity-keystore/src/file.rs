use std::{
    fs::{self, File},
    io::{self, Read, Write},
    path::Path,
};

use tempfile::NamedTempFile;

use crate::{error::KeystoreError, record::Record};

/// Owner read/write/execute.
pub(crate) const DIR_MODE: u32 = 0o700;
/// Owner read/write.
pub(crate) const FILE_MODE: u32 = 0o600;

/// Create `dir` (and parents) if missing. Newly created directories get `DIR_MODE`;
/// an existing directory keeps its permissions.
pub(crate) fn ensure_dir(dir: &Path) -> Result<(), KeystoreError> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder
        .create(dir)
        .map_err(|source| KeystoreError::Directory {
            path: dir.to_path_buf(),
            source,
        })
}

/// Replace the file at `path` with the pretty-printed record.
/// The content goes to a sibling temp file first and is renamed into place.
pub(crate) fn write_record(path: &Path, record: &Record) -> Result<(), KeystoreError> {
    let json = serde_json::to_vec_pretty(record).map_err(KeystoreError::Serialize)?;
    let write_err = |source: io::Error| KeystoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let parent = path
        .parent()
        .ok_or_else(|| write_err(io::Error::other("keystore path has no parent directory")))?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(write_err)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(FILE_MODE))
            .map_err(write_err)?;
    }
    tmp.write_all(&json).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

pub(crate) fn read_record(path: &Path) -> Result<Record, KeystoreError> {
    let mut file = File::open(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            KeystoreError::NoKeystore {
                path: path.to_path_buf(),
            }
        } else {
            KeystoreError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let mut buf = Vec::new();
    file.read_to_end(&mut buf)
        .map_err(|source| KeystoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_slice(&buf).map_err(|source| KeystoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
