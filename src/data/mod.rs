//! Catalog datasets persisted as JSON under the data directory.

pub mod character;
pub mod owned;
pub mod profession;
pub mod registry;

use std::fs;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize {path}: {source}")]
    Serialize {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Pretty-printed JSON, creating parent directories as needed.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), DataError> {
    let display = path.display().to_string();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| DataError::Write {
            path: display.clone(),
            source,
        })?;
    }
    let serialized = serde_json::to_string_pretty(value).map_err(|source| DataError::Serialize {
        path: display.clone(),
        source,
    })?;
    fs::write(path, serialized).map_err(|source| DataError::Write {
        path: display,
        source,
    })
}

/// `Ok(None)` when the file does not exist.
pub fn read_json_if_exists<T: serde::de::DeserializeOwned>(
    path: &Path,
) -> Result<Option<T>, DataError> {
    if !path.exists() {
        return Ok(None);
    }
    let display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| DataError::Read {
        path: display.clone(),
        source,
    })?;
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| DataError::Parse {
            path: display,
            source,
        })
}
