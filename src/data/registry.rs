//! Data registry: versioning and source tracking for each dataset.
//! Written by the fetch and extraction pipelines; read by the API to show "data as of".

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::{read_json_if_exists, write_json, DataError};

pub const REGISTRY_FILE: &str = "registry.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSetEntry {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    pub path: String,
}

pub type Registry = BTreeMap<String, DataSetEntry>;

pub fn load_registry(path: impl AsRef<Path>) -> Result<Registry, DataError> {
    Ok(read_json_if_exists(path.as_ref())?.unwrap_or_default())
}

/// Upsert one dataset entry stamped with today's UTC date.
pub fn record_dataset(
    registry_path: impl AsRef<Path>,
    name: &str,
    source: &str,
    file: &str,
) -> Result<DataSetEntry, DataError> {
    let registry_path = registry_path.as_ref();
    let mut registry = load_registry(registry_path)?;
    let entry = DataSetEntry {
        source: source.to_string(),
        data_version: None,
        last_updated: Some(chrono::Utc::now().format("%Y-%m-%d").to_string()),
        path: file.to_string(),
    };
    registry.insert(name.to_string(), entry.clone());
    write_json(registry_path, &registry)?;
    tracing::info!(dataset = name, "updated {}", registry_path.display());
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_dataset_upserts_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(REGISTRY_FILE);

        record_dataset(&path, "chars", "ArknightsGameData", "chars.json").unwrap();
        record_dataset(&path, "char_tiers", "gviz", "char_tiers.json").unwrap();
        record_dataset(&path, "chars", "ArknightsGameData (en+cn)", "chars.json").unwrap();

        let registry = load_registry(&path).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry["chars"].source, "ArknightsGameData (en+cn)");
        assert_eq!(registry["char_tiers"].path, "char_tiers.json");
        assert_eq!(registry["chars"].last_updated.as_ref().map(String::len), Some(10));
    }
}
