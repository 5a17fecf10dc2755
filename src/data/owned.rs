//! The player's owned set, persisted between runs.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::{read_json_if_exists, write_json, DataError};

pub const OWNED_FILE: &str = "owned.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Imported ids overwrite the previous set.
    #[default]
    Replace,
    Union,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default)]
    pub ids: BTreeSet<String>,
}

impl OwnedSet {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn apply<I, S>(&mut self, imported: I, policy: MergePolicy, source: &str)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if policy == MergePolicy::Replace {
            self.ids.clear();
        }
        self.ids.extend(imported.into_iter().map(Into::into));
        self.source = Some(source.to_string());
        self.updated = Some(chrono::Utc::now().format("%Y-%m-%d").to_string());
    }
}

/// Missing file -> empty set.
pub fn load_owned(path: impl AsRef<Path>) -> Result<OwnedSet, DataError> {
    Ok(read_json_if_exists(path.as_ref())?.unwrap_or_default())
}

pub fn save_owned(path: impl AsRef<Path>, owned: &OwnedSet) -> Result<(), DataError> {
    write_json(path.as_ref(), owned)
}
