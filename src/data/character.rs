//! Character table: upstream `character_table.json` -> compact catalog records.
//!
//! The EN table is authoritative. Characters only present in the CN table are
//! appended, named by their CN `appellation` when it has one.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::DataError;
use crate::fetch::{FetchError, HttpClient};

pub const CHARS_FILE: &str = "chars.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub profession: Option<String>,
    #[serde(default)]
    pub sub_profession_id: Option<String>,
}

impl Character {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: Some(name.to_string()),
            rarity: None,
            profession: None,
            sub_profession_id: None,
        }
    }
}

/// Upstream record; only the fields the catalog reads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCharacter {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub appellation: Option<Value>,
    #[serde(default)]
    pub rarity: Option<Value>,
    #[serde(default)]
    pub profession: Option<Value>,
    #[serde(default)]
    pub sub_profession_id: Option<Value>,
    #[serde(default)]
    pub is_not_obtainable: Option<bool>,
}

/// Upstream table in document order.
pub type CharacterTable = IndexMap<String, RawCharacter>;

fn as_string(value: &Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    }
}

fn stringify(value: &Option<Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

/// Keep obtainable `char_*` entries, in table key order.
pub fn transform_character_table(table: &CharacterTable) -> Vec<Character> {
    table
        .iter()
        .filter(|(id, raw)| id.starts_with("char_") && raw.is_not_obtainable != Some(true))
        .map(|(id, raw)| Character {
            id: id.clone(),
            name: as_string(&raw.name).or_else(|| as_string(&raw.appellation)),
            rarity: stringify(&raw.rarity),
            profession: as_string(&raw.profession),
            sub_profession_id: as_string(&raw.sub_profession_id),
        })
        .collect()
}

pub fn merge_supplemental(primary: &mut Vec<Character>, supplemental: &CharacterTable) {
    let existing: HashSet<String> = primary.iter().map(|c| c.id.clone()).collect();
    for mut character in transform_character_table(supplemental) {
        if existing.contains(&character.id) {
            continue;
        }
        if let Some(appellation) = supplemental
            .get(&character.id)
            .and_then(|raw| as_string(&raw.appellation))
        {
            character.name = Some(appellation);
        }
        tracing::info!(
            id = %character.id,
            name = character.name.as_deref().unwrap_or(""),
            "appending CN-only character"
        );
        primary.push(character);
    }
}

pub fn character_table_url(base_url: &str, lang: &str) -> String {
    format!("{base_url}/{lang}/gamedata/excel/character_table.json")
}

/// EN table is required; the CN supplement is best effort.
pub async fn fetch_characters(
    client: &HttpClient,
    base_url: &str,
) -> Result<Vec<Character>, FetchError> {
    let en: CharacterTable = client.get_json(&character_table_url(base_url, "en")).await?;
    let mut characters = transform_character_table(&en);

    match client
        .get_json::<CharacterTable>(&character_table_url(base_url, "cn"))
        .await
    {
        Ok(cn) => merge_supplemental(&mut characters, &cn),
        Err(err) => tracing::warn!("CN character table unavailable, using EN only: {err}"),
    }

    Ok(characters)
}

pub fn load_characters(path: impl AsRef<Path>) -> Result<Vec<Character>, DataError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| DataError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| DataError::Parse {
        path: path.display().to_string(),
        source,
    })
}

pub fn save_characters(path: impl AsRef<Path>, characters: &[Character]) -> Result<(), DataError> {
    crate::data::write_json(path.as_ref(), characters)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(json: &str) -> CharacterTable {
        serde_json::from_str(json).expect("table fixture should parse")
    }

    #[test]
    fn keeps_only_obtainable_char_entries() {
        let t = table(
            r#"{
                "char_002_amiya": {"name": "Amiya", "rarity": "TIER_5", "profession": "CASTER", "subProfessionId": "corecaster"},
                "token_10000_silent_healrb": {"name": "Drone"},
                "char_512_aprot": {"name": "Shalem", "isNotObtainable": true},
                "char_285_medic2": {"appellation": "Lancet-2", "rarity": 0}
            }"#,
        );
        let chars = transform_character_table(&t);
        assert_eq!(chars.len(), 2);
        assert_eq!(chars[0].id, "char_002_amiya");
        assert_eq!(chars[0].rarity.as_deref(), Some("TIER_5"));
        assert_eq!(chars[0].sub_profession_id.as_deref(), Some("corecaster"));
        assert_eq!(chars[1].name.as_deref(), Some("Lancet-2"));
        assert_eq!(chars[1].rarity.as_deref(), Some("0"));
    }

    #[test]
    fn supplement_appends_missing_ids_with_cn_appellation() {
        let en = table(r#"{"char_002_amiya": {"name": "Amiya"}}"#);
        let cn = table(
            r#"{
                "char_002_amiya": {"name": "阿米娅", "appellation": "Amiya"},
                "char_4145_ulpia": {"name": "乌尔比安", "appellation": "Ulpianus"}
            }"#,
        );
        let mut chars = transform_character_table(&en);
        merge_supplemental(&mut chars, &cn);
        assert_eq!(chars.len(), 2);
        assert_eq!(chars[0].name.as_deref(), Some("Amiya"));
        assert_eq!(chars[1].id, "char_4145_ulpia");
        assert_eq!(chars[1].name.as_deref(), Some("Ulpianus"));
    }

    #[test]
    fn table_order_is_kept_over_key_order() {
        let t = table(
            r#"{
                "char_101_sora": {"name": "Sora"},
                "char_1001_amiya2": {"name": "Amiya"},
                "char_002_amiya": {"name": "Amiya"}
            }"#,
        );
        let ids: Vec<String> = transform_character_table(&t).into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["char_101_sora", "char_1001_amiya2", "char_002_amiya"]);
    }

    #[test]
    fn catalog_file_uses_camel_case_keys() {
        let json = serde_json::to_value(Character {
            sub_profession_id: Some("fearless".into()),
            ..Character::new("char_009_12fce", "12F")
        })
        .unwrap();
        assert_eq!(json["subProfessionId"], "fearless");
    }
}
