//! Sub-profession names and categories from `uniequip_table.json`.
//!
//! The CN table decides which sub-professions exist; EN supplies the display
//! name when it has a translation.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::fetch::{FetchError, HttpClient};

pub const PROFESSIONS_FILE: &str = "professions.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubProfession {
    pub sub_profession_id: String,
    pub sub_profession_name: String,
    /// Upstream spells it `subProfessionCatagory`.
    #[serde(rename = "subProfessionCatagory", default)]
    pub sub_profession_category: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UniequipTable {
    #[serde(rename = "subProfDict", default)]
    pub sub_prof_dict: IndexMap<String, RawSubProfession>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSubProfession {
    #[serde(rename = "subProfessionName", default)]
    pub name: Option<String>,
    #[serde(rename = "subProfessionCatagory", default)]
    pub category: Option<i64>,
}

pub fn merge_sub_professions(cn: &UniequipTable, en: &UniequipTable) -> Vec<SubProfession> {
    let mut merged: Vec<SubProfession> = cn
        .sub_prof_dict
        .iter()
        .map(|(id, cn_entry)| {
            let en_entry = en.sub_prof_dict.get(id);
            let name = en_entry
                .and_then(|e| e.name.clone())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| {
                    tracing::info!(id = %id, "sub-profession missing in EN data, using id as name");
                    id.clone()
                });
            SubProfession {
                sub_profession_id: id.clone(),
                sub_profession_name: name,
                sub_profession_category: cn_entry.category.or_else(|| en_entry.and_then(|e| e.category)),
            }
        })
        .collect();

    merged.sort_by_key(|p| p.sub_profession_category.unwrap_or(i64::MAX));
    merged
}

pub fn uniequip_table_url(base_url: &str, lang: &str) -> String {
    format!("{base_url}/{lang}/gamedata/excel/uniequip_table.json")
}

pub async fn fetch_sub_professions(
    client: &HttpClient,
    base_url: &str,
) -> Result<Vec<SubProfession>, FetchError> {
    let cn_url = uniequip_table_url(base_url, "cn");
    let en_url = uniequip_table_url(base_url, "en");
    let (cn, en) = tokio::try_join!(
        client.get_json::<UniequipTable>(&cn_url),
        client.get_json::<UniequipTable>(&en_url),
    )?;
    Ok(merge_sub_professions(&cn, &en))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cn_drives_membership_and_en_supplies_names() {
        let cn: UniequipTable = serde_json::from_str(
            r#"{"subProfDict": {
                "physician": {"subProfessionName": "医师", "subProfessionCatagory": 6},
                "pioneer": {"subProfessionName": "尖兵", "subProfessionCatagory": 1},
                "newprof": {"subProfessionName": "新"}
            }}"#,
        )
        .unwrap();
        let en: UniequipTable = serde_json::from_str(
            r#"{"subProfDict": {
                "physician": {"subProfessionName": "Medic", "subProfessionCatagory": 6},
                "pioneer": {"subProfessionName": "Pioneer", "subProfessionCatagory": 1},
                "enonly": {"subProfessionName": "EN only", "subProfessionCatagory": 2}
            }}"#,
        )
        .unwrap();

        let merged = merge_sub_professions(&cn, &en);
        let ids: Vec<&str> = merged.iter().map(|p| p.sub_profession_id.as_str()).collect();
        assert_eq!(ids, vec!["pioneer", "physician", "newprof"]);
        assert_eq!(merged[0].sub_profession_name, "Pioneer");
        assert_eq!(merged[2].sub_profession_name, "newprof");
        assert_eq!(merged[2].sub_profession_category, None);
    }
}
