//! Sub-profession groups, ranked by their best tier.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::catalog::highest_tier_value;
use crate::data::character::Character;
use crate::tiers::TierMap;

pub const OTHER_GROUP: &str = "Other";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMeta {
    pub key: String,
    pub chars: Vec<Character>,
    pub total: usize,
    pub owned_count: usize,
    pub max_tier_value: i32,
}

/// Characters by `sub_profession_id`; characters without one go to `"Other"`.
pub fn build_groups(chars: &[Character]) -> BTreeMap<String, Vec<Character>> {
    let mut groups: BTreeMap<String, Vec<Character>> = BTreeMap::new();
    for character in chars {
        let key = character
            .sub_profession_id
            .as_deref()
            .filter(|k| !k.is_empty())
            .unwrap_or(OTHER_GROUP);
        groups.entry(key.to_string()).or_default().push(character.clone());
    }
    groups
}

/// `"Other"` last; the rest by best tier descending, then key.
pub fn sort_group_keys(groups: &BTreeMap<String, Vec<Character>>, tiers: &TierMap) -> Vec<String> {
    let mut ranked: Vec<(&String, i32)> = groups
        .iter()
        .map(|(key, members)| (key, highest_tier_value(members, tiers)))
        .collect();
    ranked.sort_by(|(a_key, a_max), (b_key, b_max)| {
        (a_key.as_str() == OTHER_GROUP)
            .cmp(&(b_key.as_str() == OTHER_GROUP))
            .then_with(|| b_max.cmp(a_max))
            .then_with(|| a_key.cmp(b_key))
    });
    ranked.into_iter().map(|(key, _)| key.clone()).collect()
}

pub fn groups_with_meta(
    chars: &[Character],
    tiers: &TierMap,
    owned_ids: &HashSet<String>,
) -> Vec<GroupMeta> {
    let mut groups = build_groups(chars);
    sort_group_keys(&groups, tiers)
        .into_iter()
        .filter_map(|key| {
            let members = groups.remove(&key)?;
            Some(GroupMeta {
                total: members.len(),
                owned_count: members.iter().filter(|c| owned_ids.contains(&c.id)).count(),
                max_tier_value: highest_tier_value(&members, tiers),
                chars: members,
                key,
            })
        })
        .collect()
}
