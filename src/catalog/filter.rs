use std::cmp::Reverse;

use serde::Deserialize;

use crate::catalog::{tier_for, tier_value_for};
use crate::data::character::Character;
use crate::tiers::is_tier_equal_or_higher;
use crate::tiers::TierMap;

/// Catalog filter. Empty fields do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CharFilter {
    #[serde(default)]
    pub rarity: Option<String>,
    /// `"All"` is the same as unset.
    #[serde(default)]
    pub profession: Option<String>,
    /// Minimum tier label.
    #[serde(default, alias = "tier")]
    pub min_tier: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl CharFilter {
    pub fn matches(&self, character: &Character, tiers: &TierMap) -> bool {
        if let Some(rarity) = non_empty(&self.rarity) {
            if character.rarity.as_deref() != Some(rarity) {
                return false;
            }
        }
        if let Some(profession) = non_empty(&self.profession).filter(|p| *p != "All") {
            if character.profession.as_deref() != Some(profession) {
                return false;
            }
        }
        if let Some(min_tier) = non_empty(&self.min_tier) {
            if !is_tier_equal_or_higher(tier_for(character, tiers), Some(min_tier)) {
                return false;
            }
        }
        let search = self
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .unwrap_or_default();
        if !search.is_empty() {
            let name = character.name.as_deref().unwrap_or("").to_lowercase();
            if !name.contains(&search) {
                return false;
            }
        }
        true
    }
}

pub fn filter_chars(chars: &[Character], filter: &CharFilter, tiers: &TierMap) -> Vec<Character> {
    chars
        .iter()
        .filter(|c| filter.matches(c, tiers))
        .cloned()
        .collect()
}

/// Stable sort, best tier first; untiered characters keep their relative order at the end.
pub fn sort_by_tier(chars: &[Character], tiers: &TierMap) -> Vec<Character> {
    let mut sorted = chars.to_vec();
    sorted.sort_by_key(|c| Reverse(tier_value_for(c, tiers)));
    sorted
}
