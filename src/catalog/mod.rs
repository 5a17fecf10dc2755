//! Catalog queries: tier lookup, filter values, filtering and grouping.

pub mod filter;
pub mod group;

use std::cmp::Reverse;
use std::collections::BTreeSet;

use crate::data::character::Character;
use crate::tiers::label::{tier_sort_value, UNTIERED_VALUE};
use crate::tiers::TierMap;

pub use filter::{filter_chars, sort_by_tier, CharFilter};
pub use group::{build_groups, groups_with_meta, sort_group_keys, GroupMeta, OTHER_GROUP};

/// Tiers are keyed by display name.
pub fn tier_for<'a>(character: &Character, tiers: &'a TierMap) -> Option<&'a str> {
    let name = character.name.as_deref()?;
    tiers
        .get(name)
        .map(String::as_str)
        .filter(|t| !t.is_empty())
}

/// Value used for ordering; untiered characters sort below every label.
pub fn tier_value_for(character: &Character, tiers: &TierMap) -> i32 {
    tier_for(character, tiers)
        .map(tier_sort_value)
        .unwrap_or(UNTIERED_VALUE)
}

fn distinct<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    values
        .flatten()
        .filter(|v| !v.is_empty())
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

fn digits_value(s: &str) -> u64 {
    s.chars()
        .filter(char::is_ascii_digit)
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}

/// Distinct rarities, highest first by the number embedded in them (`TIER_6`).
pub fn rarities(chars: &[Character]) -> Vec<String> {
    let mut out = distinct(chars.iter().map(|c| c.rarity.as_deref()));
    out.sort_by_key(|r| Reverse(digits_value(r)));
    out
}

pub fn professions(chars: &[Character]) -> Vec<String> {
    let mut out = distinct(chars.iter().map(|c| c.profession.as_deref()));
    out.sort();
    out
}

/// Distinct labels present in the map, best first.
pub fn tiers_list(tiers: &TierMap) -> Vec<String> {
    let mut out = distinct(tiers.values().map(|t| Some(t.as_str())));
    out.sort_by_key(|t| Reverse(tier_sort_value(t)));
    out
}

fn is_f_grade(label: &str) -> bool {
    let letters: String = label
        .trim()
        .chars()
        .take_while(char::is_ascii_uppercase)
        .collect();
    letters == "F"
}

/// Best tier value among `chars`, ignoring untiered and `F`-grade characters.
pub fn highest_tier_value(chars: &[Character], tiers: &TierMap) -> i32 {
    chars
        .iter()
        .filter_map(|c| tier_for(c, tiers))
        .filter(|t| !is_f_grade(t))
        .map(tier_sort_value)
        .max()
        .unwrap_or(UNTIERED_VALUE)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn character(id: &str, name: &str, rarity: &str, profession: &str, sub: Option<&str>) -> Character {
        Character {
            rarity: Some(rarity.to_string()),
            profession: Some(profession.to_string()),
            sub_profession_id: sub.map(str::to_string),
            ..Character::new(id, name)
        }
    }

    pub fn tiers(pairs: &[(&str, &str)]) -> TierMap {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn rarities_sort_by_embedded_number() {
        let chars = vec![
            character("a", "A", "TIER_4", "GUARD", None),
            character("b", "B", "TIER_6", "GUARD", None),
            character("c", "C", "TIER_4", "CASTER", None),
            character("d", "D", "TIER_1", "SUPPORT", None),
        ];
        assert_eq!(rarities(&chars), vec!["TIER_6", "TIER_4", "TIER_1"]);
        assert_eq!(professions(&chars), vec!["CASTER", "GUARD", "SUPPORT"]);
    }

    #[test]
    fn tiers_list_is_distinct_and_best_first() {
        let t = tiers(&[("A", "S"), ("B", "EX"), ("C", "A+"), ("D", "S"), ("E", "???")]);
        assert_eq!(tiers_list(&t), vec!["EX", "S", "A+", "???"]);
    }

    #[test]
    fn highest_tier_ignores_f_grades_and_untiered() {
        let chars = vec![
            character("a", "A", "TIER_1", "GUARD", None),
            character("b", "B", "TIER_1", "GUARD", None),
            character("c", "Nobody", "TIER_1", "GUARD", None),
        ];
        assert_eq!(highest_tier_value(&chars, &tiers(&[("A", "F+"), ("B", "D-")])), 18);
        assert_eq!(highest_tier_value(&chars, &tiers(&[("A", "F")])), UNTIERED_VALUE);
        assert_eq!(highest_tier_value(&[], &TierMap::new()), UNTIERED_VALUE);
    }

    #[test]
    fn tier_lookup_is_by_name() {
        let amiya = character("char_002_amiya", "Amiya", "TIER_5", "CASTER", None);
        let t = tiers(&[("Amiya", "A"), ("char_002_amiya", "EX")]);
        assert_eq!(tier_for(&amiya, &t), Some("A"));
        assert_eq!(tier_value_for(&amiya, &TierMap::new()), UNTIERED_VALUE);
    }
}
