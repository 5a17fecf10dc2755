//! Catalog characters the tier sheet does not mention.

use serde::Serialize;

use crate::data::character::Character;
use crate::roster::normalize::normalize_name;
use crate::tiers::extract::TierMap;

pub const MAX_SUGGESTIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingTier {
    pub id: String,
    pub name: String,
    /// Sheet names that contain, or are contained in, this name once normalized.
    pub suggestions: Vec<String>,
}

fn is_similar(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

/// Named characters with no tier key, exact or normalized. Unnamed characters
/// are skipped.
pub fn find_missing_tiers(chars: &[Character], tiers: &TierMap) -> Vec<MissingTier> {
    let keys: Vec<(&str, String)> = tiers
        .keys()
        .map(|k| (k.as_str(), normalize_name(k)))
        .collect();

    chars
        .iter()
        .filter_map(|character| {
            let name = character.name.as_deref().filter(|n| !n.trim().is_empty())?;
            if tiers.contains_key(name) {
                return None;
            }
            let normalized = normalize_name(name);
            if keys.iter().any(|(_, k)| *k == normalized) {
                return None;
            }
            let suggestions = keys
                .iter()
                .filter(|(_, k)| is_similar(k, &normalized))
                .take(MAX_SUGGESTIONS)
                .map(|(raw, _)| raw.to_string())
                .collect();
            Some(MissingTier {
                id: character.id.clone(),
                name: name.to_string(),
                suggestions,
            })
        })
        .collect()
}

/// Human-readable report, one line per character plus its suggestions.
pub fn format_missing_report(missing: &[MissingTier]) -> String {
    if missing.is_empty() {
        return "No missing characters found.".to_string();
    }
    let mut out = format!("Found {} characters missing from the tier sheet\n", missing.len());
    for m in missing {
        out.push_str(&format!("- {} ({})\n", m.name, m.id));
        if !m.suggestions.is_empty() {
            out.push_str(&format!("   suggestions: {}\n", m.suggestions.join(", ")));
        }
    }
    out
}
