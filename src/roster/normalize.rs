//! Name folding used for every roster comparison.

use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const QUOTES: [char; 7] = ['\'', '"', '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}', '`'];

fn fold(input: &str) -> impl Iterator<Item = char> + '_ {
    input
        .nfkd()
        .filter(|c| !is_combining_mark(*c) && !QUOTES.contains(c))
}

/// NFKD, strip diacritics and quotes, punctuation/symbols to spaces, lowercase,
/// collapse whitespace. `normalize_name(normalize_name(s)) == normalize_name(s)`.
pub fn normalize_name(input: &str) -> String {
    let lowered: String = fold(input).flat_map(char::to_lowercase).collect();
    let spaced: String = fold(&lowered)
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn alter_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)^(.+?)\s+the\s+(.+)$").expect("alter pattern is valid"))
}

/// `("X", "Y")` for alter-styled names of the form `"X the Y"`.
pub fn split_alter(name: &str) -> Option<(&str, &str)> {
    let captures = alter_pattern().captures(name.trim())?;
    Some((captures.get(1)?.as_str(), captures.get(2)?.as_str()))
}

/// The name itself, plus `"Y X"` for `"X the Y"`: the roster page renders an
/// alter's subtitle before its base name.
pub fn name_variants(name: &str) -> Vec<String> {
    let mut variants = vec![name.to_string()];
    if let Some((base, subtitle)) = split_alter(name) {
        variants.push(format!("{subtitle} {base}"));
    }
    variants
}
