//! Owned-character detection on a community roster page.
//!
//! Signals are tried from most to least authoritative and the first one that
//! yields anything wins:
//!
//! 1. the id-keyed roster embedded in the page's `__NEXT_DATA__` script,
//! 2. the per-card name containers (one fragment for a base character, two for
//!    an alter),
//! 3. a substring scan over the page's visible text.
//!
//! Elements flagged hidden/unowned are ignored by 2 and 3.

use std::collections::{BTreeMap, HashSet};

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::data::character::Character;
use crate::roster::normalize::{name_variants, normalize_name, split_alter};

pub const DEFAULT_PAYLOAD_SCRIPT_ID: &str = "__NEXT_DATA__";
pub const DEFAULT_NAME_CONTAINER: &str = ".css-rl7vtn";
pub const DEFAULT_HIDDEN: &str = ".hidden, .unowned";

const NON_VISIBLE_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];
/// Stands in for text consumed by an alter match; never produced by normalization.
const MASK: &str = "\n";

#[derive(Debug, Error)]
#[error("invalid selector '{selector}': {message}")]
pub struct SelectorError {
    pub selector: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterLayout {
    pub payload_script_id: String,
    pub name_container: String,
    pub hidden: String,
}

impl Default for RosterLayout {
    fn default() -> Self {
        Self {
            payload_script_id: DEFAULT_PAYLOAD_SCRIPT_ID.to_string(),
            name_container: DEFAULT_NAME_CONTAINER.to_string(),
            hidden: DEFAULT_HIDDEN.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    RosterIds,
    NameContainers,
    PageText,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RosterMatch {
    /// `None` when no signal produced a match.
    pub strategy: Option<MatchStrategy>,
    pub owned: Vec<Character>,
}

impl RosterMatch {
    pub fn ids(&self) -> Vec<&str> {
        self.owned.iter().map(|c| c.id.as_str()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.owned.iter().filter_map(|c| c.name.as_deref()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.owned.is_empty()
    }
}

/// Accepted shapes of the embedded payload.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EmbeddedPayload {
    NextPage { props: NextProps },
    Bare { roster: BTreeMap<String, Value> },
}

#[derive(Debug, Deserialize)]
struct NextProps {
    #[serde(rename = "pageProps")]
    page_props: NextPageProps,
}

#[derive(Debug, Deserialize)]
struct NextPageProps {
    data: NextRosterData,
}

#[derive(Debug, Deserialize)]
struct NextRosterData {
    roster: BTreeMap<String, Value>,
}

impl EmbeddedPayload {
    fn into_roster(self) -> BTreeMap<String, Value> {
        match self {
            Self::NextPage { props } => props.page_props.data.roster,
            Self::Bare { roster } => roster,
        }
    }
}

fn parse_selector(raw: &str) -> Result<Selector, SelectorError> {
    Selector::parse(raw).map_err(|err| SelectorError {
        selector: raw.to_string(),
        message: err.to_string(),
    })
}

#[derive(Debug, Clone)]
pub struct RosterMatcher {
    payload_script_id: String,
    script: Selector,
    body: Selector,
    name_container: Selector,
    hidden: Selector,
}

impl Default for RosterMatcher {
    fn default() -> Self {
        Self::new(&RosterLayout::default()).expect("default roster selectors are valid")
    }
}

impl RosterMatcher {
    pub fn new(layout: &RosterLayout) -> Result<Self, SelectorError> {
        Ok(Self {
            payload_script_id: layout.payload_script_id.clone(),
            script: parse_selector("script")?,
            body: parse_selector("body")?,
            name_container: parse_selector(&layout.name_container)?,
            hidden: parse_selector(&layout.hidden)?,
        })
    }

    pub fn match_document(&self, html: &str, chars: &[Character]) -> RosterMatch {
        let doc = Html::parse_document(html);

        if let Some(ids) = self.extract_roster_ids(&doc) {
            let ids: HashSet<&str> = ids.iter().map(String::as_str).collect();
            let owned = dedup(chars.iter().filter(|c| ids.contains(c.id.as_str())));
            tracing::info!(
                "roster: matched {} of {} characters by id ({} roster ids)",
                owned.len(),
                chars.len(),
                ids.len()
            );
            return finish(MatchStrategy::RosterIds, owned);
        }

        let names = self.extract_character_names(&doc);
        if !names.is_empty() {
            let owned = match_names(&names, chars);
            tracing::info!(
                "roster: matched {} of {} characters from {} name containers",
                owned.len(),
                chars.len(),
                names.len()
            );
            return finish(MatchStrategy::NameContainers, owned);
        }

        let owned = match_page_text(&self.visible_text(&doc), chars);
        tracing::info!(
            "roster: matched {} of {} characters from page text",
            owned.len(),
            chars.len()
        );
        finish(MatchStrategy::PageText, owned)
    }

    /// Keys of the embedded roster. `None` when the payload is absent, malformed
    /// or empty.
    pub fn extract_roster_ids(&self, doc: &Html) -> Option<Vec<String>> {
        let script = doc
            .select(&self.script)
            .find(|el| el.value().attr("id") == Some(self.payload_script_id.as_str()))?;
        let raw: String = script.text().collect();

        let roster = match serde_json::from_str::<EmbeddedPayload>(&raw) {
            Ok(payload) => payload.into_roster(),
            Err(err) => {
                tracing::warn!(
                    "roster: ignoring malformed {} payload: {err}",
                    self.payload_script_id
                );
                return None;
            }
        };

        if roster.is_empty() {
            return None;
        }
        Some(roster.into_keys().collect())
    }

    /// One trimmed name per visible container: a lone fragment as-is, two
    /// fragments joined in document order.
    pub fn extract_character_names(&self, doc: &Html) -> Vec<String> {
        doc.select(&self.name_container)
            .filter(|container| !self.is_hidden(*container))
            .filter_map(|container| {
                let fragments: Vec<String> = container
                    .descendants()
                    .skip(1)
                    .filter_map(ElementRef::wrap)
                    .filter(|el| el.value().name() == "div" && !self.is_hidden(*el))
                    .map(|el| el.text().collect::<String>().trim().to_string())
                    .collect();
                match fragments.as_slice() {
                    [name] if !name.is_empty() => Some(name.clone()),
                    [subtitle, name] if !subtitle.is_empty() && !name.is_empty() => {
                        Some(format!("{subtitle} {name}"))
                    }
                    _ => None,
                }
            })
            .collect()
    }

    /// Text nodes of the body outside hidden and non-rendered elements.
    pub fn visible_text(&self, doc: &Html) -> String {
        let scope = doc
            .select(&self.body)
            .next()
            .unwrap_or_else(|| doc.root_element());

        let mut parts = Vec::new();
        for node in scope.descendants() {
            let Some(text) = node.value().as_text() else {
                continue;
            };
            let Some(parent) = node.parent().and_then(ElementRef::wrap) else {
                continue;
            };
            if NON_VISIBLE_TAGS.contains(&parent.value().name()) || self.is_hidden(parent) {
                continue;
            }
            let text = text.trim();
            if !text.is_empty() {
                parts.push(text);
            }
        }
        parts.join(" ")
    }

    fn is_hidden(&self, element: ElementRef<'_>) -> bool {
        std::iter::once(element)
            .chain(element.ancestors().filter_map(ElementRef::wrap))
            .any(|el| self.hidden.matches(&el))
    }
}

fn finish(strategy: MatchStrategy, owned: Vec<Character>) -> RosterMatch {
    RosterMatch {
        strategy: (!owned.is_empty()).then_some(strategy),
        owned,
    }
}

fn dedup<'a>(chars: impl Iterator<Item = &'a Character>) -> Vec<Character> {
    let mut seen = HashSet::new();
    chars
        .filter(|c| seen.insert(c.id.clone()))
        .cloned()
        .collect()
}

fn normalized_variants(name: &str) -> Vec<String> {
    name_variants(name)
        .iter()
        .map(|v| normalize_name(v))
        .filter(|v| !v.is_empty())
        .collect()
}

/// Exact comparison of normalized forms against container names.
pub fn match_names(names: &[String], chars: &[Character]) -> Vec<Character> {
    let page_names: HashSet<String> = names.iter().map(|n| normalize_name(n)).collect();
    dedup(chars.iter().filter(|c| {
        c.name
            .as_deref()
            .map(|name| {
                normalized_variants(name)
                    .iter()
                    .any(|v| page_names.contains(v))
            })
            .unwrap_or(false)
    }))
}

/// Substring scan. Alters are matched first and the text they account for is
/// masked, so a base name is never matched by an alter's card alone.
pub fn match_page_text(text: &str, chars: &[Character]) -> Vec<Character> {
    let page = normalize_name(text);
    let mut masked = page.clone();
    let mut owned_ids = HashSet::new();

    for character in chars {
        let Some(name) = character.name.as_deref() else {
            continue;
        };
        if split_alter(name).is_none() {
            continue;
        }
        let needles = normalized_variants(name);
        if needles.iter().any(|needle| page.contains(needle.as_str())) {
            owned_ids.insert(character.id.as_str());
            for needle in &needles {
                masked = masked.replace(needle.as_str(), MASK);
            }
        }
    }

    for character in chars {
        let Some(name) = character.name.as_deref() else {
            continue;
        };
        if split_alter(name).is_some() {
            continue;
        }
        let needle = normalize_name(name);
        if !needle.is_empty() && masked.contains(needle.as_str()) {
            owned_ids.insert(character.id.as_str());
        }
    }

    dedup(chars.iter().filter(|c| owned_ids.contains(c.id.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(names: &[(&str, &str)]) -> Vec<Character> {
        names.iter().map(|(id, name)| Character::new(id, name)).collect()
    }

    #[test]
    fn embedded_roster_wins_over_visible_text() {
        let html = r#"<html><body>
            <div class="css-rl7vtn"><div>Kal'tsit</div></div>
            <script id="__NEXT_DATA__" type="application/json">{"props":{"pageProps":{"data":{"roster":{"char_002_amiya":{"potential":6}}}}}}</script>
        </body></html>"#;
        let result = RosterMatcher::default().match_document(
            html,
            &chars(&[("char_002_amiya", "Amiya"), ("char_003_kalts", "Kal'tsit")]),
        );
        assert_eq!(result.strategy, Some(MatchStrategy::RosterIds));
        assert_eq!(result.ids(), vec!["char_002_amiya"]);
    }

    #[test]
    fn malformed_payload_falls_back_to_name_containers() {
        let html = r#"<body>
            <script id="__NEXT_DATA__" type="application/json">{"props": </script>
            <div class="css-rl7vtn"><div>Kal'tsit</div></div>
        </body>"#;
        let result = RosterMatcher::default().match_document(
            html,
            &chars(&[("char_002_amiya", "Amiya"), ("char_003_kalts", "Kal'tsit")]),
        );
        assert_eq!(result.strategy, Some(MatchStrategy::NameContainers));
        assert_eq!(result.names(), vec!["Kal'tsit"]);
    }

    #[test]
    fn empty_payload_roster_is_treated_as_absent() {
        let html = r#"<body>
            <script id="__NEXT_DATA__">{"roster": {}}</script>
            <p>Amiya</p>
        </body>"#;
        let result =
            RosterMatcher::default().match_document(html, &chars(&[("char_002_amiya", "Amiya")]));
        assert_eq!(result.strategy, Some(MatchStrategy::PageText));
    }

    #[test]
    fn two_fragment_container_matches_only_the_alter() {
        let html = r#"<body>
            <div class="css-rl7vtn"><div>Omertosa</div><div>Texas</div></div>
        </body>"#;
        let catalog = chars(&[("char_102_texas", "Texas"), ("char_1028_texas2", "Texas the Omertosa")]);
        let result = RosterMatcher::default().match_document(html, &catalog);
        assert_eq!(result.names(), vec!["Texas the Omertosa"]);
    }

    #[test]
    fn hidden_containers_and_fragments_are_ignored() {
        let html = r#"<body>
            <div class="hidden"><div class="css-rl7vtn"><div>Amiya</div></div></div>
            <div class="css-rl7vtn unowned"><div>Exusiai</div></div>
            <div class="css-rl7vtn"><div>Ines</div></div>
        </body>"#;
        let doc = Html::parse_document(html);
        let names = RosterMatcher::default().extract_character_names(&doc);
        assert_eq!(names, vec!["Ines".to_string()]);
    }

    #[test]
    fn visible_text_skips_scripts_and_hidden_elements() {
        let html = r#"<html><head><title>Roster</title></head><body>
            <span>Visible</span><span class="hidden">Secret</span>
            <script>var Leaked = 1;</script><style>.x{}</style>
        </body></html>"#;
        let doc = Html::parse_document(html);
        assert_eq!(RosterMatcher::default().visible_text(&doc), "Visible");
    }

    #[test]
    fn page_text_alter_signal_does_not_match_base() {
        let catalog = chars(&[("char_102_texas", "Texas"), ("char_1028_texas2", "Texas the Omertosa")]);
        let owned = match_page_text("Omertosa Texas   Ines", &catalog);
        let ids: Vec<&str> = owned.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["char_1028_texas2"]);
    }

    #[test]
    fn page_text_base_and_alter_both_present() {
        let catalog = chars(&[("char_102_texas", "Texas"), ("char_1028_texas2", "Texas the Omertosa")]);
        let owned = match_page_text("Texas · Omertosa Texas", &catalog);
        assert_eq!(owned.len(), 2);
    }

    #[test]
    fn duplicate_catalog_entries_are_reported_once() {
        let catalog = chars(&[("char_002_amiya", "Amiya"), ("char_002_amiya", "Amiya")]);
        let owned = match_names(&["amiya".to_string()], &catalog);
        assert_eq!(owned.len(), 1);
    }

    #[test]
    fn nothing_found_is_an_empty_result() {
        let result = RosterMatcher::default()
            .match_document("<body><p>nobody here</p></body>", &chars(&[("char_002_amiya", "Amiya")]));
        assert!(result.is_empty());
        assert_eq!(result.strategy, None);
    }

    #[test]
    fn custom_layout_rejects_bad_selector() {
        let layout = RosterLayout {
            name_container: "[[".to_string(),
            ..RosterLayout::default()
        };
        assert!(RosterMatcher::new(&layout).is_err());
    }
}
