use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::{
    filter_chars, groups_with_meta, professions, rarities, sort_by_tier, tier_for, tiers_list,
    CharFilter, GroupMeta,
};
use crate::data::character::{Character, CHARS_FILE};
use crate::data::owned::{load_owned, OwnedSet, OWNED_FILE};
use crate::data::profession::{SubProfession, PROFESSIONS_FILE};
use crate::data::registry::{load_registry, Registry, REGISTRY_FILE};
use crate::data::{read_json_if_exists, DataError};
use crate::roster::{MatchStrategy, RosterMatcher};
use crate::tiers::{load_tier_map, TierMap, CHAR_TIERS_FILE};

/// Everything the API serves, loaded once at startup. Missing files are empty.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub chars: Vec<Character>,
    pub tiers: TierMap,
    pub professions: Vec<SubProfession>,
    pub owned: OwnedSet,
    pub registry: Registry,
}

impl Catalog {
    pub fn load(data_dir: &Path) -> Result<Self, DataError> {
        let catalog = Self {
            chars: read_json_if_exists(&data_dir.join(CHARS_FILE))?.unwrap_or_default(),
            tiers: load_tier_map(data_dir.join(CHAR_TIERS_FILE))?,
            professions: read_json_if_exists(&data_dir.join(PROFESSIONS_FILE))?.unwrap_or_default(),
            owned: load_owned(data_dir.join(OWNED_FILE))?,
            registry: load_registry(data_dir.join(REGISTRY_FILE))?,
        };
        tracing::info!(
            "catalog loaded from {}: {} characters, {} tiers, {} owned",
            data_dir.display(),
            catalog.chars.len(),
            catalog.tiers.len(),
            catalog.owned.len()
        );
        Ok(catalog)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

pub fn health_payload() -> HealthResponse {
    HealthResponse {
        status: "ok",
        service: "akchars-api",
        version: env!("CARGO_PKG_VERSION"),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CharsQuery {
    pub rarity: Option<String>,
    pub profession: Option<String>,
    pub tier: Option<String>,
    pub search: Option<String>,
    pub owned_only: Option<String>,
}

impl CharsQuery {
    fn owned_only(&self) -> bool {
        self.owned_only
            .as_deref()
            .map(|v| v.trim().eq_ignore_ascii_case("1") || v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    fn filter(&self) -> CharFilter {
        CharFilter {
            rarity: self.rarity.clone(),
            profession: self.profession.clone(),
            min_tier: self.tier.clone(),
            search: self.search.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CharEntry {
    #[serde(flatten)]
    pub character: Character,
    pub tier: Option<String>,
    pub owned: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CharsResponse {
    pub total: usize,
    pub chars: Vec<CharEntry>,
}

pub fn chars_payload(catalog: &Catalog, query: &CharsQuery) -> CharsResponse {
    let filtered = filter_chars(&catalog.chars, &query.filter(), &catalog.tiers);
    let owned_only = query.owned_only();
    let chars: Vec<CharEntry> = sort_by_tier(&filtered, &catalog.tiers)
        .into_iter()
        .filter(|c| !owned_only || catalog.owned.contains(&c.id))
        .map(|character| CharEntry {
            tier: tier_for(&character, &catalog.tiers).map(str::to_string),
            owned: catalog.owned.contains(&character.id),
            character,
        })
        .collect();
    CharsResponse {
        total: chars.len(),
        chars,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TiersResponse {
    pub tiers: TierMap,
    pub labels: Vec<String>,
}

pub fn tiers_payload(catalog: &Catalog) -> TiersResponse {
    TiersResponse {
        labels: tiers_list(&catalog.tiers),
        tiers: catalog.tiers.clone(),
    }
}

pub fn groups_payload(catalog: &Catalog) -> Vec<GroupMeta> {
    let owned: HashSet<String> = catalog.owned.ids.iter().cloned().collect();
    groups_with_meta(&catalog.chars, &catalog.tiers, &owned)
}

#[derive(Debug, Clone, Serialize)]
pub struct FiltersResponse {
    pub rarities: Vec<String>,
    pub professions: Vec<String>,
    pub tiers: Vec<String>,
}

pub fn filters_payload(catalog: &Catalog) -> FiltersResponse {
    FiltersResponse {
        rarities: rarities(&catalog.chars),
        professions: professions(&catalog.chars),
        tiers: tiers_list(&catalog.tiers),
    }
}

pub fn professions_payload(catalog: &Catalog) -> Vec<SubProfession> {
    catalog.professions.clone()
}

#[derive(Debug, Clone, Serialize)]
pub struct DataVersionResponse {
    pub datasets: Registry,
    pub owned_source: Option<String>,
    pub owned_updated: Option<String>,
}

pub fn data_version_payload(catalog: &Catalog) -> DataVersionResponse {
    DataVersionResponse {
        datasets: catalog.registry.clone(),
        owned_source: catalog.owned.source.clone(),
        owned_updated: catalog.owned.updated.clone(),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RosterMatchRequest {
    pub html: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RosterMatchResponse {
    pub strategy: Option<MatchStrategy>,
    pub count: usize,
    pub ids: Vec<String>,
    pub owned: Vec<Character>,
}

pub fn roster_match_payload(
    catalog: &Catalog,
    matcher: &RosterMatcher,
    request: &RosterMatchRequest,
) -> RosterMatchResponse {
    let result = matcher.match_document(&request.html, &catalog.chars);
    RosterMatchResponse {
        strategy: result.strategy,
        count: result.owned.len(),
        ids: result.ids().into_iter().map(str::to_string).collect(),
        owned: result.owned,
    }
}
