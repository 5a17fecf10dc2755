//! Runtime configuration.
//!
//! Defaults point at the public upstreams; every value can be overridden from
//! the environment (`AKCHARS_*`) or, in the binaries, from command-line flags.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_PUBLIC_DIR: &str = "public";
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_SHEET_ID: &str = "1E7HmgKWiV8pKpJpvpVzziYxnaQTP01Vtw_PXEdL7XPA";
pub const DEFAULT_SHEET_NAME: &str = "The Tier List";
pub const DEFAULT_GVIZ_BASE_URL: &str = "https://docs.google.com/spreadsheets/d";
pub const DEFAULT_GAME_DATA_BASE_URL: &str =
    "https://raw.githubusercontent.com/ArknightsAssets/ArknightsGameData/master";
pub const DEFAULT_AVATAR_BASE_URL: &str =
    "https://raw.githubusercontent.com/akgcc/arkdata/main/assets/torappu/dynamicassets/arts/charavatars";
pub const DEFAULT_KROOSTER_BASE_URL: &str = "https://www.krooster.com";
pub const DEFAULT_USER_AGENT: &str = "ak-chars-browser/1.0";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub public_dir: PathBuf,
    pub bind: String,
    pub sheet_id: String,
    pub sheet_name: String,
    pub gviz_base_url: String,
    pub game_data_base_url: String,
    pub avatar_base_url: String,
    pub krooster_base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Alternate fetch intermediaries for the roster page, as `{url}` templates.
    pub alternates: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            public_dir: PathBuf::from(DEFAULT_PUBLIC_DIR),
            bind: DEFAULT_BIND.to_string(),
            sheet_id: DEFAULT_SHEET_ID.to_string(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            gviz_base_url: DEFAULT_GVIZ_BASE_URL.to_string(),
            game_data_base_url: DEFAULT_GAME_DATA_BASE_URL.to_string(),
            avatar_base_url: DEFAULT_AVATAR_BASE_URL.to_string(),
            krooster_base_url: DEFAULT_KROOSTER_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            alternates: Vec::new(),
        }
    }
}

impl Config {
    /// Defaults overridden by any `AKCHARS_*` variables that are set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(v) = get("AKCHARS_DATA_DIR") {
            config.data_dir = PathBuf::from(v);
        }
        if let Some(v) = get("AKCHARS_PUBLIC_DIR") {
            config.public_dir = PathBuf::from(v);
        }
        if let Some(v) = get("AKCHARS_BIND") {
            config.bind = v;
        }
        if let Some(v) = get("AKCHARS_SHEET_ID") {
            config.sheet_id = v;
        }
        if let Some(v) = get("AKCHARS_SHEET_NAME") {
            config.sheet_name = v;
        }
        if let Some(v) = get("AKCHARS_GVIZ_BASE_URL") {
            config.gviz_base_url = trim_base(&v);
        }
        if let Some(v) = get("AKCHARS_GAME_DATA_BASE_URL") {
            config.game_data_base_url = trim_base(&v);
        }
        if let Some(v) = get("AKCHARS_AVATAR_BASE_URL") {
            config.avatar_base_url = trim_base(&v);
        }
        if let Some(v) = get("AKCHARS_KROOSTER_BASE_URL") {
            config.krooster_base_url = trim_base(&v);
        }
        if let Some(v) = get("AKCHARS_USER_AGENT") {
            config.user_agent = v;
        }
        if let Some(v) = get("AKCHARS_TIMEOUT_SECS") {
            match v.parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout_secs = secs,
                _ => tracing::warn!(
                    "invalid AKCHARS_TIMEOUT_SECS '{v}', defaulting to {DEFAULT_TIMEOUT_SECS}"
                ),
            }
        }
        if let Some(v) = get("AKCHARS_ALTERNATES") {
            config.alternates = parse_alternates(&v);
        }
        config
    }

    pub fn data_path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    pub fn images_dir(&self) -> PathBuf {
        self.public_dir.join("images")
    }

    pub fn avatars_dir(&self) -> PathBuf {
        self.data_dir.join("avatars")
    }
}

fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Comma- or whitespace-separated list of URL templates.
pub fn parse_alternates(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn lookup_overrides_defaults() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("AKCHARS_DATA_DIR", "/tmp/ak"),
            ("AKCHARS_KROOSTER_BASE_URL", "http://127.0.0.1:9999/"),
            ("AKCHARS_TIMEOUT_SECS", "5"),
            ("AKCHARS_ALTERNATES", "https://a.test/?{url}, https://b.test/{url}"),
        ]);
        let config = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/ak"));
        assert_eq!(config.krooster_base_url, "http://127.0.0.1:9999");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.alternates.len(), 2);
        assert_eq!(config.sheet_name, DEFAULT_SHEET_NAME);
    }

    #[test]
    fn invalid_timeout_keeps_default() {
        let config = Config::from_lookup(|k| (k == "AKCHARS_TIMEOUT_SECS").then(|| "soon".to_string()));
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }
}
