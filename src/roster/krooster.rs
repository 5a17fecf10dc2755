//! Krooster account pages: `GET {base}/u/{username}` followed by matching.

use rand::Rng;

use crate::config::Config;
use crate::data::character::Character;
use crate::fetch::{fetch_in_order, shuffle_alternates, FetchError, HttpClient};
use crate::roster::matcher::{RosterMatch, RosterMatcher};

#[derive(Debug, Clone)]
pub struct KroosterClient {
    http: HttpClient,
    base_url: String,
    alternates: Vec<String>,
    matcher: RosterMatcher,
}

impl KroosterClient {
    pub fn new(http: HttpClient, base_url: &str, alternates: Vec<String>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            alternates,
            matcher: RosterMatcher::default(),
        }
    }

    pub fn from_config(http: HttpClient, config: &Config) -> Self {
        Self::new(http, &config.krooster_base_url, config.alternates.clone())
    }

    pub fn with_matcher(mut self, matcher: RosterMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn user_url(&self, username: &str) -> String {
        format!("{}/u/{}", self.base_url, urlencoding::encode(username.trim()))
    }

    pub async fn fetch_document(&self, username: &str) -> Result<String, FetchError> {
        self.http.get_text(&self.user_url(username)).await
    }

    pub async fn fetch_roster(
        &self,
        username: &str,
        chars: &[Character],
    ) -> Result<RosterMatch, FetchError> {
        let html = self.fetch_document(username).await?;
        Ok(self.matcher.match_document(&html, chars))
    }

    /// Same as [`fetch_roster`](Self::fetch_roster), routed through the
    /// configured alternates in an order drawn from `rng`.
    pub async fn fetch_roster_via_alternates<R: Rng + ?Sized>(
        &self,
        username: &str,
        chars: &[Character],
        rng: &mut R,
    ) -> Result<RosterMatch, FetchError> {
        let ordered = shuffle_alternates(&self.alternates, rng);
        let html = fetch_in_order(&self.http, &self.user_url(username), &ordered).await?;
        Ok(self.matcher.match_document(&html, chars))
    }
}
