//! Retrying a fetch through alternate intermediaries (CORS-style proxies).
//!
//! Each alternate is a URL template; `{url}` is replaced by the percent-encoded
//! target, or the encoded target is appended when the placeholder is absent.
//! Alternates are tried once each, in random order, until one succeeds.

use rand::seq::SliceRandom;
use rand::Rng;

use super::{FetchError, HttpClient};

pub fn alternate_url(template: &str, target: &str) -> String {
    let encoded = urlencoding::encode(target);
    if template.contains("{url}") {
        template.replace("{url}", &encoded)
    } else {
        format!("{template}{encoded}")
    }
}

pub fn shuffle_alternates<R: Rng + ?Sized>(templates: &[String], rng: &mut R) -> Vec<String> {
    let mut ordered = templates.to_vec();
    ordered.shuffle(rng);
    ordered
}

/// Try `ordered` alternates front to back, stopping at the first success.
pub async fn fetch_in_order(
    client: &HttpClient,
    target: &str,
    ordered: &[String],
) -> Result<String, FetchError> {
    if ordered.is_empty() {
        return Err(FetchError::NoAlternates);
    }

    let mut all_transport = true;
    let mut last = None;
    for (attempt, template) in ordered.iter().enumerate() {
        let url = alternate_url(template, target);
        match client.get_text(&url).await {
            Ok(body) => {
                tracing::info!(attempt = attempt + 1, url = %url, "alternate source succeeded");
                return Ok(body);
            }
            Err(err) => {
                tracing::warn!(attempt = attempt + 1, "alternate source failed: {err}");
                all_transport &= err.is_transport();
                last = Some(err);
            }
        }
    }

    let attempts = ordered.len();
    match last {
        Some(_) if all_transport => Err(FetchError::ConnectivityRestricted { attempts }),
        Some(last) => Err(FetchError::AlternatesExhausted {
            attempts,
            last: Box::new(last),
        }),
        None => Err(FetchError::NoAlternates),
    }
}

pub async fn fetch_via_alternates(
    client: &HttpClient,
    target: &str,
    templates: &[String],
) -> Result<String, FetchError> {
    let ordered = {
        let mut rng = rand::thread_rng();
        shuffle_alternates(templates, &mut rng)
    };
    fetch_in_order(client, target, &ordered).await
}
