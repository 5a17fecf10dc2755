use std::path::{Path, PathBuf};

use futures_util::stream::{self, StreamExt};

use crate::assets::AssetError;
use crate::data::character::Character;
use crate::fetch::HttpClient;

pub const DEFAULT_CONCURRENCY: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvatarOptions {
    /// Maximum number of downloads attempted this run.
    pub limit: Option<usize>,
    pub concurrency: usize,
}

impl Default for AvatarOptions {
    fn default() -> Self {
        Self {
            limit: None,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvatarReport {
    pub downloaded: usize,
    pub already_present: usize,
    pub failed: Vec<String>,
}

pub fn avatar_url(base_url: &str, char_id: &str) -> String {
    format!("{}/{char_id}.png", base_url.trim_end_matches('/'))
}

async fn download_one(
    client: &HttpClient,
    base_url: &str,
    char_id: &str,
    path: &Path,
) -> Result<(), AssetError> {
    let bytes = client.get_bytes(&avatar_url(base_url, char_id)).await?;
    tokio::fs::write(path, bytes)
        .await
        .map_err(|source| AssetError::Io {
            path: path.display().to_string(),
            source,
        })
}

/// Download `{id}.png` for every character not already in `out_dir`. A failed
/// avatar (including a non-2xx answer) is logged, reported and not written.
pub async fn fetch_avatars(
    client: &HttpClient,
    base_url: &str,
    chars: &[Character],
    out_dir: &Path,
    options: AvatarOptions,
) -> Result<AvatarReport, AssetError> {
    tokio::fs::create_dir_all(out_dir)
        .await
        .map_err(|source| AssetError::Io {
            path: out_dir.display().to_string(),
            source,
        })?;

    let mut report = AvatarReport::default();
    let mut pending: Vec<(String, PathBuf)> = Vec::new();
    for character in chars.iter().filter(|c| !c.id.is_empty()) {
        let path = out_dir.join(format!("{}.png", character.id));
        if path.exists() {
            report.already_present += 1;
        } else {
            pending.push((character.id.clone(), path));
        }
    }
    if let Some(limit) = options.limit {
        pending.truncate(limit);
    }
    tracing::info!(
        "downloading {} avatar(s), {} already present",
        pending.len(),
        report.already_present
    );

    let results: Vec<(String, Result<(), AssetError>)> = stream::iter(pending)
        .map(|(id, path)| async move {
            let result = download_one(client, base_url, &id, &path).await;
            (id, result)
        })
        .buffer_unordered(options.concurrency.max(1))
        .collect()
        .await;

    for (id, result) in results {
        match result {
            Ok(()) => {
                tracing::debug!(id = %id, "avatar saved");
                report.downloaded += 1;
            }
            Err(err) => {
                tracing::warn!(id = %id, "avatar download failed: {err}");
                report.failed.push(id);
            }
        }
    }
    report.failed.sort();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avatar_url_joins_base_and_id() {
        assert_eq!(
            avatar_url("https://assets.test/charavatars/", "char_002_amiya"),
            "https://assets.test/charavatars/char_002_amiya.png"
        );
    }
}
