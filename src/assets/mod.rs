//! Character avatars: download from the asset mirror and re-encode to JPEG.

pub mod avatars;
pub mod optimize;

use thiserror::Error;

use crate::fetch::FetchError;

pub use avatars::{avatar_url, fetch_avatars, AvatarOptions, AvatarReport, DEFAULT_CONCURRENCY};
pub use optimize::{optimize_dir, optimize_image, Conversion, OptimizeReport, JPEG_QUALITY};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to convert {path}: {source}")]
    Image {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error(transparent)]
    Fetch(#[from] FetchError),
}
