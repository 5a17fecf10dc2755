//! PNG/WebP/GIF avatars -> baseline JPEG for the web front end.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;

use crate::assets::AssetError;

pub const JPEG_QUALITY: u8 = 80;
const CONVERTIBLE: [&str; 3] = ["png", "webp", "gif"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversion {
    Converted(PathBuf),
    AlreadyJpeg,
    OutputExists,
    Unsupported,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptimizeReport {
    pub converted: usize,
    pub skipped: usize,
    pub failed: Vec<String>,
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

/// Write `<out_dir>/<stem>.jpg` unless it already exists. Alpha is dropped.
pub fn optimize_image(input: &Path, out_dir: &Path) -> Result<Conversion, AssetError> {
    let Some(ext) = extension(input) else {
        return Ok(Conversion::Unsupported);
    };
    if ext == "jpg" || ext == "jpeg" {
        return Ok(Conversion::AlreadyJpeg);
    }
    if !CONVERTIBLE.contains(&ext.as_str()) {
        return Ok(Conversion::Unsupported);
    }

    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let output = out_dir.join(format!("{stem}.jpg"));
    if output.exists() {
        return Ok(Conversion::OutputExists);
    }

    let image_err = |source| AssetError::Image {
        path: input.display().to_string(),
        source,
    };
    let rgb = image::open(input).map_err(image_err)?.to_rgb8();

    fs::create_dir_all(out_dir).map_err(|source| AssetError::Io {
        path: out_dir.display().to_string(),
        source,
    })?;
    let file = File::create(&output).map_err(|source| AssetError::Io {
        path: output.display().to_string(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(image_err)?;

    tracing::debug!("wrote {} ({}x{})", output.display(), rgb.width(), rgb.height());
    Ok(Conversion::Converted(output))
}

/// Convert every eligible image in `in_dir`. Per-file failures are reported,
/// not fatal.
pub fn optimize_dir(in_dir: &Path, out_dir: &Path) -> Result<OptimizeReport, AssetError> {
    let entries = fs::read_dir(in_dir).map_err(|source| AssetError::Io {
        path: in_dir.display().to_string(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    files.sort();

    let mut report = OptimizeReport::default();
    for file in files {
        match optimize_image(&file, out_dir) {
            Ok(Conversion::Converted(_)) => report.converted += 1,
            Ok(_) => report.skipped += 1,
            Err(err) => {
                tracing::warn!("{err}");
                report.failed.push(file.display().to_string());
            }
        }
    }
    tracing::info!(
        "converted {} file(s) from {} into {}",
        report.converted,
        in_dir.display(),
        out_dir.display()
    );
    Ok(report)
}
