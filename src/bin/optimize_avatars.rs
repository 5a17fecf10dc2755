//! Re-encode downloaded avatars as JPEG into public/images/.
//! Run: cargo run --bin optimize_avatars [-- <input_dir>]

use std::path::PathBuf;

use akchars::assets::optimize_dir;
use akchars::config::Config;

fn main() -> anyhow::Result<()> {
    akchars::init_tracing();
    let config = Config::from_env();
    let in_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| config.avatars_dir());
    if !in_dir.is_dir() {
        anyhow::bail!("images directory not found: {}", in_dir.display());
    }

    let out_dir = config.images_dir();
    let report = optimize_dir(&in_dir, &out_dir)?;
    println!(
        "Optimiser: converted {} file(s), skipped {}, failed {} ({} -> {})",
        report.converted,
        report.skipped,
        report.failed.len(),
        in_dir.display(),
        out_dir.display()
    );
    Ok(())
}
