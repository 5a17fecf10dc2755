//! Report characters in data/chars.json that data/char_tiers.json does not cover.
//! Run: cargo run --bin check_missing_tiers

use akchars::config::Config;
use akchars::data::character::{load_characters, CHARS_FILE};
use akchars::tiers::missing::{find_missing_tiers, format_missing_report};
use akchars::tiers::{load_tier_map, CHAR_TIERS_FILE};

fn main() -> anyhow::Result<()> {
    akchars::init_tracing();
    let config = Config::from_env();
    let chars_path = config.data_path(CHARS_FILE);
    let tiers_path = config.data_path(CHAR_TIERS_FILE);

    if !chars_path.exists() || !tiers_path.exists() {
        eprintln!("Missing data files in {}", config.data_dir.display());
        std::process::exit(1);
    }

    let chars = load_characters(&chars_path)?;
    let tiers = load_tier_map(&tiers_path)?;
    let report = format_missing_report(&find_missing_tiers(&chars, &tiers));
    println!("{}", report.trim_end());
    Ok(())
}
