//! Build data/char_tiers.json from the community tier sheet.
//! Run: cargo run --bin extract_tiers [-- path/to/export.xlsx|.csv [sheet]]
//! Without a path the live sheet (AKCHARS_SHEET_ID / AKCHARS_SHEET_NAME) is fetched.

use std::path::PathBuf;

use akchars::config::Config;
use akchars::fetch::HttpClient;
use akchars::tiers::{generate_char_tiers, TierSheetSource, CHAR_TIERS_FILE};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(about = "Extract character tiers from the tier sheet or a local export")]
struct Args {
    #[arg(long, env = "AKCHARS_DATA_DIR")]
    data_dir: Option<PathBuf>,
    /// Local `.xlsx` or `.csv` export
    path: Option<PathBuf>,
    /// Worksheet inside an `.xlsx` export (first sheet when omitted)
    #[arg(requires = "path")]
    sheet: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    akchars::init_tracing();
    let mut config = Config::from_env();
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }

    let source = match args.path {
        Some(path) if path.extension().is_some_and(|e| e.eq_ignore_ascii_case("csv")) => {
            TierSheetSource::Csv { path }
        }
        Some(path) => TierSheetSource::Xlsx {
            path,
            sheet: args.sheet,
        },
        None => TierSheetSource::Gviz {
            base_url: config.gviz_base_url.clone(),
            sheet_id: config.sheet_id.clone(),
            sheet_name: config.sheet_name.clone(),
        },
    };

    let client = HttpClient::from_config(&config);
    let tiers = generate_char_tiers(&client, &source, &config.data_dir).await?;
    println!(
        "Wrote {} character tiers to {}",
        tiers.len(),
        config.data_path(CHAR_TIERS_FILE).display()
    );
    Ok(())
}
