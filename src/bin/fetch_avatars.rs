//! Download missing character avatars into data/avatars/.
//! Run: cargo run --bin fetch_avatars [-- --limit N] [--concurrency N]

use std::path::PathBuf;

use akchars::assets::{fetch_avatars, AvatarOptions, DEFAULT_CONCURRENCY};
use akchars::config::Config;
use akchars::data::character::{load_characters, CHARS_FILE};
use akchars::fetch::HttpClient;
use anyhow::Context;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(about = "Download missing character avatars")]
struct Args {
    #[arg(long, env = "AKCHARS_DATA_DIR")]
    data_dir: Option<PathBuf>,
    /// Stop after this many downloads
    #[arg(long)]
    limit: Option<usize>,
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    akchars::init_tracing();
    let mut config = Config::from_env();
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    let options = AvatarOptions {
        limit: args.limit,
        concurrency: args.concurrency.max(1),
    };

    let chars_path = config.data_path(CHARS_FILE);
    let chars = load_characters(&chars_path)
        .context("run fetch_chars first to create chars.json")?;

    let client = HttpClient::from_config(&config);
    let out_dir = config.avatars_dir();
    let report = fetch_avatars(&client, &config.avatar_base_url, &chars, &out_dir, options).await?;

    println!(
        "Avatars: {} downloaded, {} already present, {} failed ({})",
        report.downloaded,
        report.already_present,
        report.failed.len(),
        out_dir.display()
    );
    Ok(())
}
