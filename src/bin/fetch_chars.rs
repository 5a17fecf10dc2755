//! Fetch the EN (+CN supplement) character tables and write data/chars.json.
//! Run: cargo run --bin fetch_chars

use akchars::config::Config;
use akchars::data::character::{fetch_characters, save_characters, CHARS_FILE};
use akchars::data::registry::{record_dataset, REGISTRY_FILE};
use akchars::fetch::HttpClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    akchars::init_tracing();
    let config = Config::from_env();
    let client = HttpClient::from_config(&config);

    let characters = fetch_characters(&client, &config.game_data_base_url).await?;
    let out = config.data_path(CHARS_FILE);
    save_characters(&out, &characters)?;
    record_dataset(
        config.data_path(REGISTRY_FILE),
        "chars",
        "ArknightsGameData character_table (en+cn)",
        CHARS_FILE,
    )?;

    println!("Wrote {} characters to {}", characters.len(), out.display());
    Ok(())
}
