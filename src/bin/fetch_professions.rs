//! Fetch sub-profession names (CN membership, EN names) into data/professions.json.
//! Run: cargo run --bin fetch_professions

use akchars::config::Config;
use akchars::data::profession::{fetch_sub_professions, PROFESSIONS_FILE};
use akchars::data::registry::{record_dataset, REGISTRY_FILE};
use akchars::data::write_json;
use akchars::fetch::HttpClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    akchars::init_tracing();
    let config = Config::from_env();
    let client = HttpClient::from_config(&config);

    let professions = fetch_sub_professions(&client, &config.game_data_base_url).await?;
    let out = config.data_path(PROFESSIONS_FILE);
    write_json(&out, &professions)?;
    record_dataset(
        config.data_path(REGISTRY_FILE),
        "professions",
        "ArknightsGameData uniequip_table (cn+en)",
        PROFESSIONS_FILE,
    )?;

    println!("Wrote {} sub-professions to {}", professions.len(), out.display());
    Ok(())
}
