use std::ffi::OsString;
use std::fs;
use std::future::Future;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use serde::Serialize;

use crate::catalog::{filter_chars, sort_by_tier, CharFilter};
use crate::config::Config;
use crate::data::character::{load_characters, Character, CHARS_FILE};
use crate::data::owned::{load_owned, save_owned, MergePolicy, OWNED_FILE};
use crate::data::registry::{record_dataset, REGISTRY_FILE};
use crate::fetch::HttpClient;
use crate::roster::{KroosterClient, RosterMatcher};
use crate::server;
use crate::tiers::missing::{find_missing_tiers, format_missing_report};
use crate::tiers::{generate_char_tiers, load_tier_map, TierSheetSource, CHAR_TIERS_FILE};

#[derive(Debug, Parser)]
#[command(name = "akchars", version, about = "Character catalog, tier list and roster tools")]
pub struct Cli {
    /// Directory holding chars.json, char_tiers.json, owned.json and friends
    #[arg(long, global = true, env = "AKCHARS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the JSON API
    Serve {
        #[arg(long, env = "AKCHARS_BIND")]
        bind: Option<String>,
    },
    /// Rebuild char_tiers.json from the tier sheet or a local export
    Tiers(TiersArgs),
    /// Match a saved roster page against the catalog
    Match {
        #[arg(long)]
        html: PathBuf,
        /// Character list; defaults to chars.json in the data directory
        #[arg(long)]
        chars: Option<PathBuf>,
    },
    /// Import a Krooster roster into owned.json
    Import {
        username: String,
        /// Keep previously owned characters
        #[arg(long)]
        union: bool,
        /// Route the request through the configured alternates
        #[arg(long)]
        alternates: bool,
    },
    /// List catalog characters with no tier
    MissingTiers,
    /// Print the filtered catalog, best tier first
    Filter {
        #[arg(long)]
        rarity: Option<String>,
        #[arg(long)]
        profession: Option<String>,
        /// Minimum tier
        #[arg(long)]
        tier: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct TiersArgs {
    #[arg(long, env = "AKCHARS_SHEET_ID")]
    pub sheet_id: Option<String>,
    #[arg(long, env = "AKCHARS_SHEET_NAME")]
    pub sheet_name: Option<String>,
    #[arg(long, conflicts_with = "csv")]
    pub xlsx: Option<PathBuf>,
    /// Worksheet inside --xlsx (first sheet when omitted)
    #[arg(long, requires = "xlsx")]
    pub sheet: Option<String>,
    #[arg(long)]
    pub csv: Option<PathBuf>,
    /// Also print the map to stdout
    #[arg(long)]
    pub print: bool,
}

pub fn run_with_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return err.exit_code();
        }
    };

    let mut config = Config::from_env();
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    match cli.command {
        Command::Serve { bind } => handle_serve(config, bind),
        Command::Tiers(args) => handle_tiers(&config, args),
        Command::Match { html, chars } => handle_match(&config, html, chars),
        Command::Import {
            username,
            union,
            alternates,
        } => handle_import(&config, &username, union, alternates),
        Command::MissingTiers => handle_missing_tiers(&config),
        Command::Filter {
            rarity,
            profession,
            tier,
            search,
        } => handle_filter(
            &config,
            CharFilter {
                rarity,
                profession,
                min_tier: tier,
                search,
            },
        ),
    }
}

fn block_on<F: Future>(future: F) -> Result<F::Output, std::io::Error> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize output: {err}");
            1
        }
    }
}

fn load_catalog_chars(config: &Config) -> Option<Vec<Character>> {
    match load_characters(config.data_path(CHARS_FILE)) {
        Ok(chars) => Some(chars),
        Err(err) => {
            eprintln!("{err}");
            None
        }
    }
}

fn handle_serve(mut config: Config, bind: Option<String>) -> i32 {
    if let Some(bind) = bind {
        config.bind = bind;
    }
    let result = block_on(server::run_server(&config));
    match result {
        Ok(Ok(())) => 0,
        Ok(Err(err)) => {
            eprintln!("server error: {err}");
            1
        }
        Err(err) => {
            eprintln!("runtime error: {err}");
            1
        }
    }
}

fn handle_tiers(config: &Config, args: TiersArgs) -> i32 {
    let source = match (args.xlsx, args.csv) {
        (Some(path), _) => TierSheetSource::Xlsx {
            path,
            sheet: args.sheet,
        },
        (None, Some(path)) => TierSheetSource::Csv { path },
        (None, None) => TierSheetSource::Gviz {
            base_url: config.gviz_base_url.clone(),
            sheet_id: args.sheet_id.unwrap_or_else(|| config.sheet_id.clone()),
            sheet_name: args.sheet_name.unwrap_or_else(|| config.sheet_name.clone()),
        },
    };

    let client = HttpClient::from_config(config);
    let tiers = match block_on(generate_char_tiers(&client, &source, &config.data_dir)) {
        Ok(Ok(tiers)) => tiers,
        Ok(Err(err)) => {
            eprintln!("tier extraction failed: {err}");
            return 1;
        }
        Err(err) => {
            eprintln!("runtime error: {err}");
            return 1;
        }
    };

    println!(
        "Wrote {} character tiers to {}",
        tiers.len(),
        config.data_path(CHAR_TIERS_FILE).display()
    );
    if args.print {
        return print_json(&tiers);
    }
    0
}

fn handle_match(config: &Config, html: PathBuf, chars: Option<PathBuf>) -> i32 {
    let document = match fs::read_to_string(&html) {
        Ok(document) => document,
        Err(err) => {
            eprintln!("failed to read {}: {err}", html.display());
            return 1;
        }
    };
    let chars_path = chars.unwrap_or_else(|| config.data_path(CHARS_FILE));
    let chars = match load_characters(&chars_path) {
        Ok(chars) => chars,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };

    print_json(&RosterMatcher::default().match_document(&document, &chars))
}

fn handle_import(config: &Config, username: &str, union: bool, via_alternates: bool) -> i32 {
    let Some(chars) = load_catalog_chars(config) else {
        return 1;
    };
    let client = KroosterClient::from_config(HttpClient::from_config(config), config);

    let fetched = block_on(async {
        if via_alternates {
            let mut rng = rand::rngs::StdRng::from_entropy();
            client
                .fetch_roster_via_alternates(username, &chars, &mut rng)
                .await
        } else {
            client.fetch_roster(username, &chars).await
        }
    });
    let roster = match fetched {
        Ok(Ok(roster)) => roster,
        Ok(Err(err)) => {
            eprintln!("roster fetch failed: {err}");
            return 1;
        }
        Err(err) => {
            eprintln!("runtime error: {err}");
            return 1;
        }
    };

    if roster.is_empty() {
        eprintln!("no characters matched for '{username}'; owned set left unchanged");
        return 1;
    }

    let owned_path = config.data_path(OWNED_FILE);
    let mut owned = match load_owned(&owned_path) {
        Ok(owned) => owned,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };
    let policy = if union {
        MergePolicy::Union
    } else {
        MergePolicy::Replace
    };
    let source = format!("krooster:{username}");
    owned.apply(roster.ids(), policy, &source);

    if let Err(err) = save_owned(&owned_path, &owned) {
        eprintln!("{err}");
        return 1;
    }
    if let Err(err) = record_dataset(config.data_path(REGISTRY_FILE), "owned", &source, OWNED_FILE) {
        eprintln!("{err}");
        return 1;
    }

    println!(
        "Matched {} characters; {} owned in {}",
        roster.owned.len(),
        owned.len(),
        owned_path.display()
    );
    0
}

fn handle_missing_tiers(config: &Config) -> i32 {
    let Some(chars) = load_catalog_chars(config) else {
        return 1;
    };
    let tiers_path = config.data_path(CHAR_TIERS_FILE);
    if !tiers_path.exists() {
        eprintln!("{} not found; run `akchars tiers` first", tiers_path.display());
        return 1;
    }
    let tiers = match load_tier_map(&tiers_path) {
        Ok(tiers) => tiers,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };

    let report = format_missing_report(&find_missing_tiers(&chars, &tiers));
    println!("{}", report.trim_end());
    0
}

fn handle_filter(config: &Config, filter: CharFilter) -> i32 {
    let Some(chars) = load_catalog_chars(config) else {
        return 1;
    };
    let tiers = match load_tier_map(config.data_path(CHAR_TIERS_FILE)) {
        Ok(tiers) => tiers,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };
    let filtered = filter_chars(&chars, &filter, &tiers);
    print_json(&sort_by_tier(&filtered, &tiers))
}
