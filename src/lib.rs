pub mod assets;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod data;
pub mod fetch;
pub mod roster;
pub mod server;
pub mod tiers;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Diagnostics to stderr, filtered by `RUST_LOG`; stdout stays free for command output.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "akchars=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
