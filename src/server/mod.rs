//! JSON API over the local catalog.

pub mod api;
pub mod routes;

use std::sync::Arc;

use thiserror::Error;

use crate::config::Config;
use crate::data::DataError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Data(#[from] DataError),
    #[error("server I/O error on {bind}: {source}")]
    Io {
        bind: String,
        #[source]
        source: std::io::Error,
    },
}

pub async fn run_server(config: &Config) -> Result<(), ServerError> {
    let catalog = api::Catalog::load(&config.data_dir)?;
    let state = Arc::new(routes::AppState::new(catalog));
    let app = routes::build_router(state, &config.images_dir());

    let io_err = |source| ServerError::Io {
        bind: config.bind.clone(),
        source,
    };
    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .map_err(io_err)?;
    tracing::info!("akchars server listening on http://{}", config.bind);
    axum::serve(listener, app).await.map_err(io_err)
}
