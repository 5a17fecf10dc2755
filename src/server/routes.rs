use std::path::Path;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::roster::RosterMatcher;
use crate::server::api::{self, Catalog, CharsQuery, RosterMatchRequest};

pub struct AppState {
    pub catalog: Catalog,
    pub matcher: RosterMatcher,
}

impl AppState {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            matcher: RosterMatcher::default(),
        }
    }
}

pub type SharedState = Arc<AppState>;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    pub message: String,
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            status: "error",
            message: message.into(),
        }),
    )
        .into_response()
}

pub fn build_router(state: SharedState, images_dir: &Path) -> Router {
    let api_routes = Router::new()
        .route("/api/health", get(health))
        .route("/api/chars", get(chars))
        .route("/api/tiers", get(tiers))
        .route("/api/groups", get(groups))
        .route("/api/filters", get(filters))
        .route("/api/professions", get(professions))
        .route("/api/data/version", get(data_version))
        .route("/api/roster/match", post(roster_match))
        .with_state(state);

    Router::new()
        .merge(api_routes)
        .nest_service("/images", ServeDir::new(images_dir))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<api::HealthResponse> {
    Json(api::health_payload())
}

async fn chars(
    State(state): State<SharedState>,
    Query(query): Query<CharsQuery>,
) -> Json<api::CharsResponse> {
    Json(api::chars_payload(&state.catalog, &query))
}

async fn tiers(State(state): State<SharedState>) -> Json<api::TiersResponse> {
    Json(api::tiers_payload(&state.catalog))
}

async fn groups(State(state): State<SharedState>) -> Json<Vec<crate::catalog::GroupMeta>> {
    Json(api::groups_payload(&state.catalog))
}

async fn filters(State(state): State<SharedState>) -> Json<api::FiltersResponse> {
    Json(api::filters_payload(&state.catalog))
}

async fn professions(
    State(state): State<SharedState>,
) -> Json<Vec<crate::data::profession::SubProfession>> {
    Json(api::professions_payload(&state.catalog))
}

async fn data_version(State(state): State<SharedState>) -> Json<api::DataVersionResponse> {
    Json(api::data_version_payload(&state.catalog))
}

async fn roster_match(
    State(state): State<SharedState>,
    body: Result<Json<RosterMatchRequest>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(request)) => {
            Json(api::roster_match_payload(&state.catalog, &state.matcher, &request))
                .into_response()
        }
        Err(rejection) => error_response(
            StatusCode::BAD_REQUEST,
            format!("Invalid request body: {}", rejection.body_text()),
        ),
    }
}

async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Route not found")
}
