use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::{Greeting, Health};

use crate::openapi::ApiDoc;
use crate::state::ServerState;

pub mod comments;
pub mod movies;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

#[utoipa::path(get, path = "/", tag = "health", responses((status = 200, description = "Greeting for the current environment")))]
pub async fn root(State(state): State<ServerState>) -> Json<Greeting> {
    Json(Greeting { msg: common::greeting(&state.environment) })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn movie_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(movies::list).post(movies::create))
        .route("/search", get(movies::search_by_title))
        .route("/search/dynamic", get(movies::search_dynamic))
        .route("/ratings", get(movies::ratings))
        .route("/comment-counts", get(movies::comment_counts))
        .route("/sorted", get(movies::sorted_by_name))
        .route("/release-date", get(movies::by_release_date))
        .route("/:id", get(movies::get).put(movies::update).delete(movies::delete))
        .route("/:id/avg-rating", get(movies::avg_rating))
        .route("/:id/comment", axum::routing::post(comments::create))
}

fn comment_routes() -> Router<ServerState> {
    Router::new()
        .route("/:id", get(comments::get).put(comments::update).delete(comments::delete))
}

/// Build the full application router
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api/v1/movie", movie_routes())
        .nest("/api/v1/comment", comment_routes())
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // status code and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
