pub mod auth;
pub mod companies;

use std::time::Duration;

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use self::auth::ServerState;
use crate::metrics::encode_metrics;
use crate::openapi::ApiDoc;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics() -> (axum::http::StatusCode, String) {
    encode_metrics()
}

/// Build the full application router: public probes, user and company APIs,
/// and the Swagger UI.
pub fn build_router(state: ServerState, cors: CorsLayer, request_timeout: Duration) -> Router {
    let api = Router::new()
        .route("/v1/users", post(auth::register))
        .route("/v1/users/login", post(auth::login))
        .route("/v1/companies", get(companies::list).post(companies::create))
        .route(
            "/v1/companies/:id",
            get(companies::get).put(companies::update).delete(companies::delete),
        )
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .merge(api)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request with method and path
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status code and latency
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
