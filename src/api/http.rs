//! HTTP server setup with Axum

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use async_graphql::http::GraphiQLSource;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::extractors::ClientIp;
use super::graphql::AdminSchema;

/// Shared state for the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub schema: AdminSchema,
    /// Serve the GraphiQL page on `GET /graphql`
    pub graphiql: bool,
}

impl AppState {
    pub fn new(schema: AdminSchema, graphiql: bool) -> Self {
        Self { schema, graphiql }
    }
}

/// Create the Axum router with all endpoints
pub fn create_router(state: AppState) -> Router {
    // The admin UI is served from a different origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Execute a GraphQL request, attaching the caller's IP
async fn graphql_handler(
    State(state): State<AppState>,
    client_ip: ClientIp,
    Json(request): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    let response = state.schema.execute(request.data(client_ip)).await;
    if response.is_err() {
        tracing::debug!(errors = ?response.errors, "graphql request failed");
    }
    Json(response)
}

async fn graphiql(State(state): State<AppState>) -> Response {
    if !state.graphiql {
        return StatusCode::NOT_FOUND.into_response();
    }
    Html(GraphiQLSource::build().endpoint("/graphql").finish()).into_response()
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
