//! REST API for running cooking shows.
//!
//! Provides HTTP endpoints for creating shows, attaching recipe items,
//! adding steps and moving a show through its steps.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod dto;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::ApiState;

/// Build the API router with all routes
pub fn build_router(state: ApiState) -> Router {
    let cors_enabled = state.config.server.cors;

    let router = Router::new()
        .route("/health", get(routes::health::health))
        // Show endpoints
        .route("/show", post(routes::shows::create))
        .route("/show/next", get(routes::shows::next))
        .route("/show/:show_id", get(routes::shows::get_one))
        .route(
            "/show/:show_id/item/:recipe_id",
            post(routes::shows::attach_item),
        )
        .route("/show/:show_id/start", post(routes::shows::start))
        .route("/show/:show_id/finished", post(routes::shows::finish))
        // Step endpoints
        .route("/show/:show_id/step", post(routes::steps::create))
        .route("/show/:show_id/step/current", get(routes::steps::current))
        .route("/show/:show_id/step/next", put(routes::steps::advance))
        // Recipe item endpoints
        .route("/recipe-item", post(routes::recipe_items::create))
        .route("/recipe-item/:recipe_id", get(routes::recipe_items::get_one))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http());

    let router = if cors_enabled {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    };

    router.with_state(state)
}

/// Start the REST API server and run until Ctrl-C
pub async fn serve(state: ApiState, addr: SocketAddr) -> Result<()> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("REST API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("REST API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
