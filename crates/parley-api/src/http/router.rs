//! Axum router configuration with middleware.
//!
//! All conversational routes are under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/bootstrap", post(handlers::turn::bootstrap))
        .route("/menu", post(handlers::turn::advance_menu))
        .route("/message", post(handlers::turn::message))
        .route("/voice", post(handlers::turn::voice))
        .route("/contact", post(handlers::contact::submit_contact))
        .route("/reset", post(handlers::turn::reset))
        .route("/history", get(handlers::turn::history));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - liveness plus component availability.
async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "generation_model": state.engine.generation_model(),
        "fallback_sessions": state.engine.store().local().session_count(),
    }))
}
