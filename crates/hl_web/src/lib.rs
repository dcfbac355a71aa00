use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod handlers;
pub mod state;

pub use handlers::{build_envelope, NewsEnvelope};
pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/news", get(handlers::get_news).options(handlers::preflight))
        .route("/api/status", get(handlers::get_status))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use hl_core::{Error, Result, RewrittenItem};
    pub use crate::{create_app, AppState, NewsEnvelope};
}
