// region:    --- Imports
use crate::config::AppConfig;
use crate::handlers;
use crate::store::MarketStore;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

// endregion: --- Imports

/// 핸들러 공유 상태
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MarketStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn MarketStore>, config: AppConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

// region:    --- Router
pub fn build_router(state: AppState) -> Router {
    let max_body_bytes = state.config.server.max_body_bytes;

    Router::new()
        .route("/", get(handlers::index))
        .route("/categories", get(handlers::categories))
        .route("/categories/:id", get(handlers::category))
        .route("/closed", get(handlers::closed))
        .route(
            "/create",
            get(handlers::create_form).post(handlers::create),
        )
        .route("/listings/:id", get(handlers::listing))
        .route(
            "/listings/:id/add",
            post(handlers::watch).get(handlers::method_not_allowed),
        )
        .route(
            "/listings/:id/remove",
            post(handlers::unwatch).get(handlers::method_not_allowed),
        )
        .route("/listings/:id/bid", post(handlers::bid))
        .route("/listings/:id/close", post(handlers::close))
        .route("/listings/:id/comment", post(handlers::comment))
        .route(
            "/listings/:id/edit",
            get(handlers::edit_form).post(handlers::edit),
        )
        .route("/watchlist", get(handlers::watchlist))
        .route(
            "/login",
            get(handlers::login_form).post(handlers::login),
        )
        .route("/logout", get(handlers::logout))
        .route(
            "/register",
            get(handlers::register_form).post(handlers::register),
        )
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

// endregion: --- Router
