use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::session::{make_span_with_session, session_middleware};

use super::{handlers, pages, AppState};

/// Creates the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let cookies = state.cookies.clone();

    Router::new()
        .route("/health", get(handlers::health_check))
        // Pages
        .route("/", get(pages::index))
        .route("/results", get(pages::results))
        // JSON API
        .route("/api/search-movie", post(handlers::search_movie))
        .route("/api/select-movie", post(handlers::select_movie))
        .route("/api/find-match", post(handlers::find_match))
        .fallback(pages::not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_session))
        .layer(middleware::from_fn_with_state(cookies, session_middleware))
        .layer(CorsLayer::permissive())
}
