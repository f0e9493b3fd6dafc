use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    models::{MovieCandidate, SessionData, UserSlot},
    session::SessionId,
};

use super::AppState;

/// Shortest search query forwarded to the catalog
pub const MIN_QUERY_CHARS: usize = 2;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct SearchMovieRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct SearchMovieResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub results: Vec<MovieCandidate>,
}

#[derive(Debug, Deserialize)]
pub struct SelectMovieRequest {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub movie: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct SelectMovieResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct FindMatchResponse {
    pub success: bool,
    pub user1_movie: String,
    pub user2_movie: String,
    pub recommended_movie: String,
    pub reason: String,
    pub backdrop_path: Option<String>,
}

/// Whether a submitted movie counts as absent: null, `false`, zero, or an
/// empty string, array or object
fn is_blank(movie: &Value) -> bool {
    match movie {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

/// Loads the caller's session and restarts its TTL
pub(crate) async fn load_session(state: &AppState, session: &SessionId) -> AppResult<SessionData> {
    match state.sessions.get(session.as_str()).await? {
        Some(data) => {
            state.sessions.set(session.as_str(), &data).await?;
            Ok(data)
        }
        None => Ok(SessionData::default()),
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Searches the catalog for a movie title
pub async fn search_movie(
    State(state): State<AppState>,
    payload: Result<Json<SearchMovieRequest>, JsonRejection>,
) -> AppResult<Json<SearchMovieResponse>> {
    let Json(request) = payload?;
    let query = request.query.trim();

    if query.chars().count() < MIN_QUERY_CHARS {
        return Err(AppError::InvalidInput(format!(
            "Enter at least {} characters",
            MIN_QUERY_CHARS
        )));
    }

    let results = state.catalog.search(query).await;

    if results.is_empty() {
        return Ok(Json(SearchMovieResponse {
            error: Some("No movies found".to_string()),
            results,
        }));
    }

    Ok(Json(SearchMovieResponse {
        error: None,
        results,
    }))
}

/// Stores a user's movie choice in the session
pub async fn select_movie(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    payload: Result<Json<SelectMovieRequest>, JsonRejection>,
) -> AppResult<Json<SelectMovieResponse>> {
    let Json(request) = payload?;

    let (Some(user), Some(movie)) = (request.user, request.movie) else {
        return Err(AppError::InvalidInput("Missing parameters".to_string()));
    };
    if user.is_empty() || is_blank(&movie) {
        return Err(AppError::InvalidInput("Missing parameters".to_string()));
    }

    let user: UserSlot = user.parse().map_err(AppError::InvalidInput)?;

    let mut data = state.sessions.get(session.as_str()).await?.unwrap_or_default();
    data.select(user, movie);
    state.sessions.set(session.as_str(), &data).await?;

    let title = data.selected_title(user).unwrap_or_default();
    tracing::info!(user = %user, title = %title, "Movie selected");

    Ok(Json(SelectMovieResponse {
        success: true,
        message: format!("{} movie saved", user),
    }))
}

/// Recommends a movie matching both users' selections
pub async fn find_match(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
) -> AppResult<Json<FindMatchResponse>> {
    let data = load_session(&state, &session).await?;

    let Some((user1_movie, user2_movie)) = data.both_titles() else {
        return Err(AppError::InvalidInput(
            "Both users need to select a movie".to_string(),
        ));
    };

    tracing::info!(
        user1_movie = %user1_movie,
        user2_movie = %user2_movie,
        "Finding match"
    );

    let result = state.resolver.resolve(&user1_movie, &user2_movie).await;

    tracing::info!(
        recommended = %result.movie,
        source = ?result.source,
        "Match found"
    );

    Ok(Json(FindMatchResponse {
        success: true,
        user1_movie,
        user2_movie,
        recommended_movie: result.movie,
        reason: result.reason,
        backdrop_path: result.backdrop_path,
    }))
}
