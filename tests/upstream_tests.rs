use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_test::TestServer;
use serde_json::{json, Value};

use movie_match_api::{
    api::{create_router, AppState},
    services::{
        fallback::FALLBACK_MOVIES, GeminiClient, GenerativeModel, MovieCatalog, TmdbCatalog,
    },
    session::{cookie::SESSION_COOKIE, InMemorySessionStore, SessionCookies},
};

const TMDB_TOKEN: &str = "test-token";
const GEMINI_KEY: &str = "test-key";

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn tmdb_movie(id: u64, title: &str, backdrop: Option<&str>) -> Value {
    json!({
        "id": id,
        "title": title,
        "release_date": "2006-10-17",
        "backdrop_path": backdrop,
        "overview": format!("{} overview", title),
        "vote_average": 8.214
    })
}

async fn tmdb_search(headers: HeaderMap, Query(params): Query<HashMap<String, String>>) -> Response {
    let expected = format!("Bearer {}", TMDB_TOKEN);
    if headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) != Some(expected.as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "status_message": "Invalid API key" })),
        )
            .into_response();
    }

    let query = params.get("query").cloned().unwrap_or_default();
    let results: Vec<Value> = match query.as_str() {
        "The Prestige" => vec![tmdb_movie(1124, "The Prestige", Some("/prestige.jpg"))],
        "Memento" => vec![tmdb_movie(77, "Memento", None)],
        "Inception" => vec![tmdb_movie(27205, "Inception", Some("/inception.jpg"))],
        "Batman" => (0..7)
            .map(|i| tmdb_movie(i, &format!("Batman {}", i), None))
            .collect(),
        _ => vec![],
    };

    Json(json!({ "page": 1, "results": results })).into_response()
}

async fn spawn_tmdb() -> String {
    spawn(Router::new().route("/search/movie", get(tmdb_search))).await
}

#[derive(Clone)]
struct GeminiReply {
    status: StatusCode,
    text: &'static str,
}

async fn gemini_generate(
    State(reply): State<Arc<GeminiReply>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) != Some(GEMINI_KEY) {
        return (StatusCode::FORBIDDEN, Json(json!({ "error": { "message": "bad key" } })))
            .into_response();
    }
    if body["contents"][0]["parts"][0]["text"].as_str().is_none() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": { "message": "no prompt" } })))
            .into_response();
    }
    if !reply.status.is_success() {
        return (reply.status, Json(json!({ "error": { "message": "quota exceeded" } })))
            .into_response();
    }

    Json(json!({
        "candidates": [{
            "content": { "parts": [{ "text": reply.text }], "role": "model" },
            "finishReason": "STOP"
        }]
    }))
    .into_response()
}

async fn spawn_gemini(status: StatusCode, text: &'static str) -> String {
    let reply = Arc::new(GeminiReply { status, text });
    spawn(
        Router::new()
            .route("/models/:call", post(gemini_generate))
            .with_state(reply),
    )
    .await
}

/// Upstream that answers far later than any client timeout used below
async fn spawn_hanging() -> String {
    async fn hang() -> Response {
        tokio::time::sleep(Duration::from_secs(30)).await;
        StatusCode::OK.into_response()
    }

    spawn(
        Router::new()
            .route("/search/movie", get(hang))
            .route("/models/:call", post(hang)),
    )
    .await
}

fn catalog_with_timeout(url: String, token: &str, timeout: Duration) -> TmdbCatalog {
    TmdbCatalog::new(Some(token.to_string()), url, "en-US".to_string(), timeout).unwrap()
}

fn catalog(url: String, token: &str) -> TmdbCatalog {
    catalog_with_timeout(url, token, Duration::from_secs(5))
}

fn gemini_with_timeout(url: String, key: &str, timeout: Duration) -> GeminiClient {
    GeminiClient::new(key.to_string(), url, "gemini-test".to_string(), timeout).unwrap()
}

fn gemini(url: String, key: &str) -> GeminiClient {
    gemini_with_timeout(url, key, Duration::from_secs(5))
}

#[tokio::test]
async fn test_tmdb_search_maps_and_truncates_results() {
    let catalog = catalog(spawn_tmdb().await, TMDB_TOKEN);

    let results = catalog.search("Batman").await;
    assert_eq!(results.len(), 5);
    assert_eq!(results[0].title, "Batman 0");
    assert_eq!(results[0].year, "2006");
    assert_eq!(results[0].rating, 8.2);

    let results = catalog.search("The Prestige").await;
    assert_eq!(results[0].backdrop_path, Some("/prestige.jpg".to_string()));
    assert_eq!(results[0].overview, "The Prestige overview");

    assert!(catalog.search("Nothing Matches").await.is_empty());
}

#[tokio::test]
async fn test_tmdb_exists_and_backdrop() {
    let catalog = catalog(spawn_tmdb().await, TMDB_TOKEN);

    assert!(catalog.exists("Memento").await);
    assert!(!catalog.exists("Totally Invented Film").await);

    assert_eq!(
        catalog.backdrop_of("The Prestige").await,
        Some("/prestige.jpg".to_string())
    );
    assert_eq!(catalog.backdrop_of("Memento").await, None);
    assert_eq!(catalog.backdrop_of("Totally Invented Film").await, None);
}

#[tokio::test]
async fn test_tmdb_rejected_token_fails_closed() {
    let catalog = catalog(spawn_tmdb().await, "wrong-token");

    assert!(catalog.search("The Prestige").await.is_empty());
    assert!(!catalog.exists("The Prestige").await);
    assert_eq!(catalog.backdrop_of("The Prestige").await, None);
}

#[tokio::test]
async fn test_gemini_generate() {
    let client = gemini(
        spawn_gemini(StatusCode::OK, "  1. The Prestige | Rival magicians\n").await,
        GEMINI_KEY,
    );

    let text = client.generate("prompt").await.unwrap();
    assert_eq!(text, "1. The Prestige | Rival magicians");
}

#[tokio::test]
async fn test_gemini_errors() {
    let client = gemini(spawn_gemini(StatusCode::OK, "ignored").await, "wrong-key");
    assert!(client.generate("prompt").await.is_err());

    let client = gemini(
        spawn_gemini(StatusCode::TOO_MANY_REQUESTS, "ignored").await,
        GEMINI_KEY,
    );
    assert!(client.generate("prompt").await.is_err());
}

async fn match_server(gemini_status: StatusCode, gemini_text: &'static str) -> TestServer {
    let model = gemini(spawn_gemini(gemini_status, gemini_text).await, GEMINI_KEY);
    match_server_with(model).await
}

async fn match_server_with(model: GeminiClient) -> TestServer {
    let catalog: Arc<dyn MovieCatalog> = Arc::new(catalog(spawn_tmdb().await, TMDB_TOKEN));
    let model: Arc<dyn GenerativeModel> = Arc::new(model);

    let state = AppState::new(
        catalog,
        Some(model),
        Arc::new(InMemorySessionStore::new(3600)),
        SessionCookies::new("test-secret", 3600),
    );
    TestServer::new(create_router(state)).unwrap()
}

async fn find_match(server: &TestServer) -> Value {
    let response = server
        .post("/api/select-movie")
        .json(&json!({ "user": "user1", "movie": { "title": "Inception" } }))
        .await;
    let cookie = response.cookie(SESSION_COOKIE);

    server
        .post("/api/select-movie")
        .add_cookie(cookie.clone())
        .json(&json!({ "user": "user2", "movie": { "title": "Interstellar" } }))
        .await
        .assert_status_ok();

    let response = server.post("/api/find-match").add_cookie(cookie).await;
    response.assert_status_ok();
    response.json()
}

#[tokio::test]
async fn test_find_match_returns_first_verified_suggestion() {
    let server = match_server(
        StatusCode::OK,
        "1. Totally Invented Film | Not real\n2. The Prestige | Rival magicians\n3. Memento | Memory loss",
    )
    .await;

    let body = find_match(&server).await;
    assert_eq!(body["recommended_movie"], "The Prestige");
    assert_eq!(body["reason"], "Rival magicians");
    assert_eq!(body["backdrop_path"], "/prestige.jpg");
}

#[tokio::test]
async fn test_find_match_falls_back_when_model_fails() {
    let server = match_server(StatusCode::INTERNAL_SERVER_ERROR, "ignored").await;

    let body = find_match(&server).await;
    let recommended = body["recommended_movie"].as_str().unwrap();
    assert!(FALLBACK_MOVIES.iter().any(|(title, _)| *title == recommended));
}

#[tokio::test]
async fn test_find_match_falls_back_when_nothing_verifies() {
    let server = match_server(StatusCode::OK, "1. Invented One | a\n2. Invented Two | b").await;

    let body = find_match(&server).await;
    let recommended = body["recommended_movie"].as_str().unwrap();
    assert!(FALLBACK_MOVIES.iter().any(|(title, _)| *title == recommended));
    // The stub catalog only knows Inception among the fallback titles
    if recommended == "Inception" {
        assert_eq!(body["backdrop_path"], "/inception.jpg");
    } else {
        assert!(body["backdrop_path"].is_null());
    }
}

#[tokio::test]
async fn test_slow_catalog_times_out_and_fails_closed() {
    let timeout = Duration::from_millis(200);
    let catalog = catalog_with_timeout(spawn_hanging().await, TMDB_TOKEN, timeout);

    let started = Instant::now();
    assert!(catalog.search("The Prestige").await.is_empty());
    assert!(!catalog.exists("The Prestige").await);
    assert_eq!(catalog.backdrop_of("The Prestige").await, None);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_slow_model_times_out() {
    let client = gemini_with_timeout(
        spawn_hanging().await,
        GEMINI_KEY,
        Duration::from_millis(200),
    );

    let started = Instant::now();
    assert!(client.generate("prompt").await.is_err());
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_find_match_falls_back_when_model_hangs() {
    let model = gemini_with_timeout(
        spawn_hanging().await,
        GEMINI_KEY,
        Duration::from_millis(200),
    );
    let server = match_server_with(model).await;

    let body = find_match(&server).await;
    let recommended = body["recommended_movie"].as_str().unwrap();
    assert!(FALLBACK_MOVIES.iter().any(|(title, _)| *title == recommended));
}

#[tokio::test]
async fn test_search_endpoint_reports_empty_results() {
    let server = match_server(StatusCode::OK, "ignored").await;

    let response = server
        .post("/api/search-movie")
        .json(&json!({ "query": "Nothing Matches" }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body["error"].is_string());
    assert_eq!(body["results"], json!([]));
}
