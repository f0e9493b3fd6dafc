/// Movie catalog client
///
/// Wraps the TMDB movie search endpoint. The catalog is the authority on which
/// titles exist: every operation here is a single stateless search call, and
/// none of them report errors to the caller. Transport and HTTP failures
/// degrade to an empty list, `false`, or no image.
use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{MovieCandidate, TmdbMovie, TmdbSearchResponse},
};

/// Number of search results returned to the client
pub const SEARCH_RESULT_LIMIT: usize = 5;

/// Catalog lookups used by the search endpoint and the match resolver
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Searches by free-text title, returning at most five candidates
    async fn search(&self, query: &str) -> Vec<MovieCandidate>;

    /// Whether the catalog knows any movie matching `title`
    async fn exists(&self, title: &str) -> bool;

    /// Backdrop image of the first movie matching `title`
    async fn backdrop_of(&self, title: &str) -> Option<String>;
}

/// TMDB-backed catalog
#[derive(Clone)]
pub struct TmdbCatalog {
    http_client: HttpClient,
    /// `None` runs the catalog in mock mode
    api_key: Option<String>,
    api_url: String,
    language: String,
}

impl TmdbCatalog {
    pub fn new(
        api_key: Option<String>,
        api_url: String,
        language: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
            language,
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(
            config.catalog_api_key().map(str::to_string),
            config.tmdb_api_url.clone(),
            config.tmdb_language.clone(),
            Duration::from_secs(config.catalog_timeout_secs),
        )
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Raw search call shared by all catalog operations
    async fn fetch_results(&self, api_key: &str, query: &str) -> AppResult<Vec<TmdbMovie>> {
        let url = format!("{}/search/movie", self.api_url.trim_end_matches('/'));

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(api_key)
            .header("accept", "application/json")
            .query(&[("query", query), ("language", self.language.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let search: TmdbSearchResponse = response.json().await?;
        Ok(search.results)
    }
}

#[async_trait::async_trait]
impl MovieCatalog for TmdbCatalog {
    async fn search(&self, query: &str) -> Vec<MovieCandidate> {
        let Some(api_key) = self.api_key.as_deref() else {
            return vec![MovieCandidate::synthetic(query)];
        };

        match self.fetch_results(api_key, query).await {
            Ok(results) => {
                let movies: Vec<MovieCandidate> = results
                    .into_iter()
                    .take(SEARCH_RESULT_LIMIT)
                    .map(MovieCandidate::from)
                    .collect();

                tracing::info!(
                    query = %query,
                    results = movies.len(),
                    provider = "tmdb",
                    "Movie search completed"
                );

                movies
            }
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "TMDB search failed");
                Vec::new()
            }
        }
    }

    async fn exists(&self, title: &str) -> bool {
        let Some(api_key) = self.api_key.as_deref() else {
            return false;
        };

        match self.fetch_results(api_key, title).await {
            Ok(results) => !results.is_empty(),
            Err(e) => {
                tracing::warn!(title = %title, error = %e, "TMDB existence check failed");
                false
            }
        }
    }

    async fn backdrop_of(&self, title: &str) -> Option<String> {
        let api_key = self.api_key.as_deref()?;

        match self.fetch_results(api_key, title).await {
            Ok(results) => {
                let backdrop = results.into_iter().next().and_then(|m| m.backdrop_path);
                tracing::debug!(title = %title, found = backdrop.is_some(), "Backdrop lookup");
                backdrop
            }
            Err(e) => {
                tracing::warn!(title = %title, error = %e, "TMDB backdrop lookup failed");
                None
            }
        }
    }
}
