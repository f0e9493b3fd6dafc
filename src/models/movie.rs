use serde::{Deserialize, Serialize};

/// Year label used when the catalog has no release date
pub const UNKNOWN_YEAR: &str = "unknown";

/// A movie returned to the client from a catalog search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieCandidate {
    /// Catalog identifier; absent for synthetic results
    pub id: Option<u64>,
    pub title: String,
    /// First four characters of the release date, or "unknown"
    pub year: String,
    /// Image reference relative to the catalog's image host
    pub backdrop_path: Option<String>,
    pub overview: String,
    /// Vote average rounded to one decimal
    pub rating: f64,
}

impl MovieCandidate {
    /// Synthetic candidate echoing the query, used when no catalog key is configured
    pub fn synthetic(query: &str) -> Self {
        Self {
            id: None,
            title: query.to_string(),
            year: UNKNOWN_YEAR.to_string(),
            backdrop_path: None,
            overview: String::new(),
            rating: 0.0,
        }
    }
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Raw response from TMDB `GET /search/movie`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchResponse {
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
}

/// Single TMDB search result
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

impl From<TmdbMovie> for MovieCandidate {
    fn from(movie: TmdbMovie) -> Self {
        let year = match movie.release_date.as_deref() {
            Some(date) if !date.is_empty() => date.chars().take(4).collect(),
            _ => UNKNOWN_YEAR.to_string(),
        };

        MovieCandidate {
            id: Some(movie.id),
            title: movie.title,
            year,
            backdrop_path: movie.backdrop_path,
            overview: movie.overview.unwrap_or_default(),
            rating: round_rating(movie.vote_average.unwrap_or(0.0)),
        }
    }
}

fn round_rating(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
