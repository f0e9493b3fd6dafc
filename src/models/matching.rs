use serde::{Deserialize, Serialize};

/// A recommendation parsed from generative model output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationCandidate {
    pub title: String,
    pub reason: String,
}

impl RecommendationCandidate {
    pub fn new(title: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            reason: reason.into(),
        }
    }
}

/// Where a match result came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSource {
    /// A model suggestion verified against the catalog
    Model,
    /// The curated fallback table
    #[default]
    Fallback,
}

/// Final output of match resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub movie: String,
    pub reason: String,
    pub backdrop_path: Option<String>,
    #[serde(skip)]
    pub source: MatchSource,
}
