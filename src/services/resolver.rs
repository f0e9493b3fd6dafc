/// Match resolution
///
/// Turns two user-selected titles into one recommendation. The generative model
/// only proposes candidates; a candidate is returned only after the catalog
/// confirms it exists. Anything else (no model configured, model error, no
/// parsable or verifiable candidate) resolves to the curated fallback table.
use std::sync::Arc;

use crate::{
    models::{MatchResult, MatchSource},
    services::{
        catalog::MovieCatalog, fallback::FallbackSelector, generation::GenerativeModel,
        parser::parse_recommendations,
    },
};

/// Builds the fixed recommendation prompt for two titles
pub fn build_prompt(title1: &str, title2: &str) -> String {
    format!(
        r#"You are a film enthusiast and recommendation expert. Two users picked these movies:

User 1: {title1}
User 2: {title2}

For someone who loved both of these movies, consider the traits of both (genre, themes, style, etc.) and suggest 3 alternative movies.

Important: only suggest REAL, WELL-KNOWN movies. Do not invent titles!

Answer in exactly this format, one per line:
1. MOVIE TITLE | REASON
2. MOVIE TITLE | REASON
3. MOVIE TITLE | REASON

Example:
1. The Prestige | Intriguing and thought-provoking structure.
2. Inception | Great cinematography and a mind-bending script.
3. The Dark Knight | Gripping plot and strong performances.

Now give your answer:"#
    )
}

#[derive(Clone)]
pub struct MatchResolver {
    catalog: Arc<dyn MovieCatalog>,
    /// `None` when no generative model is configured
    model: Option<Arc<dyn GenerativeModel>>,
    fallback: FallbackSelector,
}

impl MatchResolver {
    pub fn new(catalog: Arc<dyn MovieCatalog>, model: Option<Arc<dyn GenerativeModel>>) -> Self {
        Self {
            catalog,
            model,
            fallback: FallbackSelector::new(),
        }
    }

    /// Resolves a recommendation for two titles; never fails
    pub async fn resolve(&self, title1: &str, title2: &str) -> MatchResult {
        let Some(model) = self.model.as_ref() else {
            tracing::info!("Generative model not configured, using fallback recommendation");
            return self.fallback_result(title1, title2).await;
        };

        let prompt = build_prompt(title1, title2);
        let response = match model.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(model = %model.name(), error = %e, "Generative model request failed");
                return self.fallback_result(title1, title2).await;
            }
        };

        let candidates = parse_recommendations(&response);
        tracing::info!(
            user1_movie = %title1,
            user2_movie = %title2,
            candidates = candidates.len(),
            "Parsed model recommendations"
        );

        for candidate in candidates {
            if self.catalog.exists(&candidate.title).await {
                tracing::info!(movie = %candidate.title, "Verified recommendation in catalog");
                let backdrop_path = self.catalog.backdrop_of(&candidate.title).await;
                return MatchResult {
                    movie: candidate.title,
                    reason: candidate.reason,
                    backdrop_path,
                    source: MatchSource::Model,
                };
            }
            tracing::debug!(movie = %candidate.title, "Recommendation not found in catalog");
        }

        tracing::warn!("No model recommendation verified in catalog, using fallback");
        self.fallback_result(title1, title2).await
    }

    async fn fallback_result(&self, title1: &str, title2: &str) -> MatchResult {
        let (movie, reason) = self.fallback.pick();
        tracing::info!(
            user1_movie = %title1,
            user2_movie = %title2,
            recommended = %movie,
            "Fallback recommendation selected"
        );

        MatchResult {
            movie: movie.to_string(),
            reason: reason.to_string(),
            backdrop_path: self.catalog.backdrop_of(movie).await,
            source: MatchSource::Fallback,
        }
    }
}
