use std::sync::Arc;

use crate::{
    config::Config,
    services::{GeminiClient, GenerativeModel, MatchResolver, MovieCatalog, TmdbCatalog},
    session::{self, SessionCookies, SessionStore},
};

/// Shared application state
///
/// Built once at startup from `Config`; nothing in here is mutated per request
/// except the session store, which is keyed by session.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn MovieCatalog>,
    pub resolver: MatchResolver,
    pub sessions: Arc<dyn SessionStore>,
    pub cookies: SessionCookies,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn MovieCatalog>,
        model: Option<Arc<dyn GenerativeModel>>,
        sessions: Arc<dyn SessionStore>,
        cookies: SessionCookies,
    ) -> Self {
        Self {
            resolver: MatchResolver::new(catalog.clone(), model),
            catalog,
            sessions,
            cookies,
        }
    }

    /// Wires the TMDB catalog, the Gemini client and the session backend from config
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let tmdb = TmdbCatalog::from_config(config)?;
        let model = GeminiClient::from_config(config)?
            .map(|client| Arc::new(client) as Arc<dyn GenerativeModel>);

        tracing::info!(
            catalog_configured = tmdb.is_configured(),
            model_configured = model.is_some(),
            "Upstream clients ready"
        );

        let catalog: Arc<dyn MovieCatalog> = Arc::new(tmdb);
        let sessions = session::create_store(config)?;
        let cookies = SessionCookies::new(&config.secret_key, config.session_ttl_secs);

        Ok(Self::new(catalog, model, sessions, cookies))
    }
}
