use serde::Deserialize;

const TMDB_KEY_PLACEHOLDER: &str = "YOUR_TMDB_API_KEY";
const GEMINI_KEY_PLACEHOLDER: &str = "YOUR_GEMINI_API_KEY";
const SECRET_KEY_PLACEHOLDER: &str = "dev-secret-key-change-in-production";

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB bearer token
    #[serde(default = "default_tmdb_api_key")]
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Language requested from TMDB searches
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Gemini API key
    #[serde(default = "default_gemini_api_key")]
    pub gemini_api_key: String,

    /// Gemini API base URL
    #[serde(default = "default_gemini_api_url")]
    pub gemini_api_url: String,

    /// Gemini model name
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Secret used to sign session cookies
    #[serde(default = "default_secret_key")]
    pub secret_key: String,

    /// Redis connection URL; sessions stay in memory when unset
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Session inactivity TTL in seconds
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    /// Timeout for each catalog request
    #[serde(default = "default_catalog_timeout_secs")]
    pub catalog_timeout_secs: u64,

    /// Timeout for the generative model request
    #[serde(default = "default_generation_timeout_secs")]
    pub generation_timeout_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_key() -> String {
    TMDB_KEY_PLACEHOLDER.to_string()
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_language() -> String {
    "en-US".to_string()
}

fn default_gemini_api_key() -> String {
    GEMINI_KEY_PLACEHOLDER.to_string()
}

fn default_gemini_api_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-flash-lite-latest".to_string()
}

fn default_secret_key() -> String {
    SECRET_KEY_PLACEHOLDER.to_string()
}

fn default_session_ttl_secs() -> u64 {
    3600
}

fn default_catalog_timeout_secs() -> u64 {
    5
}

fn default_generation_timeout_secs() -> u64 {
    15
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tmdb_api_key: default_tmdb_api_key(),
            tmdb_api_url: default_tmdb_api_url(),
            tmdb_language: default_tmdb_language(),
            gemini_api_key: default_gemini_api_key(),
            gemini_api_url: default_gemini_api_url(),
            gemini_model: default_gemini_model(),
            secret_key: default_secret_key(),
            redis_url: None,
            session_ttl_secs: default_session_ttl_secs(),
            catalog_timeout_secs: default_catalog_timeout_secs(),
            generation_timeout_secs: default_generation_timeout_secs(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// TMDB key, or `None` when left at the placeholder
    pub fn catalog_api_key(&self) -> Option<&str> {
        configured(&self.tmdb_api_key, TMDB_KEY_PLACEHOLDER)
    }

    /// Gemini key, or `None` when left at the placeholder
    pub fn generation_api_key(&self) -> Option<&str> {
        configured(&self.gemini_api_key, GEMINI_KEY_PLACEHOLDER)
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == SECRET_KEY_PLACEHOLDER
    }

    /// Logs a warning for every credential that falls back to degraded behavior
    pub fn warn_unconfigured(&self) {
        if self.catalog_api_key().is_none() {
            tracing::warn!("TMDB_API_KEY not configured, catalog searches return mock data");
        }
        if self.generation_api_key().is_none() {
            tracing::warn!("GEMINI_API_KEY not configured, using fallback recommendations");
        }
        if self.uses_default_secret() {
            tracing::warn!("SECRET_KEY not configured, session cookies use the development secret");
        }
    }
}

fn configured<'a>(value: &'a str, placeholder: &str) -> Option<&'a str> {
    let value = value.trim();
    if value.is_empty() || value == placeholder {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_unconfigured() {
        let config = Config::default();
        assert_eq!(config.catalog_api_key(), None);
        assert_eq!(config.generation_api_key(), None);
        assert!(config.uses_default_secret());
        assert_eq!(config.session_ttl_secs, 3600);
        assert_eq!(config.catalog_timeout_secs, 5);
    }

    #[test]
    fn test_empty_key_is_unconfigured() {
        let config = Config {
            tmdb_api_key: "   ".to_string(),
            ..Config::default()
        };
        assert_eq!(config.catalog_api_key(), None);
    }

    #[test]
    fn test_real_keys_are_returned() {
        let config = Config {
            tmdb_api_key: "tmdb-token".to_string(),
            gemini_api_key: "gemini-key".to_string(),
            ..Config::default()
        };
        assert_eq!(config.catalog_api_key(), Some("tmdb-token"));
        assert_eq!(config.generation_api_key(), Some("gemini-key"));
    }

    #[test]
    fn test_envy_fills_defaults() {
        let vars = vec![("GEMINI_MODEL".to_string(), "gemini-pro".to_string())];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.gemini_model, "gemini-pro");
        assert_eq!(config.tmdb_api_url, "https://api.themoviedb.org/3");
        assert_eq!(config.redis_url, None);
        assert_eq!(config.port, 3000);
    }
}
