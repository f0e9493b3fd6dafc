pub mod catalog;
pub mod fallback;
pub mod generation;
pub mod parser;
pub mod resolver;

pub use catalog::{MovieCatalog, TmdbCatalog};
pub use fallback::FallbackSelector;
pub use generation::{GeminiClient, GenerativeModel};
pub use parser::parse_recommendations;
pub use resolver::MatchResolver;
