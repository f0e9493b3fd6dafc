pub mod matching;
pub mod movie;
pub mod selection;

pub use matching::{MatchResult, MatchSource, RecommendationCandidate};
pub use movie::{MovieCandidate, TmdbMovie, TmdbSearchResponse};
pub use selection::{SessionData, UserSlot};
