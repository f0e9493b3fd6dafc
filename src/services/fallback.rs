use rand::seq::SliceRandom;

/// Curated recommendations used when the model path yields nothing verifiable
pub const FALLBACK_MOVIES: [(&str, &str); 8] = [
    (
        "The Shawshank Redemption",
        "Both picks reward character depth and an emotional story.",
    ),
    (
        "Inception",
        "Striking cinematography and a thought-provoking script, perfect for sci-fi fans.",
    ),
    (
        "The Dark Knight",
        "Its intrigue and performances will satisfy fans of both films.",
    ),
    (
        "Forrest Gump",
        "An inspiring, emotional story that always lands.",
    ),
    (
        "Interstellar",
        "A great blend of science fiction and emotional depth.",
    ),
    (
        "Pulp Fiction",
        "Its structure and characters will delight any film enthusiast.",
    ),
    (
        "The Green Mile",
        "Stands out for its humanity and depth.",
    ),
    (
        "Goodfellas",
        "Succeeds through its cinematography and storytelling.",
    ),
];

/// Picks uniformly at random from the curated fallback table
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackSelector;

impl FallbackSelector {
    pub fn new() -> Self {
        Self
    }

    /// Returns a (title, reason) pair; selection is with replacement
    pub fn pick(&self) -> (&'static str, &'static str) {
        let mut rng = rand::thread_rng();
        *FALLBACK_MOVIES
            .choose(&mut rng)
            .unwrap_or(&FALLBACK_MOVIES[0])
    }
}
