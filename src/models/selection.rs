use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{collections::BTreeMap, fmt::Display, str::FromStr};

/// Title shown for a selection that carries no usable title
pub const UNKNOWN_TITLE: &str = "Unknown";

/// Which of the two users a selection belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserSlot {
    User1,
    User2,
}

impl Display for UserSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserSlot::User1 => write!(f, "user1"),
            UserSlot::User2 => write!(f, "user2"),
        }
    }
}

impl FromStr for UserSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user1" => Ok(UserSlot::User1),
            "user2" => Ok(UserSlot::User2),
            other => Err(format!("Unknown user: {}", other)),
        }
    }
}

/// Per-session state: the movie object each user picked
///
/// Movie objects are kept exactly as the client sent them. They usually come
/// from a catalog search, so they are not verified again here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionData {
    #[serde(default)]
    pub selected_movies: BTreeMap<UserSlot, Value>,
}

impl SessionData {
    /// Stores or overwrites the selection for `user`
    pub fn select(&mut self, user: UserSlot, movie: Value) {
        self.selected_movies.insert(user, movie);
    }

    pub fn selection(&self, user: UserSlot) -> Option<&Value> {
        self.selected_movies.get(&user)
    }

    /// Title of a user's selection, `None` if that user has not picked yet
    pub fn selected_title(&self, user: UserSlot) -> Option<String> {
        self.selection(user).map(|movie| {
            movie
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or(UNKNOWN_TITLE)
                .to_string()
        })
    }

    /// Both titles, once both users have selected
    pub fn both_titles(&self) -> Option<(String, String)> {
        Some((
            self.selected_title(UserSlot::User1)?,
            self.selected_title(UserSlot::User2)?,
        ))
    }
}
