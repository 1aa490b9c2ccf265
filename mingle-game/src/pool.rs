//! Question pool contract: the ordered prompt list feeding every game mode.
//!
//! The pool is an ordered sequence of distinct prompt strings plus one
//! reserved free-space sentinel, recognized by string equality. Board
//! generation consumes 24 usable prompts; the hunt and deck modes consume
//! all of them.

use serde::{Deserialize, Serialize};

/// Number of prompts a 5x5 board consumes (the center cell is the free space).
pub const BOARD_PROMPTS: usize = 24;

/// Text shown on the pre-marked center square.
pub const FREE_SPACE_TEXT: &str = "FREE SPACE";

// Default prompt set shipped with the game
const DEFAULT_PROMPTS: [&str; 24] = [
    "Has traveled to 3+ countries",
    "Speaks more than two languages",
    "Has met a celebrity",
    "Is an only child",
    "Has run a marathon",
    "Plays a musical instrument",
    "Has a hidden talent",
    "Owns more than two pets",
    "Has never broken a bone",
    "Was born in another country",
    "Can cook a signature dish",
    "Has been skydiving or bungee jumping",
    "Is left-handed",
    "Has the same birthday month as you",
    "Has worked a truly strange job",
    "Prefers tea over coffee",
    "Has seen the northern lights",
    "Can do a magic trick",
    "Has appeared on TV or radio",
    "Knows how to juggle",
    "Has a twin or sibling lookalike",
    "Still owns a physical photo album",
    "Has camped in the wilderness",
    "Sings in the shower",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    #[error("question pool too small: need {required} usable prompts, have {available}")]
    Insufficient { required: usize, available: usize },
}

/// Ordered prompt collection plus the reserved free-space sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionPool {
    pub prompts: Vec<String>,
    pub free_space: String,
}

impl QuestionPool {
    #[must_use]
    pub fn new(prompts: Vec<String>, free_space: impl Into<String>) -> Self {
        Self {
            prompts,
            free_space: free_space.into(),
        }
    }

    /// Parse a pool from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match the pool shape.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Prompts eligible for boards, hunt lists, and decks; the free-space
    /// sentinel is filtered out by equality.
    pub fn usable(&self) -> impl Iterator<Item = &str> {
        self.prompts
            .iter()
            .map(String::as_str)
            .filter(move |p| *p != self.free_space)
    }

    #[must_use]
    pub fn usable_count(&self) -> usize {
        self.usable().count()
    }
}

impl Default for QuestionPool {
    fn default() -> Self {
        Self {
            prompts: DEFAULT_PROMPTS.iter().map(ToString::to_string).collect(),
            free_space: FREE_SPACE_TEXT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pool_has_enough_prompts_for_a_board() {
        let pool = QuestionPool::default();
        assert_eq!(pool.usable_count(), BOARD_PROMPTS);
        assert_eq!(pool.free_space, FREE_SPACE_TEXT);
    }

    #[test]
    fn default_prompts_are_distinct() {
        let pool = QuestionPool::default();
        let unique: std::collections::HashSet<&str> = pool.usable().collect();
        assert_eq!(unique.len(), pool.prompts.len());
    }

    #[test]
    fn usable_filters_the_sentinel_by_equality() {
        let pool = QuestionPool::new(
            vec!["a".into(), "FREE".into(), "b".into()],
            "FREE",
        );
        let usable: Vec<&str> = pool.usable().collect();
        assert_eq!(usable, vec!["a", "b"]);
    }

    #[test]
    fn pool_parses_from_json() {
        let pool = QuestionPool::from_json(
            r#"{"prompts": ["one", "two"], "free_space": "FREE"}"#,
        )
        .unwrap();
        assert_eq!(pool.prompts.len(), 2);
        assert_eq!(pool.free_space, "FREE");
    }
}
