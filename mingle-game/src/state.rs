//! Persisted game-state model shared by every mode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::{Line, Square};
use crate::hunt::HuntItem;

/// Lifecycle phase of the whole game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    #[default]
    Start,
    Playing,
    Bingo,
}

impl GamePhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Playing => "playing",
            Self::Bingo => "bingo",
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GamePhase {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Self::Start),
            "playing" => Ok(Self::Playing),
            "bingo" => Ok(Self::Bingo),
            _ => Err(()),
        }
    }
}

/// Which of the three play modes is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Bingo,
    Hunt,
    Deck,
}

impl GameMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bingo => "bingo",
            Self::Hunt => "hunt",
            Self::Deck => "deck",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bingo" => Ok(Self::Bingo),
            "hunt" => Ok(Self::Hunt),
            "deck" => Ok(Self::Deck),
            _ => Err(()),
        }
    }
}

/// Everything that survives a reload. The orchestrator owns the live value;
/// the persistence codec only ever reads or writes the whole record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    #[serde(rename = "gameState")]
    pub phase: GamePhase,
    pub mode: GameMode,
    pub board: Vec<Square>,
    pub winning_line: Option<Line>,
    pub hunt_items: Vec<HuntItem>,
}
