//! Versioned persistence codec: whole-record save/load with strict schema
//! validation.
//!
//! The engine persists one record under one well-known key in a key-value
//! medium. Saves are best-effort (failures are logged, never surfaced) and
//! loads are paranoid: a record that fails any part of the schema check is
//! deleted wholesale so no stale or partial state survives.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::board::{CELLS, LineKind};
use crate::state::{GameMode, GamePhase, GameState};

/// Bumped whenever the stored shape changes; older records are discarded.
pub const SCHEMA_VERSION: u64 = 2;

/// The single well-known storage key.
pub const STORAGE_KEY: &str = "mingle.game-state";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Key-value persistence medium. Platform shells supply the real backing
/// store (browser local storage, a file, ...); [`MemoryStore`] backs tests
/// and native embedding.
pub trait KeyValueStore {
    /// Read the record stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the record stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove the record stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store; clones share the same backing map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Why a stored record was rejected. Any variant discards the whole record;
/// there is no field-level recovery.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("stored record is not a JSON object")]
    NotAnObject,
    #[error("stored schema version {found:?} does not match current {expected}")]
    Version { found: Option<u64>, expected: u64 },
    #[error("field `{0}` is missing or has the wrong type")]
    Field(&'static str),
    #[error("`gameState` holds unknown phase `{0}`")]
    UnknownPhase(String),
    #[error("`mode` holds unknown mode `{0}`")]
    UnknownMode(String),
    #[error("board must hold 0 or {CELLS} squares, found {0}")]
    BoardLength(usize),
    #[error("board square at position {0} is malformed")]
    Square(usize),
    #[error("winning line is malformed")]
    WinningLine,
    #[error("winning line type `{0}` is unknown")]
    UnknownLineKind(String),
    #[error("hunt item at position {0} is malformed")]
    HuntItem(usize),
}

/// The on-disk record: the game state plus the schema version tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredGame {
    pub version: u64,
    #[serde(flatten)]
    pub state: GameState,
}

/// Field-by-field schema check of a raw stored record. Runs before any
/// deserialization into engine types, so a malformed record is rejected with
/// a precise reason instead of a serde error buried in a field path.
///
/// # Errors
///
/// Returns the first [`ValidationError`] encountered.
pub fn validate(raw: &Value) -> Result<(), ValidationError> {
    let obj = raw.as_object().ok_or(ValidationError::NotAnObject)?;

    let version = obj.get("version").and_then(Value::as_u64);
    if version != Some(SCHEMA_VERSION) {
        return Err(ValidationError::Version {
            found: version,
            expected: SCHEMA_VERSION,
        });
    }

    let phase = obj
        .get("gameState")
        .and_then(Value::as_str)
        .ok_or(ValidationError::Field("gameState"))?;
    GamePhase::from_str(phase).map_err(|()| ValidationError::UnknownPhase(phase.to_string()))?;

    let mode = obj
        .get("mode")
        .and_then(Value::as_str)
        .ok_or(ValidationError::Field("mode"))?;
    GameMode::from_str(mode).map_err(|()| ValidationError::UnknownMode(mode.to_string()))?;

    let board = obj
        .get("board")
        .and_then(Value::as_array)
        .ok_or(ValidationError::Field("board"))?;
    if !board.is_empty() && board.len() != CELLS {
        return Err(ValidationError::BoardLength(board.len()));
    }
    for (i, square) in board.iter().enumerate() {
        validate_square(square).map_err(|()| ValidationError::Square(i))?;
    }

    match obj.get("winningLine") {
        None => return Err(ValidationError::Field("winningLine")),
        Some(Value::Null) => {}
        Some(line) => validate_line(line)?,
    }

    let items = obj
        .get("huntItems")
        .and_then(Value::as_array)
        .ok_or(ValidationError::Field("huntItems"))?;
    for (i, item) in items.iter().enumerate() {
        validate_hunt_item(item).map_err(|()| ValidationError::HuntItem(i))?;
    }

    Ok(())
}

fn validate_square(value: &Value) -> Result<(), ()> {
    let obj = value.as_object().ok_or(())?;
    obj.get("id").and_then(Value::as_u64).ok_or(())?;
    obj.get("text").and_then(Value::as_str).ok_or(())?;
    obj.get("isMarked").and_then(Value::as_bool).ok_or(())?;
    obj.get("isFreeSpace").and_then(Value::as_bool).ok_or(())?;
    Ok(())
}

fn validate_line(value: &Value) -> Result<(), ValidationError> {
    let obj = value.as_object().ok_or(ValidationError::WinningLine)?;
    let kind = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ValidationError::WinningLine)?;
    LineKind::from_str(kind).map_err(|()| ValidationError::UnknownLineKind(kind.to_string()))?;
    obj.get("index")
        .and_then(Value::as_u64)
        .ok_or(ValidationError::WinningLine)?;
    let squares = obj
        .get("squares")
        .and_then(Value::as_array)
        .ok_or(ValidationError::WinningLine)?;
    if squares.iter().any(|id| id.as_u64().is_none()) {
        return Err(ValidationError::WinningLine);
    }
    Ok(())
}

fn validate_hunt_item(value: &Value) -> Result<(), ()> {
    let obj = value.as_object().ok_or(())?;
    obj.get("id").and_then(Value::as_u64).ok_or(())?;
    obj.get("text").and_then(Value::as_str).ok_or(())?;
    obj.get("checked").and_then(Value::as_bool).ok_or(())?;
    Ok(())
}

/// Saves and restores the whole game record under one key.
#[derive(Debug, Clone)]
pub struct StatePersister<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> StatePersister<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Persist the full state, version-tagged, as a whole-record replace.
    /// Persistence is best-effort: failures are logged and swallowed.
    pub fn save(&self, state: &GameState) {
        let record = StoredGame {
            version: SCHEMA_VERSION,
            state: state.clone(),
        };
        match serde_json::to_string(&record) {
            Ok(json) => {
                if let Err(e) = self.store.set(&self.key, &json) {
                    warn!("failed to save game state: {e}");
                }
            }
            Err(e) => warn!("failed to serialize game state: {e}"),
        }
    }

    /// Read and validate the stored record. Returns `None` when the record
    /// is absent, unreadable, or fails validation; invalid records are
    /// removed so they cannot resurface on the next load.
    pub fn load(&self) -> Option<GameState> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("failed to read saved game state: {e}");
                return None;
            }
        };

        let value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("saved game state is not valid JSON, clearing: {e}");
                self.discard();
                return None;
            }
        };

        if let Err(e) = validate(&value) {
            warn!("discarding saved game state: {e}");
            self.discard();
            return None;
        }

        match serde_json::from_value::<StoredGame>(value) {
            Ok(record) => Some(record.state),
            Err(e) => {
                warn!("saved game state failed to deserialize, clearing: {e}");
                self.discard();
                None
            }
        }
    }

    /// Drop the stored record, if any.
    pub fn clear(&self) {
        self.discard();
    }

    fn discard(&self) {
        if let Err(e) = self.store.remove(&self.key) {
            warn!("failed to remove saved game state: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::generate_board;
    use crate::hunt::generate_hunt_list;
    use crate::pool::QuestionPool;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use serde_json::json;

    fn playing_state() -> GameState {
        let pool = QuestionPool::default();
        let mut rng = ChaCha20Rng::seed_from_u64(0x90E5);
        GameState {
            phase: GamePhase::Playing,
            mode: GameMode::Bingo,
            board: generate_board(&pool, &mut rng).unwrap(),
            winning_line: None,
            hunt_items: generate_hunt_list(&pool, &mut rng).unwrap(),
        }
    }

    fn stored_value(state: &GameState) -> Value {
        serde_json::to_value(StoredGame {
            version: SCHEMA_VERSION,
            state: state.clone(),
        })
        .unwrap()
    }

    #[test]
    fn engine_produced_states_validate() {
        assert_eq!(validate(&stored_value(&GameState::default())), Ok(()));
        assert_eq!(validate(&stored_value(&playing_state())), Ok(()));
    }

    #[test]
    fn save_then_load_round_trips() {
        let persister = StatePersister::new(MemoryStore::default());
        let state = playing_state();
        persister.save(&state);
        assert_eq!(persister.load(), Some(state));
    }

    #[test]
    fn load_without_a_record_is_none() {
        let persister = StatePersister::new(MemoryStore::default());
        assert_eq!(persister.load(), None);
    }

    #[test]
    fn wrong_version_is_rejected() {
        let mut value = stored_value(&GameState::default());
        value["version"] = json!(SCHEMA_VERSION + 1);
        assert_eq!(
            validate(&value),
            Err(ValidationError::Version {
                found: Some(SCHEMA_VERSION + 1),
                expected: SCHEMA_VERSION,
            })
        );
    }

    #[test]
    fn off_by_one_board_lengths_are_rejected() {
        for len in [CELLS - 1, CELLS + 1] {
            let mut state = playing_state();
            let filler = state.board[0].clone();
            state.board.resize(len, filler);
            assert_eq!(
                validate(&stored_value(&state)),
                Err(ValidationError::BoardLength(len))
            );
        }
    }

    #[test]
    fn unknown_enum_values_are_rejected() {
        let mut value = stored_value(&GameState::default());
        value["mode"] = json!("trivia");
        assert_eq!(
            validate(&value),
            Err(ValidationError::UnknownMode("trivia".into()))
        );

        let mut value = stored_value(&GameState::default());
        value["gameState"] = json!("paused");
        assert_eq!(
            validate(&value),
            Err(ValidationError::UnknownPhase("paused".into()))
        );
    }

    #[test]
    fn malformed_squares_and_items_are_rejected() {
        let mut value = stored_value(&playing_state());
        value["board"][3]["isMarked"] = json!("yes");
        assert_eq!(validate(&value), Err(ValidationError::Square(3)));

        let mut value = stored_value(&playing_state());
        value["huntItems"][0] = json!({"id": 0, "text": "x"});
        assert_eq!(validate(&value), Err(ValidationError::HuntItem(0)));
    }

    #[test]
    fn winning_line_must_be_null_or_well_formed() {
        let mut value = stored_value(&GameState::default());
        value["winningLine"] = json!({"type": "spiral", "index": 0, "squares": [0, 1, 2, 3, 4]});
        assert_eq!(
            validate(&value),
            Err(ValidationError::UnknownLineKind("spiral".into()))
        );

        let mut value = stored_value(&GameState::default());
        value["winningLine"] = json!({"type": "row", "index": 0});
        assert_eq!(validate(&value), Err(ValidationError::WinningLine));

        if let Value::Object(obj) = &mut value {
            obj.remove("winningLine");
        }
        assert_eq!(validate(&value), Err(ValidationError::Field("winningLine")));
    }

    #[test]
    fn invalid_records_are_deleted_on_load() {
        let store = MemoryStore::default();
        let persister = StatePersister::new(store.clone());

        let mut value = stored_value(&playing_state());
        value["version"] = json!(1);
        store.set(STORAGE_KEY, &value.to_string()).unwrap();

        assert_eq!(persister.load(), None);
        assert_eq!(store.get(STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn garbage_records_are_deleted_on_load() {
        let store = MemoryStore::default();
        let persister = StatePersister::new(store.clone());
        store.set(STORAGE_KEY, "not json at all {").unwrap();

        assert_eq!(persister.load(), None);
        assert_eq!(store.get(STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn saves_are_whole_record_replaces() {
        let store = MemoryStore::default();
        let persister = StatePersister::new(store.clone());
        persister.save(&playing_state());
        persister.save(&GameState::default());

        let raw = store.get(STORAGE_KEY).unwrap().unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], json!(SCHEMA_VERSION));
        assert_eq!(value["gameState"], json!("start"));
        assert_eq!(value["board"], json!([]));
    }
}
