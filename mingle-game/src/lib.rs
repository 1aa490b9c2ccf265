//! Mingle Game Engine
//!
//! Platform-agnostic core logic for the Mingle party icebreaker game: the
//! 5x5 bingo board, the scavenger-hunt checklist, the shuffled card deck,
//! and the versioned persistence layer that lets a game survive reloads.
//! Rendering, dialogs, and input wiring live in the platform shells, which
//! feed user intents into [`GameSession`] and read its snapshots back.

pub mod board;
pub mod deck;
pub mod hunt;
pub mod persist;
pub mod pool;
pub mod session;
pub mod shuffle;
pub mod state;

// Re-export commonly used types
pub use board::{
    CELLS, FREE_INDEX, GRID, LINE_COUNT, Line, LineKind, Square, all_lines, check_bingo,
    generate_board, toggle_square, winning_square_ids,
};
pub use deck::Deck;
pub use hunt::{
    HuntItem, HuntProgress, generate_hunt_list, hunt_progress, is_hunt_complete, toggle_hunt_item,
};
pub use persist::{
    KeyValueStore, MemoryStore, SCHEMA_VERSION, STORAGE_KEY, StatePersister, StoreError,
    StoredGame, ValidationError, validate,
};
pub use pool::{BOARD_PROMPTS, FREE_SPACE_TEXT, PoolError, QuestionPool};
pub use session::GameSession;
pub use shuffle::shuffled;
pub use state::{GameMode, GamePhase, GameState};
