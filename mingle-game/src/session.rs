//! Game orchestrator: a small state machine binding the board, hunt, and
//! deck engines to the persistence codec behind one action surface.
//!
//! Actions run in two phases. The pure transition happens synchronously;
//! any derived follow-up (win latched, hunt completed) is queued and applied
//! by [`GameSession::settle`], the explicit stand-in for the scheduling tick
//! the original presentation layer used. Every action settles first, so a
//! queued transition always lands before the next user action is processed.

use std::collections::{HashSet, VecDeque};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::board::{Line, Square, check_bingo, generate_board, toggle_square, winning_square_ids};
use crate::deck::Deck;
use crate::hunt::{
    HuntItem, HuntProgress, generate_hunt_list, hunt_progress, is_hunt_complete, toggle_hunt_item,
};
use crate::persist::{KeyValueStore, StatePersister};
use crate::pool::{PoolError, QuestionPool};
use crate::state::{GameMode, GamePhase, GameState};

/// Follow-up transition queued by an action, applied on the next settle.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DerivedEvent {
    BingoAchieved(Line),
    HuntCompleted,
}

/// Owns the live [`GameState`], the derived modal flags, and the persister.
/// Every mutating action ends with a whole-record save.
pub struct GameSession<S: KeyValueStore> {
    state: GameState,
    pool: QuestionPool,
    rng: ChaCha20Rng,
    persister: StatePersister<S>,
    deck: Option<Deck>,
    show_bingo_modal: bool,
    show_hunt_modal: bool,
    pending: VecDeque<DerivedEvent>,
}

impl<S: KeyValueStore> GameSession<S> {
    /// Fresh session seeded from OS entropy.
    pub fn new(pool: QuestionPool, store: S) -> Self {
        Self::with_seed(pool, store, rand::thread_rng().r#gen())
    }

    /// Fresh session with a deterministic shuffle seed.
    pub fn with_seed(pool: QuestionPool, store: S, seed: u64) -> Self {
        Self {
            state: GameState::default(),
            pool,
            rng: ChaCha20Rng::seed_from_u64(seed),
            persister: StatePersister::new(store),
            deck: None,
            show_bingo_modal: false,
            show_hunt_modal: false,
            pending: VecDeque::new(),
        }
    }

    /// Rehydrate from the persisted record, falling back to a fresh start
    /// screen when nothing trustworthy is stored. Reads storage exactly once.
    pub fn restore_or_new(pool: QuestionPool, store: S) -> Self {
        let mut session = Self::new(pool, store);
        if let Some(state) = session.persister.load() {
            session.state = state;
        }
        session
    }

    /// Apply queued derived transitions. Platform shells call this once per
    /// scheduling tick after an action; every action also settles on entry,
    /// so a queued transition can never straddle two user actions.
    pub fn settle(&mut self) {
        let mut dirty = false;
        while let Some(event) = self.pending.pop_front() {
            match event {
                DerivedEvent::BingoAchieved(line) => {
                    // first win is latched; later lines never overwrite it
                    if self.state.winning_line.is_none() {
                        self.state.winning_line = Some(line);
                        self.state.phase = GamePhase::Bingo;
                        self.show_bingo_modal = true;
                        dirty = true;
                    }
                }
                DerivedEvent::HuntCompleted => {
                    if is_hunt_complete(&self.state.hunt_items) {
                        self.show_hunt_modal = true;
                    }
                }
            }
        }
        if dirty {
            self.persist();
        }
    }

    /// Start (or restart) bingo mode with a freshly generated board.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Insufficient`] when the pool cannot fill a board.
    pub fn start_bingo(&mut self) -> Result<(), PoolError> {
        self.settle();
        let board = generate_board(&self.pool, &mut self.rng)?;
        self.state.mode = GameMode::Bingo;
        self.state.board = board;
        self.state.winning_line = None;
        self.state.phase = GamePhase::Playing;
        self.show_bingo_modal = false;
        self.show_hunt_modal = false;
        self.persist();
        Ok(())
    }

    /// Toggle a square. When the new board first completes a line, the win
    /// transition is queued rather than applied inline.
    pub fn click_square(&mut self, id: usize) {
        self.settle();
        let next = toggle_square(&self.state.board, id);
        if self.state.winning_line.is_none()
            && let Some(line) = check_bingo(&next)
        {
            self.pending.push_back(DerivedEvent::BingoAchieved(line));
        }
        self.state.board = next;
        self.persist();
    }

    /// Start (or restart) the scavenger hunt with a freshly shuffled list.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Insufficient`] when the pool has no prompts.
    pub fn start_hunt(&mut self) -> Result<(), PoolError> {
        self.settle();
        let items = generate_hunt_list(&self.pool, &mut self.rng)?;
        self.state.mode = GameMode::Hunt;
        self.state.hunt_items = items;
        self.state.winning_line = None;
        self.state.board.clear();
        self.state.phase = GamePhase::Playing;
        self.show_bingo_modal = false;
        self.show_hunt_modal = false;
        if is_hunt_complete(&self.state.hunt_items) {
            self.pending.push_back(DerivedEvent::HuntCompleted);
        }
        self.persist();
        Ok(())
    }

    /// Toggle a hunt item; completion queues the modal transition.
    pub fn toggle_hunt(&mut self, id: usize) {
        self.settle();
        let next = toggle_hunt_item(&self.state.hunt_items, id);
        if is_hunt_complete(&next) {
            self.pending.push_back(DerivedEvent::HuntCompleted);
        }
        self.state.hunt_items = next;
        self.persist();
    }

    /// Switch to deck mode and deal a fresh deck. Deck contents stay in the
    /// session only; reloads always re-deal.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Insufficient`] when the pool has no prompts.
    pub fn start_deck(&mut self) -> Result<(), PoolError> {
        self.settle();
        self.deck = Some(Deck::deal(&self.pool, &mut self.rng)?);
        self.state.mode = GameMode::Deck;
        self.state.board.clear();
        self.state.winning_line = None;
        self.state.hunt_items.clear();
        self.state.phase = GamePhase::Playing;
        self.show_bingo_modal = false;
        self.show_hunt_modal = false;
        self.persist();
        Ok(())
    }

    /// Turn over the next deck card.
    pub fn draw_card(&mut self) -> Option<&str> {
        self.settle();
        self.deck.as_mut().and_then(Deck::draw)
    }

    /// Put the deck back face-down.
    pub fn clear_card(&mut self) {
        self.settle();
        if let Some(deck) = self.deck.as_mut() {
            deck.clear();
        }
    }

    /// Back to the start screen: everything cleared, queued events dropped.
    pub fn reset_to_start(&mut self) {
        self.pending.clear();
        self.state = GameState::default();
        self.deck = None;
        self.show_bingo_modal = false;
        self.show_hunt_modal = false;
        self.persist();
    }

    fn persist(&self) {
        self.persister.save(&self.state);
    }

    pub fn dismiss_win_modal(&mut self) {
        self.settle();
        self.show_bingo_modal = false;
    }

    pub fn dismiss_hunt_modal(&mut self) {
        self.settle();
        self.show_hunt_modal = false;
    }

    // Read-only snapshots for the presentation layer.

    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        self.state.phase
    }

    #[must_use]
    pub const fn mode(&self) -> GameMode {
        self.state.mode
    }

    #[must_use]
    pub fn board(&self) -> &[Square] {
        &self.state.board
    }

    #[must_use]
    pub fn hunt_items(&self) -> &[HuntItem] {
        &self.state.hunt_items
    }

    #[must_use]
    pub fn winning_line(&self) -> Option<&Line> {
        self.state.winning_line.as_ref()
    }

    #[must_use]
    pub fn winning_square_ids(&self) -> HashSet<usize> {
        winning_square_ids(self.state.winning_line.as_ref())
    }

    #[must_use]
    pub const fn show_bingo_modal(&self) -> bool {
        self.show_bingo_modal
    }

    #[must_use]
    pub const fn show_hunt_modal(&self) -> bool {
        self.show_hunt_modal
    }

    #[must_use]
    pub fn hunt_progress(&self) -> HuntProgress {
        hunt_progress(&self.state.hunt_items)
    }

    #[must_use]
    pub fn current_card(&self) -> Option<&str> {
        self.deck.as_ref().and_then(Deck::current)
    }

    /// Borrow the underlying game state.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Consume the session, returning the underlying game state.
    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }
}
