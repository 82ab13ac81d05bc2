//! Frame driver
//!
//! Owns the session, latches host input between frames, and writes the high
//! score to its store whenever the running score passes it. Hosts call
//! [`Game::frame`] once per display frame with a timestamp and then draw from
//! [`Game::snapshot`].

use crate::highscores::HighScore;
use crate::persistence::{HighScoreStore, MemoryStore};
use crate::sim::{GameEvent, GameState, LevelDef, Snapshot, TickInput, tick};
use crate::tuning::Tuning;

pub struct Game<S: HighScoreStore = MemoryStore> {
    state: GameState,
    store: S,
    input: TickInput,
    /// Timestamp of the previous frame (seconds)
    last_time: Option<f64>,
    /// Record as last written to the store
    saved: HighScore,
    /// Highest score a save was tried for (failed saves are not retried
    /// until the score grows again)
    attempted: u64,
}

impl<S: HighScoreStore> Game<S> {
    /// New session; an unreadable store starts from a zero high score
    pub fn new(tuning: Tuning, levels: Vec<LevelDef>, seed: u64, store: S) -> Self {
        let saved = store.load().unwrap_or_else(|e| {
            log::warn!("Could not load high score: {e}");
            HighScore::default()
        });
        let state = GameState::with_levels(tuning, levels, seed, saved.score);
        log::info!("Game initialized with seed: {seed}");
        Self {
            attempted: saved.score,
            state,
            store,
            input: TickInput::default(),
            last_time: None,
            saved,
        }
    }

    /// Input for the next tick; one-shot triggers are cleared after it runs
    pub fn input_mut(&mut self) -> &mut TickInput {
        &mut self.input
    }

    /// Advance by the wall time since the previous frame
    pub fn frame(&mut self, now_secs: f64) -> Vec<GameEvent> {
        let dt = match self.last_time {
            Some(last) => (now_secs - last) as f32,
            None => 0.0,
        };
        self.last_time = Some(now_secs);
        self.step(dt)
    }

    /// Advance by `dt` seconds and return the events raised
    pub fn step(&mut self, dt: f32) -> Vec<GameEvent> {
        let input = self.input.clone();
        tick(&mut self.state, &input, dt);

        // Clear one-shot inputs after processing
        self.input.start = false;
        self.input.pause = false;
        self.input.restart = false;
        self.input.quit = false;

        // Write as soon as the running score passes the stored record
        if self.state.high_score > self.attempted {
            self.attempted = self.state.high_score;
            self.save_record(self.state.level);
        }

        self.state.drain_events()
    }

    /// Write the session high score if it beats the stored one, retrying
    /// a save that failed earlier
    pub fn flush(&mut self) {
        self.attempted = self.attempted.max(self.state.high_score);
        self.save_record(self.state.level);
    }

    fn save_record(&mut self, level: usize) {
        let mut record = self.saved;
        if !record.submit(self.state.high_score, level) {
            return;
        }
        match self.store.save(&record) {
            Ok(()) => self.saved = record,
            Err(e) => log::warn!("Could not save high score: {e}"),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record as last persisted
    pub fn saved_high_score(&self) -> HighScore {
        self.saved
    }
}
