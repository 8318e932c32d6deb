//! Screen state machine and the play session that drives the engine.
//!
//! ```text
//!   Start ──start──▶ Playing ◀──pause──▶ Paused
//!                       │
//!                     crash
//!                       ▼
//!                   GameOver ──restart──▶ Playing
//! ```

use std::time::Duration;

use rand::Rng;

use crate::compute::{init_state, reset, tick};
use crate::entities::{GameEvent, GameState, Screen};
use crate::persistence::ScoreStore;
use crate::platform::FrameInput;
use crate::rules::Ruleset;

/// Apply the one-shot presses in `input` to the screen state.  Presses that
/// mean nothing on the current screen are ignored.
pub fn apply_input(state: &GameState, input: &FrameInput) -> GameState {
    match state.screen {
        Screen::Start => {
            let state = match input.select {
                Some(ruleset) if ruleset != state.ruleset() => {
                    init_state(ruleset, state.high_score)
                }
                _ => state.clone(),
            };
            if input.start {
                reset(&state)
            } else {
                state
            }
        }
        Screen::Playing if input.pause => GameState {
            screen: Screen::Paused,
            ..state.clone()
        },
        Screen::Paused if input.pause => GameState {
            screen: Screen::Playing,
            ..state.clone()
        },
        Screen::GameOver if input.restart => reset(state),
        _ => state.clone(),
    }
}

/// One play session: the game state plus the RNG and the score store.
pub struct Session<S, R> {
    state: GameState,
    store: S,
    rng: R,
}

impl<S: ScoreStore, R: Rng> Session<S, R> {
    /// Load the stored high score and sit on the start screen.
    pub fn new(store: S, rng: R, ruleset: Ruleset) -> Self {
        let high_score = store.load_high_score();
        log::info!("Session ready: ruleset {ruleset}, high score {high_score}");
        Self {
            state: init_state(ruleset, high_score),
            store,
            rng,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Process one tick: screen transitions first, then the engine if the
    /// game is being played.
    pub fn step(&mut self, input: &FrameInput, dt: Duration) -> Vec<GameEvent> {
        let before = self.state.screen;
        let state = apply_input(&self.state, input);
        if state.screen != before {
            log::debug!("Screen {:?} -> {:?}", before, state.screen);
        }
        if before != Screen::Playing && state.screen == Screen::Playing && state.frame == 0 {
            log::info!("New run ({})", state.ruleset());
        }

        if state.screen != Screen::Playing {
            self.state = state;
            return Vec::new();
        }

        let (state, mut events) = tick(&state, input, dt, &mut self.rng);
        self.state = state;

        if self.state.screen == Screen::GameOver {
            log::info!(
                "Game over: score {}, level {}",
                self.state.score,
                self.state.level
            );
            if let Some(event) = self.record_high_score() {
                events.push(event);
            }
        }
        events
    }

    /// Called once on entering GameOver.  Saves only a beaten high score.
    fn record_high_score(&mut self) -> Option<GameEvent> {
        let score = self.state.score;
        if score <= self.state.high_score {
            return None;
        }
        if let Err(e) = self.store.save_high_score(score) {
            log::warn!("Could not save high score: {e}");
        }
        self.state.high_score = score;
        self.state.new_best = true;
        Some(GameEvent::NewHighScore { score })
    }
}
