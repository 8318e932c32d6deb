//! Capability interfaces between the engine and the outside world.
//!
//! The engine and the game loop only see these traits, so everything above
//! the terminal can run headless in tests.

use std::io;

use crate::entities::{GameEvent, GameState};
use crate::rules::Ruleset;

/// Input sampled once per tick.
///
/// Directions are "held" flags; the rest are one-shot presses seen since the
/// previous poll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub start: bool,
    pub pause: bool,
    pub restart: bool,
    pub quit: bool,
    pub select: Option<Ruleset>,
}

impl FrameInput {
    /// Horizontal direction: -1, 0 or 1.  Opposite keys cancel out.
    pub fn dx(&self) -> i32 {
        self.right as i32 - self.left as i32
    }

    /// Vertical direction: -1 (up), 0 or 1 (down).
    pub fn dy(&self) -> i32 {
        self.down as i32 - self.up as i32
    }
}

pub trait InputSource {
    fn poll(&mut self) -> FrameInput;
}

pub trait Renderer {
    fn render(&mut self, state: &GameState) -> io::Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Point,
    Crash,
    Shield,
}

impl Cue {
    pub fn for_event(event: &GameEvent) -> Option<Cue> {
        match event {
            GameEvent::ObstaclePassed { .. } => Some(Cue::Point),
            GameEvent::Crashed => Some(Cue::Crash),
            GameEvent::ShieldUp { .. } | GameEvent::ShieldBlocked => Some(Cue::Shield),
            GameEvent::LevelUp { .. }
            | GameEvent::ShieldExpired
            | GameEvent::NewHighScore { .. } => None,
        }
    }
}

pub trait AudioPlayer {
    fn play(&mut self, cue: Cue);
}

/// Audio player that plays nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl AudioPlayer for Silent {
    fn play(&mut self, _cue: Cue) {}
}
