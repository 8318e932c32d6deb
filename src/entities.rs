//! All game entity types — pure data, no update logic.

use std::time::Duration;

use crate::rules::{Ruleset, Rules};

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in world units.  `y` grows downward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Non-strict overlap test: rectangles that only share an edge collide.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() <= other.right()
            && other.left() <= self.right()
            && self.top() <= other.bottom()
            && other.top() <= self.bottom()
    }

    pub fn moved_down(&self, dy: i32) -> Rect {
        Rect { y: self.y + dy, ..*self }
    }
}

// ── Entities ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub rect: Rect,
}

/// An enemy car falling down its lane.
#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub rect: Rect,
}

/// A falling shield pickup.
#[derive(Clone, Debug, PartialEq)]
pub struct PowerUp {
    pub rect: Rect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Start,
    Playing,
    Paused,
    GameOver,
}

/// Something noteworthy that happened during a step.  Drives sound cues and
/// logging; the state itself already reflects it.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    ObstaclePassed { score: u32 },
    LevelUp { level: u32 },
    ShieldUp { expires_at: Duration },
    /// An obstacle hit the player while the shield was up and was destroyed.
    ShieldBlocked,
    ShieldExpired,
    Crashed,
    NewHighScore { score: u32 },
}

// ── Master game state ────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so pure update functions can return a
/// new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub rules: Rules,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub power_ups: Vec<PowerUp>,
    pub score: u32,
    /// Starts at 1, one more every ten points.
    pub level: u32,
    /// Game-clock time at which the shield drops.  `Some` while it is up.
    pub shield_expiry: Option<Duration>,
    pub screen: Screen,
    pub high_score: u32,
    /// Set when this run's score beat the best it started against.
    pub new_best: bool,
    /// Sum of every `dt` fed to the engine while playing.
    pub clock: Duration,
    pub frame: u64,
}

impl GameState {
    pub fn ruleset(&self) -> Ruleset {
        self.rules.ruleset
    }

    pub fn shield_active(&self) -> bool {
        self.shield_expiry.is_some()
    }

    /// Time left on the shield, zero when it is down.
    pub fn shield_remaining(&self) -> Duration {
        self.shield_expiry
            .map(|expiry| expiry.saturating_sub(self.clock))
            .unwrap_or(Duration::ZERO)
    }
}
