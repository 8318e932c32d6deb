//! Ruleset tables.
//!
//! The game ships three rulesets that share one engine.  Everything that
//! differs between them (field size, sprite sizes, lanes, spawn odds, speed,
//! power-ups) lives in a `Rules` value copied into the game state, so the
//! update functions never branch on the ruleset itself.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Points needed for each level-up.
pub const POINTS_PER_LEVEL: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Ruleset {
    /// Small square field, narrow cars, horizontal steering only.
    Classic,
    /// Tall four-lane road with free movement.
    Lanes,
    /// `Lanes` plus falling shield pickups.
    #[default]
    Shield,
}

impl Ruleset {
    pub const ALL: [Ruleset; 3] = [Ruleset::Classic, Ruleset::Lanes, Ruleset::Shield];

    pub fn as_str(&self) -> &'static str {
        match self {
            Ruleset::Classic => "classic",
            Ruleset::Lanes => "lanes",
            Ruleset::Shield => "shield",
        }
    }

    /// One-line description for the start screen menu.
    pub fn blurb(&self) -> &'static str {
        match self {
            Ruleset::Classic => "Left and right only, traffic ramps up fast",
            Ruleset::Lanes => "Four lanes, steer in every direction",
            Ruleset::Shield => "Four lanes plus shield pickups",
        }
    }

    pub fn rules(&self) -> Rules {
        match self {
            Ruleset::Classic => CLASSIC,
            Ruleset::Lanes => LANES,
            Ruleset::Shield => SHIELD,
        }
    }
}

impl fmt::Display for Ruleset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ruleset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "classic" | "1" => Ok(Ruleset::Classic),
            "lanes" | "2" => Ok(Ruleset::Lanes),
            "shield" | "shields" | "3" => Ok(Ruleset::Shield),
            other => Err(format!(
                "unknown ruleset '{other}' (expected classic, lanes or shield)"
            )),
        }
    }
}

/// Shield pickup parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerUpRules {
    pub width: i32,
    pub height: i32,
    /// Chance per tick that a pickup spawns.
    pub spawn_chance: f64,
    pub shield_duration: Duration,
}

/// Constants for one ruleset, in world units (y grows downward).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rules {
    pub ruleset: Ruleset,
    pub field_width: i32,
    pub field_height: i32,

    pub player_width: i32,
    pub player_height: i32,
    pub player_start: (i32, i32),
    /// Distance moved per tick per held direction.
    pub player_step: i32,
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: i32,
    pub y_max: i32,

    pub obstacle_width: i32,
    pub obstacle_height: i32,
    /// Left edges where obstacles and pickups spawn.
    pub lanes: &'static [i32],
    pub spawn_base: f64,
    pub spawn_per_point: f64,
    /// Fall speed at level 1; each level adds one.
    pub base_speed: i32,

    pub power_up: Option<PowerUpRules>,
}

impl Rules {
    pub fn allows_vertical(&self) -> bool {
        self.y_min < self.y_max
    }

    /// Obstacle spawn chance for the given score, clamped to a probability.
    pub fn obstacle_spawn_chance(&self, score: u32) -> f64 {
        (self.spawn_base + score as f64 * self.spawn_per_point).clamp(0.0, 1.0)
    }

    /// Fall speed for the given level.
    pub fn speed_for(&self, level: u32) -> i32 {
        self.base_speed + level.saturating_sub(1) as i32
    }
}

// ── Tables ───────────────────────────────────────────────────────────────────

const CLASSIC_LANES: [i32; 19] = [
    0, 20, 40, 60, 80, 100, 120, 140, 160, 180, 200, 220, 240, 260, 280, 300, 320, 340, 360,
];

const ROAD_LANES: [i32; 4] = [60, 140, 220, 300];

const CLASSIC: Rules = Rules {
    ruleset: Ruleset::Classic,
    field_width: 400,
    field_height: 400,
    player_width: 20,
    player_height: 40,
    player_start: (190, 360),
    player_step: 5,
    x_min: 0,
    x_max: 380,
    y_min: 360,
    y_max: 360,
    obstacle_width: 20,
    obstacle_height: 40,
    lanes: &CLASSIC_LANES,
    spawn_base: 0.008,
    spawn_per_point: 0.2,
    base_speed: 4,
    power_up: None,
};

const LANES: Rules = Rules {
    ruleset: Ruleset::Lanes,
    field_width: 400,
    field_height: 600,
    player_width: 40,
    player_height: 80,
    player_start: (180, 500),
    player_step: 5,
    // Road edges: 60 from each side of the field.
    x_min: 60,
    x_max: 300,
    y_min: 0,
    y_max: 520,
    obstacle_width: 40,
    obstacle_height: 80,
    lanes: &ROAD_LANES,
    spawn_base: 0.02,
    spawn_per_point: 0.002,
    base_speed: 5,
    power_up: None,
};

const SHIELD: Rules = Rules {
    ruleset: Ruleset::Shield,
    power_up: Some(PowerUpRules {
        width: 30,
        height: 30,
        spawn_chance: 0.005,
        shield_duration: Duration::from_secs(5),
    }),
    ..LANES
};
