//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` (and, where needed, an RNG handle) and returns a brand-new
//! `GameState`.  Side effects are limited to the injected RNG.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::entities::{GameEvent, GameState, Obstacle, Player, PowerUp, Rect, Screen};
use crate::platform::FrameInput;
use crate::rules::{Ruleset, Rules, POINTS_PER_LEVEL};

// ── Constructors ─────────────────────────────────────────────────────────────

fn start_player(rules: &Rules) -> Player {
    let (x, y) = rules.player_start;
    Player {
        rect: Rect::new(x, y, rules.player_width, rules.player_height),
    }
}

/// Build a fresh state sitting on the start screen.
pub fn init_state(ruleset: Ruleset, high_score: u32) -> GameState {
    let rules = ruleset.rules();
    GameState {
        player: start_player(&rules),
        rules,
        obstacles: Vec::new(),
        power_ups: Vec::new(),
        score: 0,
        level: 1,
        shield_expiry: None,
        screen: Screen::Start,
        high_score,
        new_best: false,
        clock: Duration::ZERO,
        frame: 0,
    }
}

/// Start a new run: everything per-run goes back to its initial value, the
/// ruleset and high score carry over.
pub fn reset(state: &GameState) -> GameState {
    GameState {
        screen: Screen::Playing,
        ..init_state(state.ruleset(), state.high_score)
    }
}

// ── Input-driven movement ────────────────────────────────────────────────────

/// Advance the game clock by `dt` and move the player by one step per held
/// direction, clamped to the ruleset's box.
pub fn advance_frame(state: &GameState, input: &FrameInput, dt: Duration) -> GameState {
    let rules = &state.rules;
    let step = rules.player_step;
    let rect = state.player.rect;

    let x = (rect.x + input.dx() * step).clamp(rules.x_min, rules.x_max);
    let y = if rules.allows_vertical() {
        (rect.y + input.dy() * step).clamp(rules.y_min, rules.y_max)
    } else {
        rect.y.clamp(rules.y_min, rules.y_max)
    };

    GameState {
        player: Player {
            rect: Rect { x, y, ..rect },
        },
        clock: state.clock + dt,
        frame: state.frame + 1,
        ..state.clone()
    }
}

// ── Spawning (RNG is injected) ───────────────────────────────────────────────

/// Maybe drop a new obstacle just above the field in a random lane.  The
/// chance grows with the score.
pub fn spawn_obstacle(state: &GameState, rng: &mut impl Rng) -> GameState {
    let rules = &state.rules;
    if !rng.gen_bool(rules.obstacle_spawn_chance(state.score)) {
        return state.clone();
    }
    let Some(&lane) = rules.lanes.choose(rng) else {
        return state.clone();
    };

    let mut obstacles = state.obstacles.clone();
    obstacles.push(Obstacle {
        rect: Rect::new(
            lane,
            -rules.obstacle_height,
            rules.obstacle_width,
            rules.obstacle_height,
        ),
    });
    GameState {
        obstacles,
        ..state.clone()
    }
}

/// Maybe drop a shield pickup, centred in a random lane.  Fixed chance per
/// tick; rulesets without power-ups never spawn one.
pub fn spawn_power_up(state: &GameState, rng: &mut impl Rng) -> GameState {
    let rules = &state.rules;
    let Some(power_up) = rules.power_up else {
        return state.clone();
    };
    if !rng.gen_bool(power_up.spawn_chance.clamp(0.0, 1.0)) {
        return state.clone();
    }
    let Some(&lane) = rules.lanes.choose(rng) else {
        return state.clone();
    };

    let x = lane + (rules.obstacle_width - power_up.width) / 2;
    let mut power_ups = state.power_ups.clone();
    power_ups.push(PowerUp {
        rect: Rect::new(x, -power_up.height, power_up.width, power_up.height),
    });
    GameState {
        power_ups,
        ..state.clone()
    }
}

// ── Per-frame entity update ──────────────────────────────────────────────────

/// Move every obstacle and pickup, score the ones that leave the field,
/// resolve collisions with the player and run the shield timer.
pub fn update_entities(state: &GameState) -> (GameState, Vec<GameEvent>) {
    let rules = &state.rules;
    let player = state.player.rect;
    let bottom = rules.field_height;
    let mut events = Vec::new();

    // ── 1. Shield timeout ────────────────────────────────────────────────────
    let mut shield_expiry = state.shield_expiry;
    if matches!(shield_expiry, Some(expiry) if state.clock > expiry) {
        shield_expiry = None;
        events.push(GameEvent::ShieldExpired);
    }

    // ── 2. Obstacles: move, pass, collide ────────────────────────────────────
    let speed = rules.speed_for(state.level);
    let mut score = state.score;
    let mut level = state.level;
    let mut screen = state.screen;

    let obstacles: Vec<Obstacle> = state
        .obstacles
        .iter()
        .map(|o| Obstacle {
            rect: o.rect.moved_down(speed),
        })
        .filter(|o| {
            if o.rect.top() > bottom {
                score += 1;
                events.push(GameEvent::ObstaclePassed { score });
                if score % POINTS_PER_LEVEL == 0 {
                    level += 1;
                    events.push(GameEvent::LevelUp { level });
                }
                return false;
            }
            if !o.rect.intersects(&player) {
                return true;
            }
            if shield_expiry.is_some() {
                events.push(GameEvent::ShieldBlocked);
            } else if screen != Screen::GameOver {
                screen = Screen::GameOver;
                events.push(GameEvent::Crashed);
            }
            false
        })
        .collect();

    // ── 3. Pickups: move, drop off, collect ──────────────────────────────────
    let duration = rules.power_up.map(|p| p.shield_duration);
    let power_ups: Vec<PowerUp> = state
        .power_ups
        .iter()
        .map(|p| PowerUp {
            rect: p.rect.moved_down(speed),
        })
        .filter(|p| {
            if p.rect.top() > bottom {
                return false;
            }
            if !p.rect.intersects(&player) {
                return true;
            }
            if let Some(duration) = duration {
                let expires_at = state.clock + duration;
                shield_expiry = Some(expires_at);
                events.push(GameEvent::ShieldUp { expires_at });
            }
            false
        })
        .collect();

    let next = GameState {
        obstacles,
        power_ups,
        score,
        level,
        shield_expiry,
        screen,
        ..state.clone()
    };
    (next, events)
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame.  All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
pub fn tick(
    state: &GameState,
    input: &FrameInput,
    dt: Duration,
    rng: &mut impl Rng,
) -> (GameState, Vec<GameEvent>) {
    let state = advance_frame(state, input, dt);
    let state = spawn_obstacle(&state, rng);
    let state = spawn_power_up(&state, rng);
    update_entities(&state)
}
