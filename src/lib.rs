//! Car Dodge — steer through falling traffic in the terminal.
//!
//! - `entities`: pure data (rectangles, cars, pickups, the game state)
//! - `rules`: per-ruleset constants
//! - `compute`: pure per-frame update functions
//! - `controller`: screen state machine and play session
//! - `persistence`: high-score record
//! - `platform`: input / render / audio interfaces
//! - `app`: fixed-rate loop tying it together
//! - `settings`, `logging`: configuration file and log output

pub mod app;
pub mod compute;
pub mod controller;
pub mod entities;
pub mod logging;
pub mod persistence;
pub mod platform;
pub mod rules;
pub mod settings;
