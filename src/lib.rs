//! Brewhop - simulation core for a tile-based side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tile geometry, actors, collisions, state)
//! - `run`: Frame driver, input tracking, level sequencing
//! - `tuning`: Data-driven physics and scoring constants
//! - `levels`: Built-in level plans

pub mod error;
pub mod levels;
pub mod run;
pub mod sim;
pub mod tuning;

pub use error::{LevelError, TuningError};
pub use tuning::Tuning;

/// Per-variant constants that are part of the level format rather than tuning
pub mod consts {
    use glam::Vec2;

    /// Actor bounding boxes, in tiles
    pub const PLAYER_SIZE: Vec2 = Vec2::new(0.8, 1.5);
    pub const HAZARD_SIZE: Vec2 = Vec2::new(1.0, 1.0);
    pub const COIN_SIZE: Vec2 = Vec2::new(0.8, 0.9);
    pub const ITEM_SIZE: Vec2 = Vec2::new(1.0, 1.0);
    pub const POWER_UP_SIZE: Vec2 = Vec2::new(0.8, 0.9);
    pub const PATROLLER_SIZE: Vec2 = Vec2::new(0.8, 0.99);
    pub const GRINDER_SIZE: Vec2 = Vec2::new(0.8, 1.5);
    pub const CONVEYOR_SIZE: Vec2 = Vec2::new(1.0, 0.5);

    /// Height of the shortest actor that falls under gravity (patroller)
    pub const MIN_FALLING_HEIGHT: f32 = 0.99;

    /// Tall actors spawn half a tile up so their feet rest on the cell floor
    pub const TALL_SPAWN_OFFSET: Vec2 = Vec2::new(0.0, -0.5);
    /// Pickups sit slightly inside their cell
    pub const PICKUP_OFFSET: Vec2 = Vec2::new(0.2, 0.1);

    /// Point values
    pub const COIN_POINTS: u64 = 10;
    pub const ITEM_POINTS: u64 = 1500;
    pub const POWER_UP_POINTS: u64 = 1000;
    pub const PATROLLER_POINTS: u64 = 300;
    pub const GRINDER_POINTS: u64 = 500;

    /// Initial patrol speed of walking enemies (tiles/s)
    pub const PATROL_SPEED: f32 = 2.0;
}

