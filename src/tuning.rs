//! Physics and scoring tuning
//!
//! Loaded from JSON when a file is supplied, otherwise the built-in defaults.
//! Any field missing from the JSON keeps its default value.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::MIN_FALLING_HEIGHT;
use crate::error::TuningError;

/// Simulation tunables shared by every actor in a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player movement ===
    /// Horizontal walking speed (tiles/s)
    pub player_speed: f32,
    /// Downward acceleration (tiles/s²)
    pub gravity: f32,
    /// Initial upward speed of a jump (tiles/s)
    pub jump_speed: f32,
    /// Terminal downward speed of anything under gravity (tiles/s)
    pub max_fall_speed: f32,
    /// Depth of the band below the feet that counts as standing on ground
    pub ground_probe: f32,

    // === Stepping ===
    /// Largest time delta fed into a single update (seconds)
    pub max_step: f32,
    /// Time the runner keeps ticking after a level is decided (seconds)
    pub ending_grace: f32,

    // === Enemies ===
    /// Horizontal speed multiplier applied once when a grinder starts sliding
    pub slide_boost: f32,
    /// A stomp lands when the player's feet are above enemy top + this margin
    pub stomp_margin: f32,
    /// Seconds a dead enemy lingers before it is removed
    pub dead_despawn: f32,
    /// Horizontal push imparted by conveyors (tiles/s)
    pub conveyor_speed: f32,

    // === Pickups ===
    /// Bob phase speed (radians/s)
    pub wobble_speed: f32,
    /// Bob amplitude (tiles)
    pub wobble_dist: f32,

    // === Session ===
    /// Lives at the start of a campaign
    pub starting_lives: i32,
    /// Every Nth coin grants an extra life
    pub coins_per_life: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: 7.0,
            gravity: 30.0,
            jump_speed: 16.0,
            max_fall_speed: 9.0,
            ground_probe: 0.1,

            max_step: 0.1,
            ending_grace: 1.0,

            slide_boost: 6.0,
            stomp_margin: 0.5,
            dead_despawn: 1.5,
            conveyor_speed: 5.0,

            wobble_speed: 8.0,
            wobble_dist: 0.07,

            starting_lives: 3,
            coins_per_life: 50,
        }
    }
}

impl Tuning {
    /// Parse tuning from a JSON document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Serialize to pretty JSON (handy for dumping the defaults)
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would stall or invert the stepping model
    fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("max_step", self.max_step),
            ("max_fall_speed", self.max_fall_speed),
            ("gravity", self.gravity),
            ("slide_boost", self.slide_boost),
            ("dead_despawn", self.dead_despawn),
        ];
        for (field, value) in positive {
            if value <= 0.0 || !value.is_finite() {
                return Err(TuningError::NonPositive { field, value });
            }
        }

        // Moves are only checked at their destination, so one step of falling
        // must be shorter than the shortest falling actor
        let step = self.max_fall_speed * self.max_step;
        if step >= MIN_FALLING_HEIGHT {
            return Err(TuningError::FallStepTooLong {
                step,
                limit: MIN_FALLING_HEIGHT,
            });
        }
        Ok(())
    }
}
