//! Simulation state and the session counters that outlive a single level

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::level::Level;
use crate::tuning::Tuning;

/// Outcome of the current level attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Playing,
    Won,
    Lost,
}

impl Status {
    /// Won or Lost; a level never returns to Playing once decided
    pub fn is_terminal(self) -> bool {
        self != Status::Playing
    }
}

/// Counters owned by the run loop and threaded through every update
///
/// These persist across levels and retries: lives, the death and coin tallies,
/// and the running score carried into each new level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub lives: i32,
    pub deaths: u32,
    pub coins: u32,
    pub score: u64,
    /// Debug override applied at the start of the next update, then cleared
    #[serde(skip)]
    pending_override: Option<Status>,
}

impl Session {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            lives: tuning.starting_lives,
            deaths: 0,
            coins: 0,
            score: 0,
            pending_override: None,
        }
    }

    /// Force the current level to end with `status` on the next update
    pub fn force_status(&mut self, status: Status) {
        self.pending_override = Some(status);
    }

    pub fn pending_override(&self) -> Option<Status> {
        self.pending_override
    }

    pub(crate) fn take_override(&mut self) -> Option<Status> {
        self.pending_override.take()
    }

    /// One player death: a life lost and the death tally bumped
    pub fn record_death(&mut self) {
        self.lives -= 1;
        self.deaths += 1;
        log::info!("Player died, {} lives left", self.lives);
    }

    /// Count a coin; returns true when it earned an extra life
    pub fn record_coin(&mut self, coins_per_life: u32) -> bool {
        self.coins += 1;
        if coins_per_life > 0 && self.coins.is_multiple_of(coins_per_life) {
            self.lives += 1;
            log::info!("Extra life at {} coins, {} lives", self.coins, self.lives);
            return true;
        }
        false
    }

    pub fn is_game_over(&self) -> bool {
        self.lives <= 0
    }
}

/// Authoritative snapshot of one level attempt
///
/// `State::update` (see `tick.rs`) never mutates `self`; it returns the next
/// snapshot. The level and tuning are shared read-only between snapshots.
#[derive(Debug, Clone, Serialize)]
pub struct State {
    #[serde(skip)]
    pub level: Arc<Level>,
    #[serde(skip)]
    pub tuning: Arc<Tuning>,
    /// Live actors in spawn order; exactly one is the player
    pub actors: Vec<Actor>,
    pub status: Status,
    pub score: u64,
    pub exit_reached: bool,
}

impl State {
    /// Fresh attempt at a level with its seeded actors
    pub fn start(level: Arc<Level>, tuning: Arc<Tuning>) -> Self {
        let actors = level.start_actors().to_vec();
        Self {
            level,
            tuning,
            actors,
            status: Status::Playing,
            score: 0,
            exit_reached: false,
        }
    }

    /// Carry a score over from earlier levels
    pub fn with_score(mut self, score: u64) -> Self {
        self.score = score;
        self
    }

    pub fn player_index(&self) -> Option<usize> {
        self.actors.iter().position(Actor::is_player)
    }

    pub fn player(&self) -> Option<&Actor> {
        self.actors.iter().find(|a| a.is_player())
    }

    pub fn player_count(&self) -> usize {
        self.actors.iter().filter(|a| a.is_player()).count()
    }
}
