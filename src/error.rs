//! Construction-time errors
//!
//! The per-tick simulation is total and never fails; the only failures are
//! a malformed level plan or an unreadable tuning file, both rejected before
//! any simulation runs

/// Errors raised while parsing a level plan
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LevelError {
    /// The plan has no rows after trimming
    #[error("level plan is empty")]
    Empty,

    /// A row's length differs from the first row
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A character with no tile or actor mapping
    #[error("unknown plan character {ch:?} at column {x}, row {y}")]
    UnknownChar { ch: char, x: usize, y: usize },

    /// No `@` in the plan
    #[error("level plan has no player spawn")]
    MissingPlayer,

    /// More than one `@` in the plan
    #[error("level plan has {count} player spawns, expected exactly one")]
    MultiplePlayers { count: usize },

    /// A tall actor seeded on the top row would poke out of the grid
    #[error("{name} at column {x} is seeded on the top row and would stick out of the level")]
    TallSpawnOnTopRow { name: &'static str, x: usize },
}

/// Errors raised while loading tuning data
#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A value that would break the simulation's stepping guarantees
    #[error("tuning field `{field}` must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    /// The longest fall in one step could skip over a one-tile floor
    #[error("fall step {step} (max_fall_speed * max_step) must stay below {limit}")]
    FallStepTooLong { step: f32, limit: f32 },
}
