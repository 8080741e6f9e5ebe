//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep, clamped to `Tuning::max_step`
//! - Seeded RNG only (pickup wobble phases, drawn at parse time)
//! - Stable iteration order (actor-list order)
//! - No rendering or platform dependencies

pub mod actor;
pub mod collision;
pub mod level;
pub mod state;
pub mod tick;

pub use actor::{Actor, ActorKind, DeathPhase, HazardMotion, Item};
pub use collision::{boxes_overlap, overlap};
pub use level::{DecalKind, Level, PipePiece, Tile};
pub use state::{Session, State, Status};
pub use tick::TickInput;
