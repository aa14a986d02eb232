//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in as an explicit `now` (ms), never read from a clock
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod obstacles;
pub mod placement;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use obstacles::{apply_obstacle_policy, generate_obstacles};
pub use placement::{place_food, spawn_ruby};
pub use session::{ScoreStore, Session};
pub use snapshot::{RubyView, Snapshot};
pub use state::{
    DeathCause, Direction, GameEvent, GamePhase, GameState, Position, Ruby, Snake,
};
pub use tick::tick;
