//! Ruby Snake - A toroidal-grid snake arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, items, session lifecycle)
//! - `renderer`: WebGPU rendering of simulation snapshots
//! - `platform`: Browser/native platform abstraction (input, storage, time)
//! - `audio`: Procedural sound effects driven by simulation events
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScore;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Tiles along each side of the (square) grid
    pub const TILE_COUNT: i32 = 20;
    /// Pixel size of one tile on the canvas
    pub const GRID_SIZE: f32 = 20.0;

    /// Tick interval at the start of a run (ms)
    pub const BASE_TICK_MS: u64 = 200;
    /// Fastest allowed tick interval (ms)
    pub const MIN_TICK_MS: u64 = 30;
    /// Time allowed to reach each food before the run ends (ms)
    pub const FOOD_TIMEOUT_MS: u64 = 10_000;
    /// Remaining food time at which the warning beeps start (ms)
    pub const LOW_TIME_WARNING_MS: u64 = 3_000;

    /// Every this many points the tick interval halves and chain count doubles
    pub const SPEEDUP_EVERY: u64 = 9;
    /// Obstacles are regenerated on multiples of this score
    pub const OBSTACLE_EVERY: u64 = 6;
    /// Maximum cells in one obstacle chain
    pub const OBSTACLE_CHAIN_LENGTH: usize = 6;
    /// Chance per step that the chain walk picks a new direction
    pub const OBSTACLE_TURN_CHANCE: f64 = 0.3;
    /// Minimum Manhattan distance between a chain start and the snake head
    pub const OBSTACLE_MIN_HEAD_DISTANCE: i32 = 5;
    /// Start-cell samples per chain before the chain is skipped
    pub const OBSTACLE_START_ATTEMPTS: u32 = 50;
    /// Upper bound on chains per regeneration (the multiplier itself is unbounded)
    pub const MAX_OBSTACLE_CHAINS: u32 = 64;

    /// Ruby (bonus item) value
    pub const RUBY_POINTS: u64 = 10;
    /// Ruby lifetime before it disappears (ms)
    pub const RUBY_LIFETIME_MS: u64 = 6_000;
    /// Ruby starts blinking after this age (ms)
    pub const RUBY_BLINK_AFTER_MS: u64 = 3_000;
    /// Invincibility granted by a ruby (ms)
    pub const INVINCIBILITY_MS: u64 = 6_000;
    /// Chance of a ruby spawning when eligible
    pub const RUBY_SPAWN_CHANCE: f64 = 0.3;
    /// Points required since the previous ruby spawn
    pub const RUBY_SCORE_GAP: u64 = 10;

    /// Random samples tried before food placement scans for a free cell
    pub const FOOD_PLACEMENT_ATTEMPTS: u32 = 1_000;

    /// Segments of a freshly spawned snake (head at grid center, moving right)
    pub const INITIAL_SNAKE_LENGTH: i32 = 3;
}

/// Wrap a coordinate into `[0, tiles)`
#[inline]
pub fn wrap_coord(value: i32, tiles: i32) -> i32 {
    value.rem_euclid(tiles)
}

/// Manhattan distance on a torus (shortest way around each axis)
#[inline]
pub fn toroidal_distance(a: (i32, i32), b: (i32, i32), tiles: i32) -> i32 {
    let dx = (a.0 - b.0).rem_euclid(tiles);
    let dy = (a.1 - b.1).rem_euclid(tiles);
    dx.min(tiles - dx) + dy.min(tiles - dy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_coord() {
        assert_eq!(wrap_coord(-1, 20), 19);
        assert_eq!(wrap_coord(20, 20), 0);
        assert_eq!(wrap_coord(7, 20), 7);
    }

    #[test]
    fn test_toroidal_distance() {
        assert_eq!(toroidal_distance((0, 0), (19, 0), 20), 1);
        assert_eq!(toroidal_distance((0, 0), (10, 10), 20), 20);
        assert_eq!(toroidal_distance((3, 4), (3, 4), 20), 0);
    }
}
