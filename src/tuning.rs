//! Data-driven game balance
//!
//! Every gameplay constant in [`crate::consts`] can be overridden from a JSON
//! balance file. Missing fields keep their defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Smallest grid that still leaves room for the starting snake and a chain
pub const MIN_TILE_COUNT: i32 = 8;

/// Gameplay balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub tile_count: i32,
    pub base_tick_ms: u64,
    pub min_tick_ms: u64,
    pub food_timeout_ms: u64,
    pub low_time_warning_ms: u64,
    pub speedup_every: u64,
    pub obstacle_every: u64,
    pub obstacle_chain_length: usize,
    pub obstacle_turn_chance: f64,
    pub obstacle_min_head_distance: i32,
    pub obstacle_start_attempts: u32,
    pub max_obstacle_chains: u32,
    pub ruby_points: u64,
    pub ruby_lifetime_ms: u64,
    pub invincibility_ms: u64,
    pub ruby_spawn_chance: f64,
    pub ruby_score_gap: u64,
    pub food_placement_attempts: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tile_count: TILE_COUNT,
            base_tick_ms: BASE_TICK_MS,
            min_tick_ms: MIN_TICK_MS,
            food_timeout_ms: FOOD_TIMEOUT_MS,
            low_time_warning_ms: LOW_TIME_WARNING_MS,
            speedup_every: SPEEDUP_EVERY,
            obstacle_every: OBSTACLE_EVERY,
            obstacle_chain_length: OBSTACLE_CHAIN_LENGTH,
            obstacle_turn_chance: OBSTACLE_TURN_CHANCE,
            obstacle_min_head_distance: OBSTACLE_MIN_HEAD_DISTANCE,
            obstacle_start_attempts: OBSTACLE_START_ATTEMPTS,
            max_obstacle_chains: MAX_OBSTACLE_CHAINS,
            ruby_points: RUBY_POINTS,
            ruby_lifetime_ms: RUBY_LIFETIME_MS,
            invincibility_ms: INVINCIBILITY_MS,
            ruby_spawn_chance: RUBY_SPAWN_CHANCE,
            ruby_score_gap: RUBY_SCORE_GAP,
            food_placement_attempts: FOOD_PLACEMENT_ATTEMPTS,
        }
    }
}

impl Tuning {
    /// Parse a balance file. Fields not present keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Clamp values the simulation cannot run with
    pub fn sanitized(mut self) -> Self {
        if self.tile_count < MIN_TILE_COUNT {
            log::warn!(
                "tile_count {} too small, using {}",
                self.tile_count,
                MIN_TILE_COUNT
            );
            self.tile_count = MIN_TILE_COUNT;
        }
        if self.min_tick_ms == 0 {
            log::warn!("min_tick_ms must be positive, using 1");
            self.min_tick_ms = 1;
        }
        if self.base_tick_ms < self.min_tick_ms {
            log::warn!(
                "base_tick_ms {} below min_tick_ms, using {}",
                self.base_tick_ms,
                self.min_tick_ms
            );
            self.base_tick_ms = self.min_tick_ms;
        }
        if self.speedup_every == 0 {
            log::warn!("speedup_every must be positive, using {}", SPEEDUP_EVERY);
            self.speedup_every = SPEEDUP_EVERY;
        }
        if self.obstacle_every == 0 {
            log::warn!("obstacle_every must be positive, using {}", OBSTACLE_EVERY);
            self.obstacle_every = OBSTACLE_EVERY;
        }
        if self.obstacle_chain_length == 0 {
            log::warn!("obstacle_chain_length must be positive, using 1");
            self.obstacle_chain_length = 1;
        }
        self.obstacle_turn_chance = clamp_probability("obstacle_turn_chance", self.obstacle_turn_chance);
        self.ruby_spawn_chance = clamp_probability("ruby_spawn_chance", self.ruby_spawn_chance);
        if self.food_placement_attempts == 0 {
            self.food_placement_attempts = 1;
        }
        self
    }

    /// Grid cells in total
    pub fn cell_count(&self) -> usize {
        (self.tile_count as usize) * (self.tile_count as usize)
    }
}

fn clamp_probability(name: &str, p: f64) -> f64 {
    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        let clamped = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        log::warn!("{} {} outside [0, 1], using {}", name, p, clamped);
        clamped
    } else {
        p
    }
}
