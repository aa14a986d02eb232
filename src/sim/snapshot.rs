//! Read-only view of the simulation for renderers and HUDs

use serde::{Deserialize, Serialize};

use super::state::{Direction, GamePhase, GameState, Position};

/// Ruby as seen by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubyView {
    pub pos: Position,
    pub age_ms: u64,
}

/// Everything a frame needs to draw, captured at one instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tile_count: i32,
    /// Head first
    pub snake: Vec<Position>,
    pub direction: Direction,
    pub food: Position,
    pub food_time_left_ms: u64,
    pub ruby: Option<RubyView>,
    pub obstacles: Vec<Position>,
    pub score: u64,
    pub high_score: u64,
    pub phase: GamePhase,
    pub invincible: bool,
    pub invincible_left_ms: u64,
    pub tick_interval_ms: u64,
    pub low_time_warning_ms: u64,
}

impl Snapshot {
    /// Capture `state` at `now`. While paused, time stands still at the
    /// moment the pause began.
    pub fn capture(state: &GameState, high_score: u64, now: u64) -> Self {
        let now = state.paused_at.unwrap_or(now);
        let invincible = state.is_invincible(now);
        Self {
            tile_count: state.tiles(),
            snake: state.snake.iter().copied().collect(),
            direction: state.direction,
            food: state.food,
            food_time_left_ms: state.food_time_left(now),
            ruby: state.ruby.map(|r| RubyView {
                pos: r.pos,
                age_ms: r.age(now),
            }),
            obstacles: state.obstacles.clone(),
            score: state.score,
            high_score: high_score.max(state.score),
            phase: state.phase,
            invincible,
            invincible_left_ms: state
                .invincible_until
                .filter(|_| invincible)
                .map_or(0, |end| end - now),
            tick_interval_ms: state.tick_interval_ms,
            low_time_warning_ms: state.tuning.low_time_warning_ms,
        }
    }

    /// Whole seconds of food time left, rounded up (what the HUD shows)
    pub fn food_seconds_left(&self) -> u64 {
        self.food_time_left_ms.div_ceil(1000)
    }

    pub fn invincible_seconds_left(&self) -> u64 {
        self.invincible_left_ms.div_ceil(1000)
    }

    /// Food timer is in the warning zone while the game runs
    pub fn is_low_time(&self) -> bool {
        self.phase == GamePhase::Running && self.food_time_left_ms <= self.low_time_warning_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Ruby;
    use crate::tuning::Tuning;

    #[test]
    fn test_capture_timers() {
        let mut state = GameState::new(8, Tuning::default());
        state.reset(1_000);
        state.phase = GamePhase::Running;
        state.invincible_until = Some(5_000);
        state.ruby = Some(Ruby {
            pos: Position::new(2, 2),
            spawned_at: 2_000,
        });

        let snap = Snapshot::capture(&state, 42, 3_500);
        assert_eq!(snap.food_time_left_ms, 7_500);
        assert_eq!(snap.food_seconds_left(), 8);
        assert!(snap.invincible);
        assert_eq!(snap.invincible_left_ms, 1_500);
        assert_eq!(snap.invincible_seconds_left(), 2);
        assert_eq!(snap.ruby.map(|r| r.age_ms), Some(1_500));
        assert_eq!(snap.high_score, 42);
        assert_eq!(snap.snake.len(), 3);
        assert!(!snap.is_low_time());
    }

    #[test]
    fn test_capture_frozen_while_paused() {
        let mut state = GameState::new(8, Tuning::default());
        state.reset(0);
        state.phase = GamePhase::Paused;
        state.paused_at = Some(2_000);
        let early = Snapshot::capture(&state, 0, 2_500);
        let late = Snapshot::capture(&state, 0, 60_000);
        assert_eq!(early, late);
        assert_eq!(late.food_time_left_ms, 8_000);
    }

    #[test]
    fn test_low_time_and_running_score_as_high_score() {
        let mut state = GameState::new(8, Tuning::default());
        state.reset(0);
        state.phase = GamePhase::Running;
        state.score = 12;
        let snap = Snapshot::capture(&state, 5, 7_000);
        assert!(snap.is_low_time());
        assert_eq!(snap.food_seconds_left(), 3);
        assert_eq!(snap.high_score, 12);
    }
}
