//! Grid-step simulation tick
//!
//! One call advances the snake by exactly one cell and resolves everything
//! that follows from it: collisions, food and ruby consumption, difficulty,
//! obstacles and timers. All time comparisons use the `now` passed in.

use rand::Rng;

use super::obstacles::apply_obstacle_policy;
use super::placement::{place_food, spawn_ruby};
use super::state::{DeathCause, GameEvent, GamePhase, GameState};

/// Advance the game state by one grid step at time `now` (ms).
///
/// Does nothing unless the game is running. A collision or food timeout
/// moves the state to [`GamePhase::GameOver`] and stops the step.
pub fn tick(state: &mut GameState, now: u64) {
    if state.phase != GamePhase::Running {
        return;
    }

    if now.saturating_sub(state.food_spawned_at) > state.tuning.food_timeout_ms {
        log::info!("Food timeout at score {}", state.score);
        state.ruby = None;
        state.phase = GamePhase::GameOver;
        state.emit(GameEvent::TimedOut);
        return;
    }

    state.time_ticks += 1;

    // Reversals were rejected when the input was buffered
    let previous = state.direction;
    state.direction = state.pending_direction;
    if state.direction != previous {
        state.emit(GameEvent::Turned);
    }

    let head = state.snake.head().step(state.direction, state.tiles());

    // The tail cell still counts as occupied even though it would move away
    if !state.is_invincible(now) {
        let cause = if state.snake.contains(head) {
            Some(DeathCause::SelfCollision)
        } else if state.is_obstacle(head) {
            Some(DeathCause::Obstacle)
        } else {
            None
        };
        if let Some(cause) = cause {
            log::info!("Died ({:?}) at score {}", cause, state.score);
            state.phase = GamePhase::GameOver;
            state.emit(GameEvent::Died { cause });
            return;
        }
    }

    state.snake.push_head(head);

    if head == state.food {
        eat_food(state, now);
    } else {
        state.snake.pop_tail();
    }

    if state.is_ruby(head) {
        collect_ruby(state, now);
    }

    if state.invincible_until.is_some_and(|end| now >= end) {
        state.invincible_until = None;
        state.emit(GameEvent::InvincibilityEnded);
    }

    let lifetime = state.tuning.ruby_lifetime_ms;
    if let Some(ruby) = state.ruby.filter(|r| r.is_expired(now, lifetime)) {
        log::debug!("Ruby expired at ({}, {})", ruby.pos.x, ruby.pos.y);
        state.ruby = None;
        state.emit(GameEvent::RubyExpired);
    }
}

fn eat_food(state: &mut GameState, now: u64) {
    state.score += 1;
    state.emit(GameEvent::AteFood);

    if state.score % state.tuning.speedup_every == 0 {
        state.tick_interval_ms = (state.tick_interval_ms / 2).max(state.tuning.min_tick_ms);
        state.speed_multiplier = state.speed_multiplier.saturating_mul(2);
        log::info!(
            "Speed up at score {}: {} ms per tick, x{}",
            state.score,
            state.tick_interval_ms,
            state.speed_multiplier
        );
        state.emit(GameEvent::SpeedUp {
            interval_ms: state.tick_interval_ms,
        });
    }

    apply_obstacle_policy(state);

    let eligible = state.score - state.last_ruby_spawn_score >= state.tuning.ruby_score_gap
        && state.ruby.is_none();
    if eligible && state.rng.random_bool(state.tuning.ruby_spawn_chance) {
        // The gap restarts even when the single placement sample is blocked
        state.last_ruby_spawn_score = state.score;
        if let Some(ruby) = spawn_ruby(state, now) {
            log::debug!("Ruby spawned at ({}, {})", ruby.pos.x, ruby.pos.y);
            state.emit(GameEvent::RubySpawned);
        }
    }

    place_food(state, now);
}

fn collect_ruby(state: &mut GameState, now: u64) {
    state.score += state.tuning.ruby_points;
    state.ruby = None;
    state.invincible_until = Some(now.saturating_add(state.tuning.invincibility_ms));
    log::info!("Ruby collected, score {}, invincible", state.score);
    state.emit(GameEvent::AteRuby);
    apply_obstacle_policy(state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Direction, Position, Ruby, Snake};
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    /// Running state with the standard opening snake at (10,10) heading right
    fn running_state(now: u64) -> GameState {
        let mut state = GameState::new(12345, Tuning::default());
        state.reset(now);
        state.phase = GamePhase::Running;
        state
    }

    fn cells(state: &GameState) -> Vec<Position> {
        state.snake.iter().copied().collect()
    }

    #[test]
    fn test_tick_not_running_is_noop() {
        let mut state = GameState::new(1, Tuning::default());
        let before = cells(&state);
        tick(&mut state, 100);
        assert_eq!(cells(&state), before);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_eat_food_grows_and_scores() {
        let mut state = running_state(0);
        state.food = Position::new(11, 10);
        tick(&mut state, 200);

        assert_eq!(state.snake.head(), Position::new(11, 10));
        assert_eq!(state.score, 1);
        assert_eq!(state.snake.len(), 4);
        assert_eq!(state.snake.tail(), Position::new(8, 10));
        assert!(state.events.contains(&GameEvent::AteFood));
        assert_ne!(state.food, Position::new(11, 10));
        assert_eq!(state.food_spawned_at, 200);
    }

    #[test]
    fn test_plain_move_keeps_length() {
        let mut state = running_state(0);
        state.food = Position::new(0, 0);
        tick(&mut state, 200);
        assert_eq!(
            cells(&state),
            vec![Position::new(11, 10), Position::new(10, 10), Position::new(9, 10)]
        );
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_wraps_around_edge() {
        let mut state = running_state(0);
        state.snake = Snake::new([Position::new(19, 3), Position::new(18, 3), Position::new(17, 3)]);
        state.food = Position::new(5, 5);
        tick(&mut state, 200);
        assert_eq!(state.snake.head(), Position::new(0, 3));
    }

    #[test]
    fn test_turn_emits_signal() {
        let mut state = running_state(0);
        state.food = Position::new(0, 0);
        state.pending_direction = Direction::Up;
        tick(&mut state, 200);
        assert_eq!(state.snake.head(), Position::new(10, 9));
        assert_eq!(state.events, vec![GameEvent::Turned]);

        state.events.clear();
        tick(&mut state, 400);
        assert!(!state.events.contains(&GameEvent::Turned));
    }

    #[test]
    fn test_food_timeout_ends_game_without_moving() {
        let mut state = running_state(0);
        state.food = Position::new(0, 0);
        let before = cells(&state);

        tick(&mut state, 10_000);
        assert_eq!(state.phase, GamePhase::Running);

        let moved = cells(&state);
        tick(&mut state, 10_001 + 10_000);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(cells(&state), moved);
        assert_ne!(moved, before);
        assert_eq!(state.events.last(), Some(&GameEvent::TimedOut));
    }

    #[test]
    fn test_timeout_clears_ruby() {
        let mut state = running_state(0);
        state.food = Position::new(0, 0);
        state.ruby = Some(Ruby {
            pos: Position::new(3, 3),
            spawned_at: 9_000,
        });
        tick(&mut state, 10_001);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.ruby.is_none());
    }

    /// Snake coiled so that turning down runs into its own body
    fn coiled_state(now: u64) -> GameState {
        let mut state = running_state(now);
        state.snake = Snake::new([
            Position::new(5, 5),
            Position::new(4, 5),
            Position::new(4, 6),
            Position::new(5, 6),
            Position::new(6, 6),
        ]);
        state.direction = Direction::Right;
        state.pending_direction = Direction::Down;
        state.food = Position::new(15, 15);
        state
    }

    #[test]
    fn test_self_collision_kills() {
        let mut state = coiled_state(0);
        tick(&mut state, 200);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::Died {
            cause: DeathCause::SelfCollision
        }));
        assert_eq!(state.snake.head(), Position::new(5, 5));
    }

    #[test]
    fn test_moving_into_vacating_tail_kills() {
        // Head at (5,5) heading down onto the tail at (5,6), which would be popped this tick
        let mut state = running_state(0);
        state.snake = Snake::new([
            Position::new(5, 5),
            Position::new(6, 5),
            Position::new(6, 6),
            Position::new(5, 6),
        ]);
        state.direction = Direction::Left;
        state.pending_direction = Direction::Down;
        state.food = Position::new(15, 15);
        tick(&mut state, 200);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_obstacle_kills() {
        let mut state = running_state(0);
        state.food = Position::new(0, 0);
        state.obstacles = vec![Position::new(11, 10)];
        tick(&mut state, 200);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(
            state.events.last(),
            Some(&GameEvent::Died {
                cause: DeathCause::Obstacle
            })
        );
    }

    #[test]
    fn test_invincibility_window_for_self_collision() {
        // Granted at T=1000 for 6000ms
        let mut state = coiled_state(0);
        state.invincible_until = Some(1_000 + 6_000);
        tick(&mut state, 1_000 + 3_000);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.snake.head(), Position::new(5, 6));

        let mut state = coiled_state(0);
        state.invincible_until = Some(1_000 + 6_000);
        tick(&mut state, 1_000 + 6_001);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_invincibility_passes_obstacles_and_expires() {
        let mut state = running_state(0);
        state.food = Position::new(0, 0);
        state.obstacles = vec![Position::new(11, 10)];
        state.invincible_until = Some(400);
        tick(&mut state, 200);
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.invincible_until.is_some());

        tick(&mut state, 400);
        assert!(state.invincible_until.is_none());
        assert!(state.events.contains(&GameEvent::InvincibilityEnded));
    }

    #[test]
    fn test_collect_ruby() {
        let mut state = running_state(0);
        state.food = Position::new(0, 0);
        state.ruby = Some(Ruby {
            pos: Position::new(11, 10),
            spawned_at: 0,
        });
        tick(&mut state, 1_000);

        assert_eq!(state.score, 10);
        assert!(state.ruby.is_none());
        assert_eq!(state.invincible_until, Some(7_000));
        assert_eq!(state.snake.len(), 3);
        assert!(state.events.contains(&GameEvent::AteRuby));
        // 10 is not a multiple of 6 and there were no obstacles
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_ruby_at_multiple_of_six_regenerates_obstacles() {
        let mut state = running_state(0);
        state.food = Position::new(0, 0);
        state.score = 2;
        state.ruby = Some(Ruby {
            pos: Position::new(11, 10),
            spawned_at: 0,
        });
        tick(&mut state, 1_000);
        assert_eq!(state.score, 12);
        assert!(!state.obstacles.is_empty());
    }

    #[test]
    fn test_ruby_expires() {
        let mut state = running_state(0);
        state.food = Position::new(0, 0);
        state.ruby = Some(Ruby {
            pos: Position::new(3, 3),
            spawned_at: 1_000,
        });
        tick(&mut state, 1_000 + 6_000);
        assert!(state.ruby.is_some());
        tick(&mut state, 1_000 + 6_001);
        assert!(state.ruby.is_none());
        assert!(state.events.contains(&GameEvent::RubyExpired));
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_speedup_at_nine() {
        let mut state = running_state(0);
        state.score = 8;
        state.food = Position::new(11, 10);
        tick(&mut state, 200);

        assert_eq!(state.score, 9);
        assert_eq!(state.tick_interval_ms, 100);
        assert_eq!(state.speed_multiplier, 2);
        assert!(state.events.contains(&GameEvent::SpeedUp { interval_ms: 100 }));
    }

    #[test]
    fn test_chain_count_doubles_after_speedup() {
        let tuning = Tuning {
            obstacle_turn_chance: 0.0,
            ruby_spawn_chance: 0.0,
            ..Default::default()
        };
        let mut state = GameState::new(2024, tuning);
        state.reset(0);
        state.phase = GamePhase::Running;
        let chain_length = state.tuning.obstacle_chain_length;

        // Score 6 regenerates with a single chain
        state.score = 5;
        state.food = Position::new(11, 10);
        tick(&mut state, 200);
        assert_eq!(state.speed_multiplier, 1);
        assert_eq!(state.obstacles.len(), chain_length);

        // Score 9 speeds up (and clears, 9 is not a multiple of 6)
        state.invincible_until = Some(u64::MAX);
        state.score = 8;
        state.food = state.snake.head().step(state.direction, 20);
        tick(&mut state, 400);
        assert_eq!(state.score, 9);
        assert_eq!(state.speed_multiplier, 2);
        assert!(state.obstacles.is_empty());

        // The next regeneration at 12 builds two straight chains
        state.score = 11;
        state.food = state.snake.head().step(state.direction, 20);
        tick(&mut state, 600);
        assert_eq!(state.score, 12);
        assert_eq!(state.obstacles.len(), 2 * chain_length);
        assert!(
            state
                .events
                .contains(&GameEvent::ObstaclesRegenerated { cells: 2 * chain_length })
        );
    }

    #[test]
    fn test_speed_floor() {
        let mut state = running_state(0);
        state.tick_interval_ms = 50;
        state.speed_multiplier = 4;
        state.score = 26;
        state.food = Position::new(11, 10);
        tick(&mut state, 200);
        assert_eq!(state.tick_interval_ms, 30);
        assert_eq!(state.speed_multiplier, 8);
    }

    #[test]
    fn test_obstacles_at_six_persist_then_clear_at_seven() {
        let mut state = running_state(0);
        state.score = 5;
        state.food = Position::new(11, 10);
        tick(&mut state, 200);
        assert_eq!(state.score, 6);
        assert!(!state.obstacles.is_empty());

        // A plain move at score 6 leaves them alone
        let obstacles = state.obstacles.clone();
        let next = state.snake.head().step(state.direction, 20);
        state.food = Position::new(0, 0);
        if state.is_obstacle(next) {
            state.invincible_until = Some(u64::MAX);
        }
        tick(&mut state, 400);
        assert_eq!(state.obstacles, obstacles);

        // Eating the next food moves the score to 7 and clears them
        let next = state.snake.head().step(state.direction, 20);
        state.invincible_until = Some(u64::MAX);
        state.food = next;
        tick(&mut state, 600);
        assert_eq!(state.score, 7);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_ruby_spawn_requires_score_gap() {
        let tuning = Tuning {
            ruby_spawn_chance: 1.0,
            ..Default::default()
        };
        let mut state = GameState::new(3, tuning);
        state.reset(0);
        state.phase = GamePhase::Running;
        state.score = 8;
        state.food = Position::new(11, 10);
        tick(&mut state, 200);
        assert_eq!(state.last_ruby_spawn_score, 0);
        assert!(state.ruby.is_none());

        state.score = 9;
        state.food = Position::new(12, 10);
        tick(&mut state, 400);
        assert_eq!(state.last_ruby_spawn_score, 10);
    }

    proptest! {
        #[test]
        fn prop_length_and_bounds(seed in any::<u64>(), turns in prop::collection::vec(0usize..4, 1..60)) {
            let mut state = GameState::new(seed, Tuning::default());
            state.reset(0);
            state.phase = GamePhase::Running;
            let mut now = 0;
            let mut score = 0;
            for turn in turns {
                if state.phase != GamePhase::Running {
                    break;
                }
                let dir = Direction::ALL[turn];
                if !dir.is_reverse_of(state.direction) {
                    state.pending_direction = dir;
                }
                let before = state.snake.len();
                now += 200;
                tick(&mut state, now);
                let after = state.snake.len();
                prop_assert!(after == before || after == before + 1);
                prop_assert!(state.snake.iter().all(|p| p.in_bounds(20)));
                prop_assert!(state.score >= score);
                score = state.score;
            }
        }
    }
}
