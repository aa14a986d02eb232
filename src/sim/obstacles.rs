//! Obstacle chain generation
//!
//! Each chain is a short biased random walk: it mostly keeps going straight,
//! occasionally turns, never doubles back, and stops the moment it would
//! step onto a cell it already covers.

use rand::Rng;

use super::placement::random_cell;
use super::state::{Direction, GameEvent, GameState, Position, Snake};
use crate::tuning::Tuning;

/// Build a fresh obstacle set: one chain per speed multiplier step.
///
/// Chains are concatenated without dedup, so two chains may overlap.
pub fn generate_obstacles(state: &mut GameState) -> Vec<Position> {
    // The multiplier keeps doubling; only the chain count built here is capped
    let chains = state.speed_multiplier.min(state.tuning.max_obstacle_chains);
    let mut cells = Vec::with_capacity(chains as usize * state.tuning.obstacle_chain_length);

    for _ in 0..chains {
        let Some(start) = pick_chain_start(&mut state.rng, &state.tuning, &state.snake, state.food)
        else {
            log::debug!("Obstacle chain skipped, no start cell found");
            continue;
        };
        let chain = walk_chain(&mut state.rng, &state.tuning, start);
        cells.extend(chain);
    }

    cells
}

/// Sample a chain start away from the head, off the snake and the food.
/// Gives up after `obstacle_start_attempts` samples.
///
/// Head distance is plain Manhattan distance on the grid, without wrap.
pub fn pick_chain_start<R: Rng + ?Sized>(
    rng: &mut R,
    tuning: &Tuning,
    snake: &Snake,
    food: Position,
) -> Option<Position> {
    let tiles = tuning.tile_count;
    let head = snake.head();
    (0..tuning.obstacle_start_attempts)
        .map(|_| random_cell(&mut *rng, tiles))
        .find(|&pos| {
            (pos.x - head.x).abs() + (pos.y - head.y).abs() >= tuning.obstacle_min_head_distance
                && !snake.contains(pos)
                && pos != food
        })
}

/// Random walk of at most `obstacle_chain_length` cells from `start`.
///
/// Only the start is kept off the snake and the food; later cells may cross
/// either.
pub fn walk_chain<R: Rng + ?Sized>(rng: &mut R, tuning: &Tuning, start: Position) -> Vec<Position> {
    let tiles = tuning.tile_count;
    let mut chain = Vec::with_capacity(tuning.obstacle_chain_length);
    chain.push(start);

    let mut dir = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
    let mut last = start;
    for _ in 1..tuning.obstacle_chain_length {
        if rng.random_bool(tuning.obstacle_turn_chance) {
            let options = dir.non_reverse();
            dir = options[rng.random_range(0..options.len())];
        }
        let next = last.step(dir, tiles);
        if chain.contains(&next) {
            break;
        }
        chain.push(next);
        last = next;
    }

    chain
}

/// Score-driven obstacle update after a score change.
///
/// On a multiple of `obstacle_every` the set is rebuilt from scratch;
/// otherwise any existing obstacles are removed.
pub fn apply_obstacle_policy(state: &mut GameState) {
    if state.score == 0 {
        return;
    }
    if state.score % state.tuning.obstacle_every == 0 {
        let cells = generate_obstacles(state);
        log::info!(
            "Obstacles regenerated at score {}: {} cells",
            state.score,
            cells.len()
        );
        let count = cells.len();
        state.obstacles = cells;
        state.emit(GameEvent::ObstaclesRegenerated { cells: count });
    } else if !state.obstacles.is_empty() {
        state.obstacles.clear();
        state.emit(GameEvent::ObstaclesCleared);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn is_adjacent(a: Position, b: Position, tiles: i32) -> bool {
        a.toroidal_distance(b, tiles) == 1
    }

    #[test]
    fn test_chain_start_respects_head_distance() {
        let tuning = Tuning::default();
        let snake = Snake::spawn(tuning.tile_count);
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..200 {
            if let Some(start) = pick_chain_start(&mut rng, &tuning, &snake, Position::new(0, 0)) {
                let head = snake.head();
                assert!((start.x - head.x).abs() + (start.y - head.y).abs() >= 5);
                assert!(!snake.contains(start));
                assert_ne!(start, Position::new(0, 0));
            }
        }
    }

    #[test]
    fn test_chain_start_gives_up() {
        let tuning = Tuning {
            tile_count: 8,
            obstacle_min_head_distance: 100,
            ..Default::default()
        };
        let snake = Snake::spawn(8);
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(pick_chain_start(&mut rng, &tuning, &snake, Position::new(0, 0)), None);
    }

    #[test]
    fn test_chain_start_distance_does_not_wrap() {
        // Across the wrap (0,10) and (19,10) are neighbours, on the grid they are 19 apart
        let tuning = Tuning {
            obstacle_min_head_distance: 19,
            obstacle_start_attempts: 10_000,
            ..Default::default()
        };
        let snake = Snake::new([Position::new(0, 10)]);
        let mut rng = Pcg32::seed_from_u64(3);
        let start = pick_chain_start(&mut rng, &tuning, &snake, Position::new(5, 5))
            .expect("far cells exist");
        assert!(start.x + (start.y - 10).abs() >= 19);

        // 21 is beyond any wrapped distance on a 20-tile grid but still reachable here
        let tuning = Tuning {
            obstacle_min_head_distance: 21,
            ..tuning
        };
        let start = pick_chain_start(&mut rng, &tuning, &snake, Position::new(5, 5))
            .expect("far cells exist");
        assert!(start.x + (start.y - 10).abs() >= 21);
        assert!(start.toroidal_distance(snake.head(), 20) <= 20);
    }

    #[test]
    fn test_chain_walks_through_snake_and_food() {
        let tuning = Tuning {
            tile_count: 8,
            obstacle_turn_chance: 0.0,
            obstacle_min_head_distance: 0,
            ..Default::default()
        };
        let mut state = GameState::new(9, tuning);
        // Checkerboard body: every straight step from a free cell lands on the snake
        let body: Vec<Position> = (0..8)
            .flat_map(|y| (0..8).map(move |x| Position::new(x, y)))
            .filter(|p| (p.x + p.y) % 2 == 0)
            .collect();
        state.snake = Snake::new(body);
        state.food = Position::new(1, 0);

        let cells = generate_obstacles(&mut state);
        assert_eq!(cells.len(), state.tuning.obstacle_chain_length);
        assert!(!state.snake.contains(cells[0]));
        assert_ne!(cells[0], state.food);
        let on_snake = cells.iter().filter(|&&p| state.snake.contains(p)).count();
        assert_eq!(on_snake, 3);
    }

    #[test]
    fn test_generate_builds_one_chain_per_multiplier() {
        let tuning = Tuning {
            obstacle_turn_chance: 0.0,
            ..Default::default()
        };
        let mut state = GameState::new(77, tuning);
        state.reset(0);

        let one = generate_obstacles(&mut state);
        assert_eq!(one.len(), state.tuning.obstacle_chain_length);

        state.speed_multiplier = 2;
        let two = generate_obstacles(&mut state);
        assert_eq!(two.len(), 2 * state.tuning.obstacle_chain_length);
    }

    #[test]
    fn test_chain_count_is_capped() {
        let tuning = Tuning {
            max_obstacle_chains: 3,
            ..Default::default()
        };
        let mut state = GameState::new(77, tuning);
        state.speed_multiplier = 1 << 20;
        let cells = generate_obstacles(&mut state);
        assert!(cells.len() <= 3 * state.tuning.obstacle_chain_length);
    }

    #[test]
    fn test_policy_regenerates_on_multiple_and_clears_after() {
        let mut state = GameState::new(5, Tuning::default());
        state.score = 6;
        apply_obstacle_policy(&mut state);
        assert!(!state.obstacles.is_empty());
        assert!(matches!(
            state.events.last(),
            Some(GameEvent::ObstaclesRegenerated { .. })
        ));

        state.score = 7;
        apply_obstacle_policy(&mut state);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.events.last(), Some(&GameEvent::ObstaclesCleared));
    }

    #[test]
    fn test_policy_noop_without_obstacles() {
        let mut state = GameState::new(5, Tuning::default());
        state.score = 7;
        apply_obstacle_policy(&mut state);
        assert!(state.obstacles.is_empty());
        assert!(state.events.is_empty());
    }

    proptest! {
        #[test]
        fn prop_chain_is_connected_and_distinct(seed in any::<u64>(), x in 0..20i32, y in 0..20i32) {
            let tuning = Tuning::default();
            let start = Position::new(x, y);
            let mut rng = Pcg32::seed_from_u64(seed);
            let chain = walk_chain(&mut rng, &tuning, start);

            prop_assert!(!chain.is_empty() && chain.len() <= tuning.obstacle_chain_length);
            prop_assert_eq!(chain[0], start);
            for pair in chain.windows(2) {
                prop_assert!(is_adjacent(pair[0], pair[1], 20));
            }
            for (i, a) in chain.iter().enumerate() {
                prop_assert!(a.in_bounds(20));
                prop_assert!(!chain[i + 1..].contains(a));
            }
        }
    }
}
