//! Random placement of food and rubies on free cells

use rand::Rng;
use rand::seq::IndexedRandom;

use super::state::{GameState, Position, Ruby};

/// Uniformly random cell on a `tiles` x `tiles` grid
pub fn random_cell<R: Rng + ?Sized>(rng: &mut R, tiles: i32) -> Position {
    Position::new(rng.random_range(0..tiles), rng.random_range(0..tiles))
}

fn food_cell_free(state: &GameState, pos: Position) -> bool {
    !state.snake.contains(pos) && !state.is_ruby(pos) && !state.is_obstacle(pos)
}

/// Move the food to a free cell and restart its timeout at `now`.
///
/// Rejection-samples up to `food_placement_attempts` times, then picks among
/// the remaining free cells so placement always terminates.
pub fn place_food(state: &mut GameState, now: u64) -> Position {
    let pos = find_food_cell(state);
    state.food = pos;
    state.food_spawned_at = now;
    pos
}

fn find_food_cell(state: &mut GameState) -> Position {
    let tiles = state.tiles();
    for _ in 0..state.tuning.food_placement_attempts {
        let candidate = random_cell(&mut state.rng, tiles);
        if food_cell_free(state, candidate) {
            return candidate;
        }
    }

    let free: Vec<Position> = (0..tiles)
        .flat_map(|y| (0..tiles).map(move |x| Position::new(x, y)))
        .filter(|&p| food_cell_free(state, p))
        .collect();
    match free.choose(&mut state.rng) {
        Some(&pos) => {
            log::debug!("Food placed by scan ({} free cells)", free.len());
            pos
        }
        None => {
            log::warn!("No free cell for food, leaving it in place");
            state.food
        }
    }
}

/// Try once to drop a ruby on a free cell.
///
/// A single sample only: if it lands on the snake, the food or an obstacle
/// the spawn is skipped. Does nothing while a ruby already exists.
pub fn spawn_ruby(state: &mut GameState, now: u64) -> Option<Ruby> {
    if state.ruby.is_some() {
        return None;
    }
    let tiles = state.tiles();
    let pos = random_cell(&mut state.rng, tiles);
    if state.snake.contains(pos) || pos == state.food || state.is_obstacle(pos) {
        log::debug!("Ruby spawn at ({}, {}) blocked", pos.x, pos.y);
        return None;
    }
    let ruby = Ruby {
        pos,
        spawned_at: now,
    };
    state.ruby = Some(ruby);
    Some(ruby)
}
