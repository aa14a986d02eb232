//! Idle/demo mode: the game plays itself
//!
//! Greedy one-step lookahead. Good enough to attract-loop on a title screen,
//! not meant to survive long at high speed.

use super::state::{Direction, GameState};

/// Pick the next direction: never reverse, avoid cells that kill, then head
/// for the ruby if it is nearer than the food.
pub fn choose_direction(state: &GameState) -> Direction {
    let tiles = state.tiles();
    let head = state.snake.head();
    let current = state.direction;

    let food_dist = state.food.toroidal_distance(head, tiles);
    let target = match state.ruby {
        Some(ruby) if ruby.pos.toroidal_distance(head, tiles) < food_dist => ruby.pos,
        _ => state.food,
    };

    current
        .non_reverse()
        .into_iter()
        .filter_map(|dir| {
            let next = head.step(dir, tiles);
            if state.is_deadly(next) {
                None
            } else {
                // Prefer going straight on ties
                Some((next.toroidal_distance(target, tiles), dir != current, dir))
            }
        })
        .min()
        .map(|(_, _, dir)| dir)
        .unwrap_or(current)
}
