//! Snapshot tessellation
//!
//! Turns a [`Snapshot`] into one triangle list in canvas pixels (origin top
//! left, y down). Back to front: board, obstacles, food, ruby, snake, then
//! full-screen overlays. Text is left to the DOM HUD.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::consts::{GRID_SIZE, RUBY_BLINK_AFTER_MS};
use crate::settings::Settings;
use crate::sim::{GamePhase, Position, Snapshot};

/// Ruby blink half-period (ms)
pub const RUBY_BLINK_MS: u64 = 300;
/// Invincibility flash and low-time pulse half-period (ms)
pub const FLASH_MS: u64 = 200;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneOptions {
    /// Pixel size of one tile
    pub tile_size: f32,
    /// Steady colors instead of blinking/flashing/pulsing
    pub reduced_motion: bool,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            tile_size: GRID_SIZE,
            reduced_motion: false,
        }
    }
}

impl SceneOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            reduced_motion: settings.reduced_motion,
            ..Default::default()
        }
    }
}

/// Square side of the board in pixels
pub fn board_size(snap: &Snapshot, opts: &SceneOptions) -> f32 {
    snap.tile_count as f32 * opts.tile_size
}

/// A ruby in its last seconds blinks out on alternate half-periods
pub fn ruby_visible(age_ms: u64, time_ms: u64, reduced_motion: bool) -> bool {
    reduced_motion || age_ms <= RUBY_BLINK_AFTER_MS || (time_ms / RUBY_BLINK_MS) % 2 == 1
}

/// Whether the snake shows in the invincibility color this frame
pub fn snake_flashing(invincible: bool, time_ms: u64, reduced_motion: bool) -> bool {
    invincible && (reduced_motion || (time_ms / FLASH_MS) % 2 == 0)
}

pub fn build_scene(snap: &Snapshot, opts: &SceneOptions, time_ms: u64) -> Vec<Vertex> {
    let tile = opts.tile_size;
    let board = board_size(snap, opts);
    let cell_min = |p: Position| Vec2::new(p.x as f32, p.y as f32) * tile;
    let cell_center = |p: Position| cell_min(p) + Vec2::splat(tile / 2.0);
    let inset = (tile * 0.05).max(1.0);

    let tiles = (snap.tile_count * snap.tile_count) as usize;
    let mut v = Vec::with_capacity(6 * (tiles + snap.snake.len() + snap.obstacles.len() * 5 + 64));

    // Board
    v.extend(shapes::rect(Vec2::ZERO, Vec2::splat(board), colors::BACKGROUND));
    for y in 0..snap.tile_count {
        for x in 0..snap.tile_count {
            let min = cell_min(Position::new(x, y)) + Vec2::splat(inset);
            v.extend(shapes::rect(min, Vec2::splat(tile - 2.0 * inset), colors::TILE));
        }
    }

    for &cell in &snap.obstacles {
        v.extend(shapes::rect(cell_min(cell), Vec2::splat(tile), colors::OBSTACLE));
        v.extend(shapes::rect_outline(
            cell_min(cell),
            Vec2::splat(tile),
            inset * 2.0,
            colors::OBSTACLE_EDGE,
        ));
    }

    // Gold coin
    let center = cell_center(snap.food);
    v.extend(shapes::circle(center, tile * 0.45, colors::FOOD_RIM, 16));
    v.extend(shapes::circle(center, tile * 0.38, colors::FOOD, 16));
    v.extend(shapes::circle(center, tile * 0.15, colors::FOOD_CENTER, 10));

    let ruby = snap
        .ruby
        .filter(|r| ruby_visible(r.age_ms, time_ms, opts.reduced_motion));
    if let Some(ruby) = ruby {
        let center = cell_center(ruby.pos);
        v.extend(shapes::diamond(center, tile * 0.45, colors::RUBY_EDGE));
        v.extend(shapes::diamond(center, tile * 0.36, colors::RUBY));
        v.extend(shapes::diamond(
            center - Vec2::splat(tile * 0.1),
            tile * 0.12,
            colors::RUBY_SHINE,
        ));
    }

    // Tail first so the head is drawn on top
    let flashing = snake_flashing(snap.invincible, time_ms, opts.reduced_motion);
    for (i, &cell) in snap.snake.iter().enumerate().rev() {
        let color = match (flashing, i) {
            (true, _) => colors::SNAKE_FLASH,
            (false, 0) => colors::SNAKE_HEAD,
            (false, _) => colors::SNAKE_BODY,
        };
        let min = cell_min(cell) + Vec2::splat(inset);
        v.extend(shapes::rect(min, Vec2::splat(tile - 2.0 * inset), color));
    }

    if snap.is_low_time() {
        if opts.reduced_motion {
            v.extend(shapes::rect_outline(
                Vec2::ZERO,
                Vec2::splat(board),
                tile * 0.25,
                colors::LOW_TIME_PULSE,
            ));
        } else if (time_ms / FLASH_MS) % 2 == 0 {
            v.extend(shapes::rect(Vec2::ZERO, Vec2::splat(board), colors::LOW_TIME_PULSE));
        }
    }

    match snap.phase {
        GamePhase::Paused => {
            v.extend(shapes::rect(Vec2::ZERO, Vec2::splat(board), colors::PAUSE_DIM));
        }
        GamePhase::GameOver => {
            v.extend(shapes::rect(Vec2::ZERO, Vec2::splat(board), colors::GAME_OVER_DIM));
        }
        GamePhase::NotStarted | GamePhase::Running => {}
    }

    v
}
