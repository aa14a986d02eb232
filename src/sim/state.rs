//! Game state and core simulation types
//!
//! Everything the tick engine reads or writes lives in [`GameState`]; there is
//! no ambient state anywhere else in the simulation.

use std::collections::VecDeque;

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::placement;
use crate::consts::INITIAL_SNAKE_LENGTH;
use crate::tuning::Tuning;

/// A grid cell. Always inside `[0, tile_count)` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn as_ivec2(self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    /// Neighbor one step in `dir`, wrapped onto the torus
    #[inline]
    pub fn step(self, dir: Direction, tiles: i32) -> Self {
        let next = (self.as_ivec2() + dir.delta()).rem_euclid(IVec2::splat(tiles));
        Self::from(next)
    }

    /// Manhattan distance across the torus (shortest way around each axis)
    pub fn toroidal_distance(self, other: Position, tiles: i32) -> i32 {
        crate::toroidal_distance((self.x, self.y), (other.x, other.y), tiles)
    }

    pub fn in_bounds(self, tiles: i32) -> bool {
        (0..tiles).contains(&self.x) && (0..tiles).contains(&self.y)
    }
}

impl From<IVec2> for Position {
    fn from(v: IVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// Movement direction (screen coordinates, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit vector for this direction
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_reverse_of(self, other: Direction) -> bool {
        self == other.opposite()
    }

    /// The three directions that do not double back on `self`
    pub fn non_reverse(self) -> [Direction; 3] {
        let mut out = [self; 3];
        let mut i = 0;
        for dir in Self::ALL {
            if !dir.is_reverse_of(self) {
                out[i] = dir;
                i += 1;
            }
        }
        out
    }
}

/// The snake body, head first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snake {
    segments: VecDeque<Position>,
}

impl Snake {
    /// Build from segments ordered head first. Panics on an empty body.
    pub fn new(segments: impl IntoIterator<Item = Position>) -> Self {
        let segments: VecDeque<Position> = segments.into_iter().collect();
        assert!(!segments.is_empty(), "snake needs at least a head");
        Self { segments }
    }

    /// Fresh snake at the grid center, heading right
    pub fn spawn(tiles: i32) -> Self {
        let center = tiles / 2;
        Self::new((0..INITIAL_SNAKE_LENGTH).map(|i| {
            Position::new(crate::wrap_coord(center - i, tiles), center)
        }))
    }

    pub fn head(&self) -> Position {
        self.segments[0]
    }

    pub fn tail(&self) -> Position {
        self.segments[self.segments.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.segments.contains(&pos)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.segments.iter()
    }

    pub fn push_head(&mut self, pos: Position) {
        self.segments.push_front(pos);
    }

    /// Drop the last segment (the head is never removed)
    pub fn pop_tail(&mut self) -> Option<Position> {
        if self.segments.len() > 1 {
            self.segments.pop_back()
        } else {
            None
        }
    }
}

/// The bonus item. Worth extra points and grants invincibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ruby {
    pub pos: Position,
    /// Timestamp (ms) when the ruby appeared
    pub spawned_at: u64,
}

impl Ruby {
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.spawned_at)
    }

    pub fn is_expired(&self, now: u64, lifetime_ms: u64) -> bool {
        self.age(now) > lifetime_ms
    }
}

/// Session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulated yet
    #[default]
    NotStarted,
    /// Ticks are being applied
    Running,
    /// Frozen; timers are shifted on resume
    Paused,
    /// Run ended (collision or food timeout)
    GameOver,
}

/// What the head ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    SelfCollision,
    Obstacle,
}

/// Side-effect signals for audio and other collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Committed direction changed this tick
    Turned,
    AteFood,
    AteRuby,
    Died { cause: DeathCause },
    /// Food was not reached in time
    TimedOut,
    SpeedUp { interval_ms: u64 },
    ObstaclesRegenerated { cells: usize },
    ObstaclesCleared,
    RubySpawned,
    RubyExpired,
    InvincibilityEnded,
    /// Fired once per whole second while food time is running out
    LowTimeWarning { seconds_left: u64 },
    NewHighScore { score: u64 },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub snake: Snake,
    /// Direction applied on the last tick
    pub direction: Direction,
    /// Latest accepted input, committed at the start of the next tick
    pub pending_direction: Direction,
    pub food: Position,
    /// Timestamp (ms) of the current food's spawn; the timeout counts from here
    pub food_spawned_at: u64,
    pub ruby: Option<Ruby>,
    /// Score at the last ruby spawn roll that succeeded
    pub last_ruby_spawn_score: u64,
    /// Obstacle cells, all chains concatenated
    pub obstacles: Vec<Position>,
    pub score: u64,
    pub tick_interval_ms: u64,
    /// Doubles with every speed-up; also the obstacle chain count
    pub speed_multiplier: u32,
    /// End timestamp (ms) of invincibility, if active
    pub invincible_until: Option<u64>,
    /// Timestamp (ms) at which the current pause began
    pub paused_at: Option<u64>,
    /// Ticks applied this run
    pub time_ticks: u64,
    /// Signals emitted since the last drain
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a new game state with the given seed. Nothing runs until the
    /// session starts it.
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        let mut state = Self {
            seed,
            snake: Snake::spawn(tuning.tile_count),
            tick_interval_ms: tuning.base_tick_ms,
            tuning,
            phase: GamePhase::NotStarted,
            direction: Direction::Right,
            pending_direction: Direction::Right,
            food: Position::new(0, 0),
            food_spawned_at: 0,
            ruby: None,
            last_ruby_spawn_score: 0,
            obstacles: Vec::new(),
            score: 0,
            speed_multiplier: 1,
            invincible_until: None,
            paused_at: None,
            time_ticks: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        };
        placement::place_food(&mut state, 0);
        state
    }

    /// Fresh run: new snake and food, no obstacles or ruby, score 0, base speed.
    /// The RNG keeps its stream so consecutive runs differ.
    pub fn reset(&mut self, now: u64) {
        self.snake = Snake::spawn(self.tuning.tile_count);
        self.direction = Direction::Right;
        self.pending_direction = Direction::Right;
        self.ruby = None;
        self.obstacles.clear();
        self.last_ruby_spawn_score = 0;
        self.score = 0;
        self.tick_interval_ms = self.tuning.base_tick_ms;
        self.speed_multiplier = 1;
        self.invincible_until = None;
        self.paused_at = None;
        self.time_ticks = 0;
        self.events.clear();
        placement::place_food(self, now);
    }

    pub fn tiles(&self) -> i32 {
        self.tuning.tile_count
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Invincible at `now` (the end timestamp itself is no longer covered)
    pub fn is_invincible(&self, now: u64) -> bool {
        self.invincible_until.is_some_and(|end| now < end)
    }

    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.obstacles.contains(&pos)
    }

    pub fn is_ruby(&self, pos: Position) -> bool {
        self.ruby.is_some_and(|r| r.pos == pos)
    }

    /// Cells a moving head dies on (when not invincible)
    pub fn is_deadly(&self, pos: Position) -> bool {
        self.snake.contains(pos) || self.is_obstacle(pos)
    }

    /// Remaining food time (ms) as of `now`
    pub fn food_time_left(&self, now: u64) -> u64 {
        let elapsed = now.saturating_sub(self.food_spawned_at);
        self.tuning.food_timeout_ms.saturating_sub(elapsed)
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
