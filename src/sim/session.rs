//! Session controller
//!
//! Owns the [`GameState`] and drives it through its lifecycle:
//! `NotStarted -> Running <-> Paused`, `Running -> GameOver -> Running`.
//! The host calls [`Session::frame`] once per display refresh; the session
//! decides whether a tick is due.

use super::autopilot;
use super::snapshot::Snapshot;
use super::state::{Direction, GameEvent, GamePhase, GameState};
use super::tick::tick;
use crate::platform::input::InputAction;
use crate::tuning::Tuning;

/// Persistent best-score cell
pub trait ScoreStore {
    fn load(&self) -> u64;
    fn save(&mut self, score: u64);
}

/// One player's game session
pub struct Session<S: ScoreStore> {
    state: GameState,
    store: S,
    high_score: u64,
    /// Timestamp (ms) of the last applied tick
    last_tick_at: Option<u64>,
    /// Last whole second announced by the low-time warning
    last_warning_second: Option<u64>,
    /// Cleared by `stop`, pause and game over; stale frames become no-ops
    loop_active: bool,
    autopilot: bool,
}

impl<S: ScoreStore> Session<S> {
    pub fn new(seed: u64, tuning: Tuning, store: S) -> Self {
        let high_score = store.load();
        log::info!("Session created (seed {seed}, best {high_score})");
        Self {
            state: GameState::new(seed, tuning),
            store,
            high_score,
            last_tick_at: None,
            last_warning_second: None,
            loop_active: false,
            autopilot: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_loop_active(&self) -> bool {
        self.loop_active
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        if self.autopilot != enabled {
            log::info!("Autopilot {}", if enabled { "on" } else { "off" });
        }
        self.autopilot = enabled;
    }

    /// Begin a fresh run. Only from `NotStarted` or `GameOver`.
    pub fn start(&mut self, now: u64) -> bool {
        if !matches!(self.state.phase, GamePhase::NotStarted | GamePhase::GameOver) {
            return false;
        }
        self.state.reset(now);
        self.state.phase = GamePhase::Running;
        self.last_tick_at = Some(now);
        self.last_warning_second = None;
        self.loop_active = true;
        log::info!("Game started");
        true
    }

    pub fn pause(&mut self, now: u64) -> bool {
        if self.state.phase != GamePhase::Running {
            return false;
        }
        self.state.phase = GamePhase::Paused;
        self.state.paused_at = Some(now);
        self.loop_active = false;
        log::debug!("Paused at {now}");
        true
    }

    /// Continue after a pause. Every deadline moves forward by the time spent
    /// paused, so pausing never eats into the food or ruby budget.
    ///
    /// Also re-arms a running session whose loop was stopped.
    pub fn resume(&mut self, now: u64) -> bool {
        match self.state.phase {
            GamePhase::Paused => {
                let paused_at = self.state.paused_at.take().unwrap_or(now);
                let paused_for = now.saturating_sub(paused_at);
                self.shift_timers(paused_for);
                self.state.phase = GamePhase::Running;
                self.loop_active = true;
                log::debug!("Resumed after {paused_for} ms");
                true
            }
            GamePhase::Running if !self.loop_active => {
                self.last_tick_at = Some(now);
                self.loop_active = true;
                true
            }
            _ => false,
        }
    }

    pub fn toggle_pause(&mut self, now: u64) -> bool {
        match self.state.phase {
            GamePhase::Running => self.pause(now),
            GamePhase::Paused => self.resume(now),
            _ => false,
        }
    }

    /// Buffer a direction for the next tick. Ignored unless running, and
    /// ignored if it would reverse the committed direction.
    pub fn set_direction(&mut self, dir: Direction) -> bool {
        if self.state.phase != GamePhase::Running || dir.is_reverse_of(self.state.direction) {
            return false;
        }
        self.state.pending_direction = dir;
        true
    }

    /// Route one input action. Returns false for actions that are not a
    /// session concern (mute, rules) or that did nothing.
    pub fn handle(&mut self, action: InputAction, now: u64) -> bool {
        match action {
            InputAction::Direction(dir) => self.set_direction(dir),
            InputAction::TogglePause => match self.state.phase {
                GamePhase::NotStarted | GamePhase::GameOver => self.start(now),
                _ => self.toggle_pause(now),
            },
            InputAction::Start => self.start(now),
            InputAction::ToggleAutopilot => {
                self.set_autopilot(!self.autopilot);
                true
            }
            InputAction::ToggleMute | InputAction::ToggleRules => false,
        }
    }

    /// Scheduler callback. Applies at most one tick, and only once the
    /// current tick interval has elapsed. Returns true if a tick ran.
    pub fn frame(&mut self, now: u64) -> bool {
        if !self.loop_active || self.state.phase != GamePhase::Running {
            return false;
        }

        let due = self
            .last_tick_at
            .is_none_or(|last| now.saturating_sub(last) >= self.state.tick_interval_ms);
        if due {
            if self.autopilot {
                let dir = autopilot::choose_direction(&self.state);
                self.set_direction(dir);
            }
            tick(&mut self.state, now);
            self.last_tick_at = Some(now);
            if self.state.phase == GamePhase::GameOver {
                self.finish();
                return true;
            }
        }

        self.check_low_time(now);
        due
    }

    /// Disarm the loop. Safe to call any number of times.
    pub fn stop(&mut self) {
        if self.loop_active {
            log::debug!("Loop stopped");
        }
        self.loop_active = false;
    }

    pub fn snapshot(&self, now: u64) -> Snapshot {
        Snapshot::capture(&self.state, self.high_score, now)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    fn shift_timers(&mut self, by: u64) {
        let state = &mut self.state;
        state.food_spawned_at = state.food_spawned_at.saturating_add(by);
        if let Some(end) = state.invincible_until.as_mut() {
            *end = end.saturating_add(by);
        }
        if let Some(ruby) = state.ruby.as_mut() {
            ruby.spawned_at = ruby.spawned_at.saturating_add(by);
        }
        if let Some(last) = self.last_tick_at.as_mut() {
            *last = last.saturating_add(by);
        }
    }

    fn finish(&mut self) {
        self.loop_active = false;
        let score = self.state.score;
        log::info!("Game over, score {score} (best {})", self.high_score);
        if score > self.high_score {
            self.high_score = score;
            self.store.save(score);
            log::info!("New high score: {score}");
            self.state.emit(GameEvent::NewHighScore { score });
        }
    }

    /// One warning per whole second while food time is running low
    fn check_low_time(&mut self, now: u64) {
        let left = self.state.food_time_left(now);
        if left == 0 || left > self.state.tuning.low_time_warning_ms {
            self.last_warning_second = None;
            return;
        }
        let seconds_left = left.div_ceil(1000);
        if self.last_warning_second != Some(seconds_left) {
            self.last_warning_second = Some(seconds_left);
            self.state.emit(GameEvent::LowTimeWarning { seconds_left });
        }
    }
}
