//! Input mapping
//!
//! Raw keyboard keys and on-screen button ids become [`InputAction`]s; the
//! session decides what each action means in the current phase.

use crate::sim::state::Direction;

/// Discrete player intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Direction(Direction),
    /// Space: start, pause or resume depending on phase
    TogglePause,
    /// Start or restart a run
    Start,
    ToggleMute,
    /// Show/hide the rules panel
    ToggleRules,
    /// Let the game play itself
    ToggleAutopilot,
}

impl InputAction {
    /// Direction intents are the only actions the browser should not scroll on
    pub fn is_direction(self) -> bool {
        matches!(self, InputAction::Direction(_))
    }
}

/// Map a `KeyboardEvent.key` value
pub fn map_key(key: &str) -> Option<InputAction> {
    let action = match key {
        "ArrowUp" | "w" | "W" => InputAction::Direction(Direction::Up),
        "ArrowDown" | "s" | "S" => InputAction::Direction(Direction::Down),
        "ArrowLeft" | "a" | "A" => InputAction::Direction(Direction::Left),
        "ArrowRight" | "d" | "D" => InputAction::Direction(Direction::Right),
        // Older browsers report "Spacebar"
        " " | "Spacebar" => InputAction::TogglePause,
        "m" | "M" => InputAction::ToggleMute,
        "r" | "R" => InputAction::ToggleRules,
        "i" | "I" => InputAction::ToggleAutopilot,
        "Enter" => InputAction::Start,
        _ => return None,
    };
    Some(action)
}

/// Map an on-screen control button by element id
pub fn map_button(id: &str) -> Option<InputAction> {
    let action = match id {
        "btn-up" => InputAction::Direction(Direction::Up),
        "btn-down" => InputAction::Direction(Direction::Down),
        "btn-left" => InputAction::Direction(Direction::Left),
        "btn-right" => InputAction::Direction(Direction::Right),
        "btn-pause" => InputAction::TogglePause,
        "btn-mute" => InputAction::ToggleMute,
        _ => return None,
    };
    Some(action)
}

/// Ids of every button [`map_button`] understands
pub const BUTTON_IDS: [&str; 6] = [
    "btn-up",
    "btn-down",
    "btn-left",
    "btn-right",
    "btn-pause",
    "btn-mute",
];
