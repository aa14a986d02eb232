//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (`now_ms`, run seeds)
//! - Input events (keys and on-screen buttons)
//! - Storage (LocalStorage on web, files on native)

pub mod input;
pub mod storage;
pub mod time;

pub use input::{InputAction, map_button, map_key};
pub use storage::{KeyValueStore, MemoryStorage, StorageError, open_default};
pub use time::{clock_seed, now_ms};
