//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame scheduling and time
//! - Input events
//! - Storage (LocalStorage on web)

pub mod input;
pub mod scheduler;
pub mod storage;

pub use input::{HeldKeys, Key};
pub use scheduler::{FrameHost, FrameScheduler, FrameToken, ManualFrameHost};
pub use storage::{KeyValueStore, MemoryStore};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
