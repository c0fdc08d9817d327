//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Runtime code is responsible for translating platform events into `InputEvent`s.

mod handler;
pub(crate) mod platform;
mod types;

pub use handler::InputHandler;
pub use types::{InputEvent, Key, KeyState};
