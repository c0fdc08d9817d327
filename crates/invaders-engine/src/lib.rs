//! Invaders engine crate.
//!
//! Owns the platform, GPU and audio runtime pieces the game is built on:
//! graphics context, shader programs, textures, sprite batching, the CRT
//! post-process, synthesized audio, keyboard input and the frame loop.

pub mod audio;
pub mod core;
pub mod device;
pub mod input;
pub mod time;
pub mod window;

pub mod coords;
pub mod logging;
pub mod render;

mod error;

pub use error::{RenderError, ShaderStage};
