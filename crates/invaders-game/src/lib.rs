//! Invaders game crate.
//!
//! Gameplay sits on top of `invaders-engine`: entities and the systems that move
//! and collide them, the state machine (attract, insert-coin, play), the run
//! session, the high-score client and the windowed app that renders it all.

pub mod config;
pub mod entity;
pub mod scores;
pub mod session;
pub mod states;
pub mod systems;

mod app;
mod game;

pub use app::InvadersApp;
pub use config::GameConfig;
pub use game::Game;
pub use session::{Outcome, RunSummary, Session, SessionObserver};
