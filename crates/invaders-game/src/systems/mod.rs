//! Per-frame gameplay systems: movement, collision and arcade feel.

mod arcade;
mod collision;
mod movement;

pub use arcade::ArcadeSystems;
pub use collision::collides;
pub use movement::integrate;
