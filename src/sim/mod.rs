//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-normalized timestep only
//! - Seeded Mulberry32 draws only, in a fixed order
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod physics;
pub mod rng;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Aabb, Collision};
pub use rng::Mulberry32;
pub use spawn::{SpawnLayout, SpawnResult, Spawner};
pub use state::{Collectible, Difficulty, GamePhase, GameState, Obstacle, Player};
pub use tick::{TickEvents, advance};
