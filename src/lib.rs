//! Shuttle Flap - deterministic core of a flappy-style arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (PRNG, spawning, physics, collisions, game state)
//! - `seed`: UTC time-window seed derivation (hourly, daily, weekly)
//! - `session`: Session orchestration (normal runs, ticket-gated weekly runs, countdown)
//! - `ticket`: Categorized failures of the external ticket check/use steps
//! - `settings`: Data-driven game balance
//! - `platform`: Logging bootstrap and browser bindings

pub mod platform;
pub mod seed;
pub mod session;
pub mod settings;
pub mod sim;
pub mod ticket;

pub use session::{GameMode, Session, SessionError};
pub use settings::{ConfigError, GameConfig, Viewport};
pub use sim::{GamePhase, GameState, TickEvents};
pub use ticket::{TicketError, TicketErrorKind, TicketFailure, TicketStage};

/// Game configuration constants
pub mod consts {
    /// Frame duration the physics constants are tuned for (60 fps)
    pub const FRAME_BASELINE_MS: f64 = 16.67;
    /// Upper bound on the normalized frame step (tolerates dropped frames)
    pub const MAX_FRAME_STEP: f64 = 2.0;

    /// Player physics
    pub const GRAVITY: f64 = 0.6;
    pub const JUMP_VELOCITY: f64 = -10.0;
    pub const PLAYER_SIZE: f64 = 40.0;
    /// Hitbox shrink on every side for obstacle and boundary tests
    pub const COLLISION_PADDING: f64 = 5.0;
    /// Visual tilt limits (degrees)
    pub const MIN_ROTATION: f64 = -30.0;
    pub const MAX_ROTATION: f64 = 90.0;
    pub const ROTATION_PER_VELOCITY: f64 = 3.0;

    /// Obstacles
    pub const OBSTACLE_WIDTH: f64 = 60.0;
    pub const GAP_SIZE: f64 = 180.0;
    pub const GAP_SIZE_MIN: f64 = 120.0;
    /// Keep-out margin above and below the gap draw range
    pub const GAP_MARGIN: f64 = 100.0;
    pub const SPAWN_INTERVAL_MS: f64 = 1500.0;

    /// World scroll
    pub const SCROLL_SPEED: f64 = 3.0;
    pub const SCROLL_SPEED_MAX: f64 = 6.0;
    pub const GROUND_HEIGHT: f64 = 100.0;

    /// Collectibles
    pub const COLLECTIBLE_SIZE: f64 = 20.0;
    pub const COLLECTIBLE_PROBABILITY: f64 = 0.25;
    /// Vertical jitter around the gap center
    pub const COLLECTIBLE_JITTER: f64 = 30.0;

    /// Difficulty ramp: one step every N points
    pub const DIFFICULTY_STEP_SCORE: u32 = 5;
    pub const GAP_DECREMENT: f64 = 10.0;
    pub const SPEED_INCREMENT: f64 = 0.3;

    /// Weekly challenge countdown (seconds)
    pub const COUNTDOWN_SECONDS: u8 = 3;

    /// Original browser viewport
    pub const DEFAULT_WIDTH: f64 = 400.0;
    pub const DEFAULT_HEIGHT: f64 = 600.0;
}

/// Normalize a raw frame delta (ms) to simulation steps.
///
/// One step equals one 60 fps frame; the result is capped so a long stall
/// never advances the world more than `max_step` frames at once.
#[inline]
pub fn normalize_frame_delta(delta_ms: f64, baseline_ms: f64, max_step: f64) -> f64 {
    if !delta_ms.is_finite() || delta_ms <= 0.0 {
        return 0.0;
    }
    (delta_ms / baseline_ms).min(max_step)
}
