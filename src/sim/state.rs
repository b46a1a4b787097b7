//! Game state and core simulation types
//!
//! One `GameState` is one world. Everything a renderer needs each frame is
//! public and serializable; the PRNG and spawner travel with it so that a
//! snapshot fully determines the rest of the session.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::rng::Mulberry32;
use super::spawn::Spawner;
use crate::settings::{GameConfig, Viewport};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    /// Waiting for a start action
    Ready,
    /// Ticket-gated start: seed installed, waiting for the 3-2-1 countdown
    Countdown,
    /// Active gameplay
    Playing,
    /// Run ended by a collision
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Ready => "ready",
            GamePhase::Countdown => "countdown",
            GamePhase::Playing => "playing",
            GamePhase::GameOver => "gameOver",
        }
    }
}

/// The player object. Only the vertical axis is simulated; the world scrolls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: DVec2,
    pub vel: DVec2,
    /// Visual tilt in degrees, derived from vertical velocity
    pub rotation: f64,
}

impl Player {
    /// Player at rest at its anchor (one third across, half way down)
    pub fn spawn(viewport: Viewport) -> Self {
        Self {
            pos: DVec2::new(viewport.player_anchor_x(), viewport.height / 2.0),
            vel: DVec2::ZERO,
            rotation: 0.0,
        }
    }
}

/// A paired upper/lower barrier with a vertical gap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f64,
    /// Top of the gap
    pub gap_y: f64,
    /// Set once the trailing edge crosses the player anchor
    pub passed: bool,
    pub has_collectible: bool,
}

/// A coin placed inside an obstacle's gap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    /// Center point
    pub pos: DVec2,
    pub collected: bool,
}

/// Gap size and scroll speed, tightened every few points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub gap_size: f64,
    pub speed: f64,
}

impl Difficulty {
    pub fn initial(config: &GameConfig) -> Self {
        Self {
            gap_size: config.gap_size,
            speed: config.scroll_speed,
        }
    }

    /// One ramp step: shrink the gap toward its floor, raise speed toward its cap
    pub fn step(&mut self, config: &GameConfig) {
        self.gap_size = (self.gap_size - config.gap_decrement).max(config.gap_size_min);
        self.speed = (self.speed + config.speed_increment).min(config.scroll_speed_max);
    }

    /// Apply the ramp if `score` just reached a milestone. Returns true if stepped.
    pub fn on_score(&mut self, score: u32, config: &GameConfig) -> bool {
        if score > 0 && score.is_multiple_of(config.difficulty_step_score) {
            self.step(config);
            true
        } else {
            false
        }
    }
}

/// Complete world state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Balance parameters (not part of snapshots)
    #[serde(skip)]
    pub config: GameConfig,
    pub viewport: Viewport,
    /// Seed of the active session, if one was ever installed
    pub seed: Option<u32>,
    pub phase: GamePhase,
    pub player: Player,
    /// Active obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Active collectibles in spawn order
    pub collectibles: Vec<Collectible>,
    pub difficulty: Difficulty,
    /// Obstacles passed
    pub score: u32,
    /// Collectibles gathered
    pub collectible_score: u32,
    /// Unbounded ground scroll; renderers wrap it to the viewport width
    pub ground_offset: f64,
    /// Simulated clock: sum of frame deltas while playing (ms)
    pub clock_ms: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) rng: Option<Mulberry32>,
    pub(crate) spawner: Spawner,
}

impl GameState {
    /// Fresh world in `Ready` with no seed installed
    pub fn new(viewport: Viewport, config: GameConfig) -> Self {
        Self {
            difficulty: Difficulty::initial(&config),
            config,
            viewport,
            seed: None,
            phase: GamePhase::Ready,
            player: Player::spawn(viewport),
            obstacles: Vec::new(),
            collectibles: Vec::new(),
            score: 0,
            collectible_score: 0,
            ground_offset: 0.0,
            clock_ms: 0.0,
            time_ticks: 0,
            rng: None,
            spawner: Spawner::new(),
        }
    }

    /// Install a seed and begin playing immediately
    pub fn start_session(&mut self, seed: u32) {
        self.prepare(seed);
        self.phase = GamePhase::Playing;
        log::info!("Session started (seed {})", seed);
    }

    /// Install a seed and park in `Countdown` until [`GameState::play`]
    pub fn prepare_session(&mut self, seed: u32) {
        self.prepare(seed);
        self.phase = GamePhase::Countdown;
        log::info!("Session prepared for countdown (seed {})", seed);
    }

    fn prepare(&mut self, seed: u32) {
        match self.rng.as_mut() {
            Some(rng) => rng.set_seed(seed),
            None => self.rng = Some(Mulberry32::new(seed)),
        }
        self.seed = Some(seed);
        self.reset_world();
    }

    /// Enter `Playing` from `Ready` or `Countdown` without reseeding.
    /// Returns false if the phase does not allow it.
    pub fn play(&mut self) -> bool {
        match self.phase {
            GamePhase::Ready | GamePhase::Countdown => {
                self.phase = GamePhase::Playing;
                true
            }
            _ => {
                log::warn!("play() ignored in phase {}", self.phase.as_str());
                false
            }
        }
    }

    /// Clear the world back to `Ready`. The PRNG keeps its state until the
    /// next seed is installed.
    pub fn reset_session(&mut self) {
        self.reset_world();
        self.phase = GamePhase::Ready;
    }

    /// End an active run. Returns false if nothing was playing.
    pub fn end_session(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::GameOver;
        log::info!(
            "Session ended (score {}, collectibles {})",
            self.score,
            self.collectible_score
        );
        true
    }

    fn reset_world(&mut self) {
        self.player = Player::spawn(self.viewport);
        self.obstacles.clear();
        self.collectibles.clear();
        self.difficulty = Difficulty::initial(&self.config);
        self.score = 0;
        self.collectible_score = 0;
        self.ground_offset = 0.0;
        self.clock_ms = 0.0;
        self.time_ticks = 0;
        self.spawner.reset();
    }

    /// Apply the jump impulse. No-op unless playing.
    pub fn jump(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        super::physics::jump(&mut self.player, &self.config);
        true
    }

    /// Change the playfield size. The player is re-anchored only while idle.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if self.phase == GamePhase::Ready {
            self.player = Player::spawn(viewport);
        }
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// True once a seed has been installed
    pub fn is_seeded(&self) -> bool {
        self.rng.is_some()
    }

    /// Read-only view for renderers
    pub fn snapshot(&self) -> &Self {
        self
    }

    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Player anchor x; obstacles score once their right edge is left of it
    pub fn player_anchor_x(&self) -> f64 {
        self.viewport.player_anchor_x()
    }
}
