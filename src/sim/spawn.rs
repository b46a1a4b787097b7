//! Obstacle and collectible generation
//!
//! Draw order per spawn is fixed and part of the seed contract:
//! `range(gap)`, `next()` (collectible roll), then `range(jitter)` only when
//! the roll produced a collectible.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::rng::Mulberry32;
use super::state::{Collectible, Obstacle};
use crate::settings::{GameConfig, Viewport};

/// Spawn timer and per-session id counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Spawner {
    /// Clock value of the last spawn attempt; unset until the first tick
    last_spawn_ms: Option<f64>,
    next_obstacle_id: u32,
    next_collectible_id: u32,
}

/// Inputs a spawn depends on besides the PRNG
#[derive(Debug, Clone, Copy)]
pub struct SpawnLayout<'a> {
    pub config: &'a GameConfig,
    pub viewport: Viewport,
    /// Current difficulty-adjusted gap size
    pub gap_size: f64,
}

/// Outcome of one generator poll
#[derive(Debug, Clone, PartialEq)]
pub enum SpawnResult {
    /// Interval has not elapsed
    NotDue,
    /// Interval elapsed but no seed is installed
    Unseeded,
    /// Interval elapsed but the viewport cannot fit a gap
    Degenerate,
    Spawned {
        obstacle: Obstacle,
        collectible: Option<Collectible>,
    },
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn last_spawn_ms(&self) -> Option<f64> {
        self.last_spawn_ms
    }

    /// True when more than `interval_ms` has elapsed since the last spawn
    pub fn is_due(&self, now_ms: f64, interval_ms: f64) -> bool {
        match self.last_spawn_ms {
            None => true,
            Some(last) => now_ms - last > interval_ms,
        }
    }

    /// Poll the generator once. The timer restarts whenever the interval has
    /// elapsed, even if nothing could be spawned.
    pub fn poll(
        &mut self,
        now_ms: f64,
        rng: Option<&mut Mulberry32>,
        layout: SpawnLayout<'_>,
    ) -> SpawnResult {
        if !self.is_due(now_ms, layout.config.spawn_interval_ms) {
            return SpawnResult::NotDue;
        }
        self.last_spawn_ms = Some(now_ms);

        let Some(rng) = rng else {
            return SpawnResult::Unseeded;
        };

        let Some((min_gap_y, max_gap_y)) = layout
            .config
            .playable_gap_range(layout.viewport, layout.gap_size)
        else {
            log::warn!(
                "Skipping spawn: viewport height {} cannot fit gap {}",
                layout.viewport.height,
                layout.gap_size
            );
            return SpawnResult::Degenerate;
        };

        let gap_y = rng.range(min_gap_y, max_gap_y);
        let has_collectible = rng.next_f64() < layout.config.collectible_probability;

        let obstacle = Obstacle {
            id: self.next_obstacle_id,
            x: layout.viewport.width,
            gap_y,
            passed: false,
            has_collectible,
        };
        self.next_obstacle_id += 1;

        let collectible = if has_collectible {
            let jitter = layout.config.collectible_jitter;
            let offset = rng.range(-jitter, jitter);
            let collectible = Collectible {
                id: self.next_collectible_id,
                pos: DVec2::new(
                    layout.viewport.width + layout.config.obstacle_width / 2.0,
                    gap_y + layout.gap_size / 2.0 + offset,
                ),
                collected: false,
            };
            self.next_collectible_id += 1;
            Some(collectible)
        } else {
            None
        };

        log::debug!(
            "Spawned obstacle {} gap_y={:.2} collectible={}",
            obstacle.id,
            gap_y,
            has_collectible
        );

        SpawnResult::Spawned {
            obstacle,
            collectible,
        }
    }
}
