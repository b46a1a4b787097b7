//! Per-frame simulation step
//!
//! Order within a frame: player physics, world scroll, spawn, then
//! boundary, obstacle, scoring and pickup checks. A terminal collision ends
//! the frame before scoring.

use serde::{Deserialize, Serialize};

use super::collision::{
    Collision, check_bounds, check_obstacles, collect_pickups, player_hitbox, player_pickup_box,
    score_passed,
};
use super::physics::{integrate_player, scroll_world};
use super::spawn::{SpawnLayout, SpawnResult};
use super::state::{GamePhase, GameState};
use crate::normalize_frame_delta;

/// What happened during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickEvents {
    /// The run ended this frame
    pub collided: bool,
    /// Cause of the collision, if any
    pub collision: Option<Collision>,
    /// Obstacles passed this frame
    pub scored: u32,
    /// Collectibles gathered this frame
    pub collected: u32,
}

/// Advance the world by one rendered frame of `delta_ms` milliseconds.
///
/// Safe to call in any phase; only `Playing` changes anything.
pub fn advance(state: &mut GameState, delta_ms: f64) -> TickEvents {
    let mut events = TickEvents::default();
    if state.phase != GamePhase::Playing {
        return events;
    }

    let dt = normalize_frame_delta(
        delta_ms,
        state.config.frame_baseline_ms,
        state.config.max_frame_step,
    );
    if dt > 0.0 {
        state.clock_ms += delta_ms;
    }
    state.time_ticks += 1;

    integrate_player(&mut state.player, &state.config, dt);

    let distance = state.difficulty.speed * dt;
    let culled = scroll_world(
        &mut state.obstacles,
        &mut state.collectibles,
        distance,
        &state.config,
    );
    if culled > 0 {
        log::debug!("Culled {} off-screen entities", culled);
    }
    state.ground_offset += distance;

    let layout = SpawnLayout {
        config: &state.config,
        viewport: state.viewport,
        gap_size: state.difficulty.gap_size,
    };
    if let SpawnResult::Spawned {
        obstacle,
        collectible,
    } = state
        .spawner
        .poll(state.clock_ms, state.rng.as_mut(), layout)
    {
        state.obstacles.push(obstacle);
        state.collectibles.extend(collectible);
    }

    let hitbox = player_hitbox(&state.player, &state.config);
    let collision = check_bounds(&hitbox, state.config.ground_line(state.viewport)).or_else(|| {
        check_obstacles(
            &hitbox,
            &state.obstacles,
            state.difficulty.gap_size,
            &state.config,
        )
    });
    if let Some(collision) = collision {
        state.phase = GamePhase::GameOver;
        log::info!(
            "Game over at tick {} ({:?}), score {}, collectibles {}",
            state.time_ticks,
            collision,
            state.score,
            state.collectible_score
        );
        events.collided = true;
        events.collision = Some(collision);
        return events;
    }

    let anchor_x = state.player_anchor_x();
    events.scored = score_passed(
        &mut state.obstacles,
        anchor_x,
        &mut state.score,
        &mut state.difficulty,
        &state.config,
    );

    let pickup_box = player_pickup_box(&state.player, &state.config);
    events.collected = collect_pickups(&pickup_box, &mut state.collectibles, &state.config);
    state.collectible_score += events.collected;

    events
}

impl GameState {
    /// See [`advance`]
    pub fn advance(&mut self, delta_ms: f64) -> TickEvents {
        advance(self, delta_ms)
    }
}
