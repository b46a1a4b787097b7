//! Collision detection and scoring
//!
//! Everything is axis-aligned boxes. The player box is shrunk by the
//! configured padding for terminal collisions so grazing contact is
//! forgiven, but collectibles use the full box.

use serde::{Deserialize, Serialize};

use super::state::{Collectible, Difficulty, Obstacle, Player};
use crate::settings::GameConfig;

/// Axis-aligned bounding box in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Aabb {
    /// Square of side `size` centered on (`cx`, `cy`), shrunk by `padding`
    pub fn centered(cx: f64, cy: f64, size: f64, padding: f64) -> Self {
        let half = size / 2.0;
        Self {
            left: cx - half + padding,
            right: cx + half - padding,
            top: cy - half + padding,
            bottom: cy + half - padding,
        }
    }

    /// Strict overlap; touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.right > other.left
            && self.left < other.right
            && self.bottom > other.top
            && self.top < other.bottom
    }

    #[inline]
    pub fn overlaps_x(&self, left: f64, right: f64) -> bool {
        self.right > left && self.left < right
    }
}

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Collision {
    Ground,
    Ceiling,
    Obstacle { id: u32 },
}

/// Padded player hitbox used for terminal collisions
pub fn player_hitbox(player: &Player, config: &GameConfig) -> Aabb {
    Aabb::centered(
        player.pos.x,
        player.pos.y,
        config.player_size,
        config.collision_padding,
    )
}

/// Unpadded player box used for pickups
pub fn player_pickup_box(player: &Player, config: &GameConfig) -> Aabb {
    Aabb::centered(player.pos.x, player.pos.y, config.player_size, 0.0)
}

/// Ground and ceiling test. Touching either counts.
pub fn check_bounds(hitbox: &Aabb, ground_line: f64) -> Option<Collision> {
    if hitbox.bottom >= ground_line {
        return Some(Collision::Ground);
    }
    if hitbox.top <= 0.0 {
        return Some(Collision::Ceiling);
    }
    None
}

/// First obstacle (in spawn order) the hitbox is horizontally inside of
/// without fitting in the gap.
pub fn check_obstacles(
    hitbox: &Aabb,
    obstacles: &[Obstacle],
    gap_size: f64,
    config: &GameConfig,
) -> Option<Collision> {
    obstacles
        .iter()
        .filter(|o| hitbox.overlaps_x(o.x, o.x + config.obstacle_width))
        .find(|o| hitbox.top < o.gap_y || hitbox.bottom > o.gap_y + gap_size)
        .map(|o| Collision::Obstacle { id: o.id })
}

/// Mark obstacles whose right edge has crossed `anchor_x` as passed and
/// award one point each, stepping difficulty at every milestone.
/// Returns the points awarded.
pub fn score_passed(
    obstacles: &mut [Obstacle],
    anchor_x: f64,
    score: &mut u32,
    difficulty: &mut Difficulty,
    config: &GameConfig,
) -> u32 {
    let mut awarded = 0;
    for obstacle in obstacles.iter_mut() {
        if obstacle.passed || obstacle.x + config.obstacle_width >= anchor_x {
            continue;
        }
        obstacle.passed = true;
        *score += 1;
        awarded += 1;
        if difficulty.on_score(*score, config) {
            log::info!(
                "Difficulty up at score {}: gap={} speed={:.1}",
                score,
                difficulty.gap_size,
                difficulty.speed
            );
        }
    }
    awarded
}

/// Collect every uncollected collectible the pickup box overlaps.
/// Returns the number collected.
pub fn collect_pickups(
    pickup_box: &Aabb,
    collectibles: &mut [Collectible],
    config: &GameConfig,
) -> u32 {
    let mut collected = 0;
    for collectible in collectibles.iter_mut().filter(|c| !c.collected) {
        let coin = Aabb::centered(
            collectible.pos.x,
            collectible.pos.y,
            config.collectible_size,
            0.0,
        );
        if pickup_box.overlaps(&coin) {
            collectible.collected = true;
            collected += 1;
        }
    }
    collected
}
