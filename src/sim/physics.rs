//! Player integration and world scroll
//!
//! `dt` is in frames: 1.0 is one 60 fps frame. Gravity and speeds are tuned
//! per frame, not per second.

use super::state::{Collectible, Obstacle, Player};
use crate::consts::{MAX_ROTATION, MIN_ROTATION, ROTATION_PER_VELOCITY};
use crate::settings::GameConfig;

/// Integrate gravity into velocity, then velocity into position
pub fn integrate_player(player: &mut Player, config: &GameConfig, dt: f64) {
    player.vel.y += config.gravity * dt;
    player.pos.y += player.vel.y * dt;
    player.rotation = tilt_for_velocity(player.vel.y);
}

/// Visual tilt (degrees) for a vertical velocity
#[inline]
pub fn tilt_for_velocity(vel_y: f64) -> f64 {
    (vel_y * ROTATION_PER_VELOCITY).clamp(MIN_ROTATION, MAX_ROTATION)
}

/// Replace any accumulated fall speed with the jump impulse
pub fn jump(player: &mut Player, config: &GameConfig) {
    player.vel.y = config.jump_velocity;
}

/// Scroll obstacles and collectibles left by `distance`, dropping those that
/// are fully off-screen. Returns the number of entities removed.
pub fn scroll_world(
    obstacles: &mut Vec<Obstacle>,
    collectibles: &mut Vec<Collectible>,
    distance: f64,
    config: &GameConfig,
) -> usize {
    let before = obstacles.len() + collectibles.len();

    for obstacle in obstacles.iter_mut() {
        obstacle.x -= distance;
    }
    obstacles.retain(|o| o.x > -config.obstacle_width);

    for collectible in collectibles.iter_mut() {
        collectible.pos.x -= distance;
    }
    collectibles.retain(|c| c.pos.x > -config.collectible_size);

    before - obstacles.len() - collectibles.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Viewport;
    use glam::DVec2;

    #[test]
    fn test_gravity_integration() {
        let config = GameConfig::default();
        let mut player = Player::spawn(Viewport::new(400.0, 600.0));
        integrate_player(&mut player, &config, 1.0);
        assert_eq!(player.vel.y, 0.6);
        assert_eq!(player.pos.y, 300.6);
        integrate_player(&mut player, &config, 1.0);
        assert_eq!(player.vel.y, 1.2);
        assert!((player.pos.y - 301.8).abs() < 1e-9);
        assert_eq!(player.pos.x, 400.0 / 3.0);
        assert_eq!(player.vel.x, 0.0);
    }

    #[test]
    fn test_tilt_clamps() {
        assert_eq!(tilt_for_velocity(-10.0), -30.0);
        assert_eq!(tilt_for_velocity(5.0), 15.0);
        assert_eq!(tilt_for_velocity(40.0), 90.0);
    }

    #[test]
    fn test_jump_overrides_fall() {
        let config = GameConfig::default();
        let mut player = Player::spawn(Viewport::default());
        player.vel.y = 14.0;
        jump(&mut player, &config);
        assert_eq!(player.vel.y, -10.0);
        integrate_player(&mut player, &config, 1.0);
        assert_eq!(player.vel.y, -9.4);
        assert_eq!(player.rotation, -28.200000000000003);
    }

    #[test]
    fn test_scroll_removes_offscreen() {
        let config = GameConfig::default();
        let mut obstacles = vec![
            Obstacle { id: 0, x: -57.0, gap_y: 100.0, passed: true, has_collectible: false },
            Obstacle { id: 1, x: 200.0, gap_y: 120.0, passed: false, has_collectible: true },
        ];
        let mut collectibles = vec![Collectible {
            id: 0,
            pos: DVec2::new(-18.0, 200.0),
            collected: false,
        }];

        let removed = scroll_world(&mut obstacles, &mut collectibles, 3.0, &config);
        assert_eq!(removed, 2);
        assert_eq!(obstacles.len(), 1);
        assert_eq!(obstacles[0].id, 1);
        assert_eq!(obstacles[0].x, 197.0);
        assert!(collectibles.is_empty());
    }
}
