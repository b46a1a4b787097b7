use chrono::{TimeZone, Utc};

use shuttle_flap::seed::{self, Cadence};
use shuttle_flap::session::{InputAction, Session};
use shuttle_flap::sim::{Collision, GamePhase, GameState};
use shuttle_flap::{GameConfig, Viewport};

const FRAME_MS: f64 = 16.67;
const EXPLICIT_SEED: u64 = 100_000_000_042;

#[test]
fn deterministic_replay_produces_expected_outcome() {
    let first = replay(EXPLICIT_SEED, None, 600);
    let second = replay(EXPLICIT_SEED, None, 600);

    assert_eq!(first, second, "replay diverged between runs");

    assert_eq!(first.frames, 25, "free fall should hit the ground on frame 25");
    assert_eq!(first.collision, Some(Collision::Ground));
    assert_eq!(first.score, 0);
    assert_eq!(first.final_y, 495.0);

    let spawn = first.spawns.first().expect("first frame spawns an obstacle");
    assert_eq!(spawn.frame, 1);
    assert_eq!(spawn.gap_y, 117.46301456354558);
    assert!(!spawn.has_collectible);
}

#[test]
fn deterministic_replay_with_input_matches_between_runs() {
    let first = replay(EXPLICIT_SEED, Some(18), 3600);
    let second = replay(EXPLICIT_SEED, Some(18), 3600);

    assert_eq!(first, second, "replay diverged between runs");
    assert!(first.frames > 25, "jumping should outlast free fall");
    assert!(!first.spawns.is_empty());
}

#[test]
fn different_seeds_produce_different_layouts() {
    let at = Utc.with_ymd_and_hms(2026, 1, 22, 8, 0, 0).unwrap();
    let explicit = replay(EXPLICIT_SEED, None, 600);
    let hourly = replay(Cadence::Hourly.seed_at(at), None, 600);

    assert_ne!(explicit.spawns[0].gap_y, hourly.spawns[0].gap_y);
}

#[test]
fn difficulty_never_eases_during_a_run() {
    let config = GameConfig::default();
    let mut state = GameState::new(Viewport::new(400.0, 600.0), config.clone());
    state.start_session(seed::to_prng_seed(EXPLICIT_SEED));

    let mut gap = state.difficulty.gap_size;
    let mut speed = state.difficulty.speed;
    for frame in 0..3600u32 {
        if frame % 18 == 0 {
            state.jump();
        }
        let events = state.advance(FRAME_MS);
        assert!(state.difficulty.gap_size <= gap);
        assert!(state.difficulty.speed >= speed);
        assert!(state.difficulty.gap_size >= config.gap_size_min);
        assert!(state.difficulty.speed <= config.scroll_speed_max);
        gap = state.difficulty.gap_size;
        speed = state.difficulty.speed;
        if events.collided {
            break;
        }
    }
}

#[test]
fn session_run_matches_raw_state_replay() {
    let at = Utc.with_ymd_and_hms(2026, 1, 22, 8, 15, 0).unwrap();
    let mut session = Session::new(Viewport::new(400.0, 600.0), GameConfig::default());
    assert_eq!(session.press(at), InputAction::Started);

    let mut frames = 0;
    while !session.advance(FRAME_MS).collided {
        frames += 1;
        assert!(frames < 600, "session never ended");
    }
    assert_eq!(session.phase(), GamePhase::GameOver);

    let raw = replay(103_996_151_886, None, 600);
    assert_eq!(frames + 1, raw.frames);
    assert_eq!(session.state.score, raw.score);
    assert_eq!(session.state.player.pos.y, raw.final_y);
}

#[derive(Debug, PartialEq)]
struct SpawnRecord {
    frame: u32,
    gap_y: f64,
    has_collectible: bool,
    collectible_y: Option<f64>,
}

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    frames: u32,
    collision: Option<Collision>,
    score: u32,
    collectible_score: u32,
    final_y: f64,
    spawns: Vec<SpawnRecord>,
}

fn replay(seed_value: u64, jump_every: Option<u32>, max_frames: u32) -> ReplayOutcome {
    let mut state = GameState::new(Viewport::new(400.0, 600.0), GameConfig::default());
    state.start_session(seed::to_prng_seed(seed_value));

    let mut spawns = Vec::new();
    let mut seen_obstacles = 0;
    let mut frames = 0;
    let mut collision = None;

    while frames < max_frames {
        if jump_every.is_some_and(|every| frames % every == 0) {
            state.jump();
        }
        let events = state.advance(FRAME_MS);
        frames += 1;

        let threshold = seen_obstacles;
        for obstacle in state.obstacles.iter().filter(|o| o.id >= threshold) {
            // A collectible is pushed right after its obstacle
            let collectible_y = obstacle
                .has_collectible
                .then(|| state.collectibles.last())
                .flatten()
                .map(|c| c.pos.y);
            spawns.push(SpawnRecord {
                frame: frames,
                gap_y: obstacle.gap_y,
                has_collectible: obstacle.has_collectible,
                collectible_y,
            });
            seen_obstacles = obstacle.id + 1;
        }

        if events.collided {
            collision = events.collision;
            break;
        }
    }

    ReplayOutcome {
        frames,
        collision,
        score: state.score,
        collectible_score: state.collectible_score,
        final_y: state.player.pos.y,
        spawns,
    }
}
