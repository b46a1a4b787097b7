//! Shuttle Flap entry point
//!
//! On the web the game is driven from JS through `platform::web`. Natively
//! this binary runs a headless session for replaying a seed and prints the
//! outcome as JSON.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use anyhow::{Context, Result, bail};
    use chrono::{DateTime, Utc};
    use clap::{Parser, ValueEnum};
    use serde::Serialize;

    use shuttle_flap::seed::{self, Cadence};
    use shuttle_flap::sim::{Collision, GamePhase, GameState};
    use shuttle_flap::{GameConfig, Viewport, consts, platform};

    #[derive(Debug, Clone, Copy, ValueEnum)]
    enum CadenceArg {
        Hourly,
        Daily,
        Weekly,
    }

    impl From<CadenceArg> for Cadence {
        fn from(arg: CadenceArg) -> Self {
            match arg {
                CadenceArg::Hourly => Cadence::Hourly,
                CadenceArg::Daily => Cadence::Daily,
                CadenceArg::Weekly => Cadence::Weekly,
            }
        }
    }

    #[derive(Parser, Debug)]
    #[command(author, version, about = "Shuttle Flap headless runner", long_about = None)]
    struct Args {
        /// Explicit 12-digit seed; overrides --cadence
        #[arg(long)]
        seed: Option<u64>,

        /// Derive the seed from the current time window
        #[arg(long, value_enum, default_value = "hourly")]
        cadence: CadenceArg,

        /// RFC 3339 timestamp to derive the seed at instead of now
        #[arg(long)]
        at: Option<String>,

        #[arg(long, default_value_t = consts::DEFAULT_WIDTH)]
        width: f64,

        #[arg(long, default_value_t = consts::DEFAULT_HEIGHT)]
        height: f64,

        /// Maximum number of frames to simulate
        #[arg(long, default_value_t = 3600)]
        frames: u32,

        /// Frame duration in milliseconds
        #[arg(long, default_value_t = consts::FRAME_BASELINE_MS)]
        delta: f64,

        /// Jump every N frames (0 never jumps)
        #[arg(long, default_value_t = 0)]
        jump_every: u32,

        /// JSON file with config overrides
        #[arg(long)]
        config: Option<std::path::PathBuf>,
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Summary {
        seed: u64,
        seed_key: Option<String>,
        frames: u32,
        phase: GamePhase,
        collision: Option<Collision>,
        score: u32,
        collectible_score: u32,
        gap_size: f64,
        speed: f64,
    }

    fn load_config(args: &Args) -> Result<GameConfig> {
        let Some(path) = &args.config else {
            return Ok(GameConfig::default());
        };
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = GameConfig::from_json(&json)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    fn resolve_seed(args: &Args) -> Result<(u64, Option<String>)> {
        if let Some(seed) = args.seed {
            return Ok((seed, None));
        }
        let at: DateTime<Utc> = match &args.at {
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .with_context(|| format!("invalid --at timestamp `{}`", raw))?
                .with_timezone(&Utc),
            None => platform::now_utc(),
        };
        let cadence = Cadence::from(args.cadence);
        Ok((cadence.seed_at(at), Some(cadence.key(at))))
    }

    pub fn run() -> Result<()> {
        platform::init_logging();
        let args = Args::parse();

        if args.width <= 0.0 || args.height <= 0.0 {
            bail!("viewport must be positive, got {}x{}", args.width, args.height);
        }
        let config = load_config(&args)?;
        let (seed, seed_key) = resolve_seed(&args)?;
        log::info!(
            "Replaying seed {} ({}) on {}x{}",
            seed,
            seed_key.as_deref().unwrap_or("explicit"),
            args.width,
            args.height
        );

        let mut state = GameState::new(Viewport::new(args.width, args.height), config);
        state.start_session(seed::to_prng_seed(seed));

        let mut frames = 0;
        let mut collision = None;
        while frames < args.frames {
            if args.jump_every > 0 && frames % args.jump_every == 0 {
                state.jump();
            }
            let events = state.advance(args.delta);
            frames += 1;
            if events.collided {
                collision = events.collision;
                break;
            }
        }

        let summary = Summary {
            seed,
            seed_key,
            frames,
            phase: state.phase,
            collision,
            score: state.score,
            collectible_score: state.collectible_score,
            gap_size: state.difficulty.gap_size,
            speed: state.difficulty.speed,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start
}
