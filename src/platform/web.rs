//! Browser bindings
//!
//! Thin `wasm-bindgen` surface over [`Session`]. The page owns the frame
//! scheduler, rendering and the ticket SDK; it calls in here once per
//! animation frame and reads back JSON snapshots.

use wasm_bindgen::prelude::*;

use super::{init_logging, now_utc};
use crate::seed::{self, Cadence};
use crate::session::{InputAction, Session};
use crate::settings::{GameConfig, Viewport};
use crate::ticket::{TicketFailure, TicketStage};

#[wasm_bindgen(start)]
pub fn start() {
    init_logging();
    log::info!("shuttle-flap core loaded");
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_stage(stage: &str) -> Result<TicketStage, JsValue> {
    match stage {
        "check" => Ok(TicketStage::Check),
        "use" => Ok(TicketStage::Use),
        other => Err(JsValue::from_str(&format!("unknown ticket stage `{}`", other))),
    }
}

/// Game handle exported to JS
#[wasm_bindgen]
pub struct WebGame {
    session: Session,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> WebGame {
        WebGame {
            session: Session::new(Viewport::new(width, height), GameConfig::default()),
        }
    }

    /// Build with a JSON config override
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(width: f64, height: f64, config_json: &str) -> Result<WebGame, JsValue> {
        let config = GameConfig::from_json(config_json).map_err(to_js_error)?;
        Ok(WebGame {
            session: Session::new(Viewport::new(width, height), config),
        })
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.session.state.resize(Viewport::new(width, height));
    }

    /// Start a normal run; returns the 12-digit seed
    #[wasm_bindgen(js_name = startNormal)]
    pub fn start_normal(&mut self) -> Result<f64, JsValue> {
        let seed = self.session.start_normal(now_utc()).map_err(to_js_error)?;
        Ok(seed as f64)
    }

    #[wasm_bindgen(js_name = beginWeekly)]
    pub fn begin_weekly(&mut self) -> Result<(), JsValue> {
        self.session.begin_weekly().map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = ticketChecked)]
    pub fn ticket_checked(&mut self) -> Result<(), JsValue> {
        self.session.ticket_checked().map_err(to_js_error)
    }

    /// Ticket spent; returns the weekly seed and starts the countdown
    #[wasm_bindgen(js_name = ticketUsed)]
    pub fn ticket_used(&mut self) -> Result<f64, JsValue> {
        let seed = self.session.ticket_used(now_utc()).map_err(to_js_error)?;
        Ok(seed as f64)
    }

    /// Report a failed ticket step; returns the classified error as JSON
    #[wasm_bindgen(js_name = ticketFailed)]
    pub fn ticket_failed(
        &mut self,
        stage: &str,
        name: Option<String>,
        message: String,
        relayer_code: Option<String>,
        http_status: Option<u16>,
    ) -> Result<String, JsValue> {
        let stage = parse_stage(stage)?;
        let failure = TicketFailure {
            name,
            message,
            relayer_code,
            request_id: None,
            http_status,
        };
        let error = self
            .session
            .ticket_failed(stage, failure)
            .map_err(to_js_error)?;
        serde_json::to_string(&error).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = dismissError)]
    pub fn dismiss_error(&mut self) {
        self.session.dismiss_error();
    }

    /// Poll the countdown; returns seconds left, or undefined when not counting
    #[wasm_bindgen(js_name = advanceCountdown)]
    pub fn advance_countdown(&mut self, elapsed_ms: f64) -> Option<u8> {
        self.session.advance_countdown(elapsed_ms)
    }

    #[wasm_bindgen(js_name = exitToStart)]
    pub fn exit_to_start(&mut self) {
        self.session.exit_to_start();
    }

    /// Tap/click/space. Returns one of "ignored", "started", "jumped",
    /// "ticketRequested".
    pub fn press(&mut self) -> String {
        match self.session.press(now_utc()) {
            InputAction::Ignored => "ignored",
            InputAction::Started => "started",
            InputAction::Jumped => "jumped",
            InputAction::TicketRequested => "ticketRequested",
        }
        .to_string()
    }

    pub fn jump(&mut self) -> bool {
        self.session.jump()
    }

    /// One animation frame; returns the frame's events as JSON
    pub fn tick(&mut self, delta_ms: f64) -> Result<String, JsValue> {
        let events = self.session.advance(delta_ms);
        serde_json::to_string(&events).map_err(to_js_error)
    }

    /// Full session snapshot for the renderer
    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session).map_err(to_js_error)
    }

    pub fn phase(&self) -> String {
        self.session.phase().as_str().to_string()
    }

    pub fn score(&self) -> u32 {
        self.session.state.score
    }

    #[wasm_bindgen(js_name = collectibleScore)]
    pub fn collectible_score(&self) -> u32 {
        self.session.state.collectible_score
    }
}

#[wasm_bindgen(js_name = hourlySeed)]
pub fn hourly_seed() -> f64 {
    Cadence::Hourly.seed_at(now_utc()) as f64
}

#[wasm_bindgen(js_name = dailySeed)]
pub fn daily_seed() -> f64 {
    Cadence::Daily.seed_at(now_utc()) as f64
}

#[wasm_bindgen(js_name = weeklySeed)]
pub fn weekly_seed() -> f64 {
    Cadence::Weekly.seed_at(now_utc()) as f64
}

/// The DJB2 hash used for seed keys, exposed for cross-checking in JS
#[wasm_bindgen(js_name = seedFromKey)]
pub fn seed_from_key(key: &str) -> f64 {
    seed::seed_from_key(key) as f64
}
