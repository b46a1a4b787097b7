//! Session orchestration
//!
//! Wraps a [`GameState`] with the start/restart rules of the game: normal
//! runs seeded by the UTC hour, and weekly challenge runs that must pass an
//! external ticket check and ticket use before a 3-2-1 countdown. The ticket
//! steps themselves are performed by the caller, which reports each outcome
//! back here; no network or timer work happens inside.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::seed::{self, Cadence};
use crate::settings::{GameConfig, Viewport};
use crate::sim::{GamePhase, GameState, TickEvents};
use crate::ticket::{TicketError, TicketFailure, TicketStage};

/// Which kind of run is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Hourly seed, starts immediately
    Normal,
    /// Weekly seed, ticket-gated, starts after a countdown
    Weekly,
}

impl GameMode {
    pub fn cadence(&self) -> Cadence {
        match self {
            GameMode::Normal => Cadence::Hourly,
            GameMode::Weekly => Cadence::Weekly,
        }
    }
}

/// Ticket acquisition sub-state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "state", content = "error")]
pub enum TicketState {
    Idle,
    Checking,
    Using,
    Error(TicketError),
}

impl TicketState {
    /// True while an external step is in flight
    pub fn in_flight(&self) -> bool {
        matches!(self, TicketState::Checking | TicketState::Using)
    }
}

/// Illegal lifecycle request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("cannot {action} while {phase}")]
    Phase {
        action: &'static str,
        phase: &'static str,
    },
    #[error("cannot {action}: ticket flow is {state}")]
    Ticket {
        action: &'static str,
        state: &'static str,
    },
}

/// Second-resolution countdown polled with elapsed wall-clock time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    /// Seconds still to show (3, 2, 1); 0 means finished
    pub remaining: u8,
    /// Time accumulated toward the next decrement (ms)
    elapsed_ms: f64,
}

impl Countdown {
    pub fn new(seconds: u8) -> Self {
        Self {
            remaining: seconds,
            elapsed_ms: 0.0,
        }
    }

    /// Feed elapsed time. Returns true once the countdown has reached zero.
    pub fn poll(&mut self, elapsed_ms: f64) -> bool {
        if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
            self.elapsed_ms += elapsed_ms;
        }
        while self.remaining > 0 && self.elapsed_ms >= 1000.0 {
            self.elapsed_ms -= 1000.0;
            self.remaining -= 1;
        }
        self.remaining == 0
    }

    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }
}

/// What a press of the single game input did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Input was swallowed (popup open or counting down)
    Ignored,
    /// A normal run started
    Started,
    Jumped,
    /// A weekly restart needs a fresh ticket flow
    TicketRequested,
}

fn rejected(err: SessionError) -> SessionError {
    log::warn!("Rejected: {}", err);
    err
}

/// A game session: one world plus the rules for starting and restarting it
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub state: GameState,
    pub mode: Option<GameMode>,
    pub ticket: TicketState,
    pub countdown: Option<Countdown>,
}

impl Session {
    pub fn new(viewport: Viewport, config: GameConfig) -> Self {
        Self {
            state: GameState::new(viewport, config),
            mode: None,
            ticket: TicketState::Idle,
            countdown: None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    fn require_idle_phase(&self, action: &'static str) -> Result<(), SessionError> {
        match self.state.phase {
            GamePhase::Ready | GamePhase::GameOver => Ok(()),
            phase => Err(rejected(SessionError::Phase {
                action,
                phase: phase.as_str(),
            })),
        }
    }

    fn require_no_ticket_in_flight(&self, action: &'static str) -> Result<(), SessionError> {
        if self.ticket.in_flight() {
            return Err(rejected(SessionError::Ticket {
                action,
                state: self.ticket_label(),
            }));
        }
        Ok(())
    }

    fn require_ticket(
        &self,
        action: &'static str,
        expected: TicketState,
    ) -> Result<(), SessionError> {
        if self.ticket == expected {
            Ok(())
        } else {
            Err(rejected(SessionError::Ticket {
                action,
                state: self.ticket_label(),
            }))
        }
    }

    fn ticket_label(&self) -> &'static str {
        match self.ticket {
            TicketState::Idle => "idle",
            TicketState::Checking => "checking",
            TicketState::Using => "using",
            TicketState::Error(_) => "error",
        }
    }

    /// Start a normal run seeded by the UTC hour containing `now`
    pub fn start_normal(&mut self, now: DateTime<Utc>) -> Result<u64, SessionError> {
        self.require_idle_phase("start a normal run")?;
        self.require_no_ticket_in_flight("start a normal run")?;
        let seed = GameMode::Normal.cadence().seed_at(now);
        self.mode = Some(GameMode::Normal);
        self.ticket = TicketState::Idle;
        self.countdown = None;
        self.state.start_session(seed::to_prng_seed(seed));
        Ok(seed)
    }

    /// Begin the weekly ticket flow; the caller now runs the ticket check
    pub fn begin_weekly(&mut self) -> Result<(), SessionError> {
        self.require_idle_phase("begin the weekly challenge")?;
        self.require_no_ticket_in_flight("begin the weekly challenge")?;
        self.mode = Some(GameMode::Weekly);
        self.ticket = TicketState::Checking;
        log::info!("Weekly challenge: checking ticket");
        Ok(())
    }

    /// Ticket check succeeded; the caller now runs the ticket use step
    pub fn ticket_checked(&mut self) -> Result<(), SessionError> {
        self.require_ticket("mark ticket checked", TicketState::Checking)?;
        self.ticket = TicketState::Using;
        log::info!("Weekly challenge: using ticket");
        Ok(())
    }

    /// Ticket spent: install the weekly seed and start the countdown
    pub fn ticket_used(&mut self, now: DateTime<Utc>) -> Result<u64, SessionError> {
        self.require_ticket("mark ticket used", TicketState::Using)?;
        let seed = GameMode::Weekly.cadence().seed_at(now);
        self.ticket = TicketState::Idle;
        self.state.prepare_session(seed::to_prng_seed(seed));
        self.countdown = Some(Countdown::new(self.state.config.countdown_seconds));
        Ok(seed)
    }

    /// An external ticket step failed: record the categorized error and fall
    /// back to the start screen with a clean world. Only valid while a ticket
    /// step is in flight; a running session is left untouched otherwise.
    pub fn ticket_failed(
        &mut self,
        stage: TicketStage,
        failure: TicketFailure,
    ) -> Result<TicketError, SessionError> {
        if !self.ticket.in_flight() {
            return Err(rejected(SessionError::Ticket {
                action: "report a ticket failure",
                state: self.ticket_label(),
            }));
        }
        let error = TicketError::classify(failure, stage);
        log::warn!("Weekly challenge aborted: {}", error);
        self.abort_start();
        self.ticket = TicketState::Error(error.clone());
        Ok(error)
    }

    /// Close the error popup
    pub fn dismiss_error(&mut self) {
        if matches!(self.ticket, TicketState::Error(_)) {
            self.ticket = TicketState::Idle;
        }
    }

    fn abort_start(&mut self) {
        self.state.reset_session();
        self.mode = None;
        self.countdown = None;
    }

    /// Poll the countdown with elapsed wall-clock time. Enters `Playing` when
    /// it reaches zero. Returns the seconds still to show, if counting down.
    pub fn advance_countdown(&mut self, elapsed_ms: f64) -> Option<u8> {
        if self.state.phase != GamePhase::Countdown {
            return None;
        }
        let countdown = self.countdown.get_or_insert_with(|| Countdown::new(0));
        if countdown.poll(elapsed_ms) {
            self.countdown = None;
            self.state.play();
            log::info!("Countdown finished, playing");
            return None;
        }
        Some(countdown.remaining)
    }

    /// Leave whatever is happening and return to the start screen
    pub fn exit_to_start(&mut self) {
        self.abort_start();
        self.ticket = TicketState::Idle;
    }

    /// The single game input (tap, click, space)
    pub fn press(&mut self, now: DateTime<Utc>) -> InputAction {
        if self.ticket != TicketState::Idle {
            return InputAction::Ignored;
        }
        match self.state.phase {
            GamePhase::Ready => match self.start_normal(now) {
                Ok(_) => InputAction::Started,
                Err(_) => InputAction::Ignored,
            },
            GamePhase::Countdown => InputAction::Ignored,
            GamePhase::Playing => {
                self.state.jump();
                InputAction::Jumped
            }
            GamePhase::GameOver => self.restart(now),
        }
    }

    /// Restart after game over in the same mode
    pub fn restart(&mut self, now: DateTime<Utc>) -> InputAction {
        let started = if self.mode == Some(GameMode::Weekly) {
            self.begin_weekly().map(|_| InputAction::TicketRequested)
        } else {
            self.start_normal(now).map(|_| InputAction::Started)
        };
        started.unwrap_or(InputAction::Ignored)
    }

    /// Jump without the start/restart handling of [`Session::press`]
    pub fn jump(&mut self) -> bool {
        self.state.jump()
    }

    /// Advance the world one frame
    pub fn advance(&mut self, delta_ms: f64) -> TickEvents {
        self.state.advance(delta_ms)
    }
}
