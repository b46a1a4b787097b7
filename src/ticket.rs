//! Ticket gate failures
//!
//! The weekly challenge requires an external ticket check and ticket use
//! before a session may start. Those steps fail in many shapes (passkey
//! prompts, relayer responses, plain messages); they are normalized here to
//! a small fixed set of kinds the session layer can react to.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which external step failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStage {
    Check,
    Use,
}

impl TicketStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStage::Check => "check",
            TicketStage::Use => "use",
        }
    }
}

/// Normalized failure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketErrorKind {
    /// The user dismissed the passkey prompt
    Cancelled,
    NoCredentials,
    InvalidAccount,
    PendingRegistration,
    NoTicket,
    Relayer,
    Unknown,
}

/// Relayer codes that mean the holder simply has no ticket
const NO_TICKET_CODES: [&str; 5] = [
    "NO_TICKET",
    "INSUFFICIENT_BALANCE",
    "NOT_ENOUGH_BALANCE",
    "NO_ASSET",
    "NOT_OWNED",
];

/// Pending passkey registration, as reported by the account contract
const PENDING_REGISTRATION_MARKER: &str = "패스키 등록 절차가 진행 중";

const CANCEL_MARKERS: [&str; 4] = [
    "NotAllowedError",
    "AbortError",
    "The operation either timed out or was not allowed",
    "The request is not allowed",
];

/// Raw failure as reported by the external collaborator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketFailure {
    /// Error class name, e.g. `NotAllowedError`
    pub name: Option<String>,
    pub message: String,
    /// Machine-readable relayer code, if the relayer answered
    pub relayer_code: Option<String>,
    pub request_id: Option<String>,
    pub http_status: Option<u16>,
}

impl TicketFailure {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn named(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            message: message.into(),
            ..Self::default()
        }
    }

    /// A failure answered by the relayer API
    pub fn relayer(code: Option<String>, message: impl Into<String>, http_status: Option<u16>) -> Self {
        Self {
            message: message.into(),
            relayer_code: code,
            http_status,
            ..Self::default()
        }
    }

    fn is_relayer_response(&self) -> bool {
        self.relayer_code.is_some() || self.http_status.is_some()
    }

    fn is_user_cancel(&self) -> bool {
        let name = self.name.as_deref().unwrap_or_default();
        if name == "NotAllowedError" || name == "AbortError" {
            return true;
        }
        let combined = format!("{} {}", name, self.message);
        CANCEL_MARKERS.iter().any(|m| combined.contains(m))
            || combined.to_lowercase().contains("cancelled")
    }
}

/// A categorized ticket failure
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("ticket {} failed ({kind:?}): {message}", .stage.as_str())]
pub struct TicketError {
    pub kind: TicketErrorKind,
    pub stage: TicketStage,
    pub message: String,
    pub relayer_code: Option<String>,
    pub request_id: Option<String>,
    pub http_status: Option<u16>,
}

impl TicketError {
    pub fn new(kind: TicketErrorKind, stage: TicketStage, message: impl Into<String>) -> Self {
        Self {
            kind,
            stage,
            message: message.into(),
            relayer_code: None,
            request_id: None,
            http_status: None,
        }
    }

    /// Normalize a raw failure into one of the fixed kinds
    pub fn classify(failure: TicketFailure, stage: TicketStage) -> Self {
        if failure.is_user_cancel() {
            return Self::new(TicketErrorKind::Cancelled, stage, "Authentication cancelled");
        }

        let lower = failure.message.to_lowercase();
        let kind = if failure.message.contains("No passkey registered") {
            TicketErrorKind::NoCredentials
        } else if failure.message.contains(PENDING_REGISTRATION_MARKER)
            || lower.contains("pending registration")
        {
            TicketErrorKind::PendingRegistration
        } else if failure.message == "Invalid account" {
            TicketErrorKind::InvalidAccount
        } else if failure.is_relayer_response() {
            match failure.relayer_code.as_deref() {
                Some(code) if NO_TICKET_CODES.contains(&code) => TicketErrorKind::NoTicket,
                _ => TicketErrorKind::Relayer,
            }
        } else if stage == TicketStage::Check
            && ["insufficient", "not enough", "no ticket"]
                .iter()
                .any(|m| lower.contains(m))
        {
            TicketErrorKind::NoTicket
        } else {
            TicketErrorKind::Unknown
        };

        Self {
            kind,
            stage,
            message: failure.message,
            relayer_code: failure.relayer_code,
            request_id: failure.request_id,
            http_status: failure.http_status,
        }
    }

    /// True when retrying without user action cannot help
    pub fn needs_user_action(&self) -> bool {
        matches!(
            self.kind,
            TicketErrorKind::NoCredentials
                | TicketErrorKind::InvalidAccount
                | TicketErrorKind::PendingRegistration
                | TicketErrorKind::NoTicket
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(failure: TicketFailure, stage: TicketStage) -> TicketErrorKind {
        TicketError::classify(failure, stage).kind
    }

    #[test]
    fn test_passkey_cancel() {
        assert_eq!(
            kind(TicketFailure::named("NotAllowedError", "whatever"), TicketStage::Use),
            TicketErrorKind::Cancelled
        );
        assert_eq!(
            kind(
                TicketFailure::message("The operation either timed out or was not allowed."),
                TicketStage::Check
            ),
            TicketErrorKind::Cancelled
        );
        let error = TicketError::classify(TicketFailure::message("User Cancelled"), TicketStage::Use);
        assert_eq!(error.kind, TicketErrorKind::Cancelled);
        assert_eq!(error.message, "Authentication cancelled");
    }

    #[test]
    fn test_credentials_and_registration() {
        assert_eq!(
            kind(TicketFailure::message("No passkey registered for this device"), TicketStage::Check),
            TicketErrorKind::NoCredentials
        );
        assert_eq!(
            kind(TicketFailure::message("Account has a Pending Registration"), TicketStage::Use),
            TicketErrorKind::PendingRegistration
        );
        assert_eq!(
            kind(
                TicketFailure::message(
                    "블록체인 네트워크에 패스키 등록 절차가 진행 중입니다. 완료 후 다시 시도해 주세요."
                ),
                TicketStage::Use
            ),
            TicketErrorKind::PendingRegistration
        );
        assert_eq!(
            kind(TicketFailure::message("Invalid account"), TicketStage::Check),
            TicketErrorKind::InvalidAccount
        );
    }

    #[test]
    fn test_relayer_codes() {
        let no_ticket = TicketFailure::relayer(Some("NOT_OWNED".into()), "not owned", Some(400));
        assert_eq!(kind(no_ticket, TicketStage::Use), TicketErrorKind::NoTicket);

        let failure = TicketFailure::relayer(Some("RATE_LIMITED".into()), "slow down", Some(429));
        let error = TicketError::classify(failure, TicketStage::Use);
        assert_eq!(error.kind, TicketErrorKind::Relayer);
        assert_eq!(error.http_status, Some(429));
        assert_eq!(error.relayer_code.as_deref(), Some("RATE_LIMITED"));
    }

    #[test]
    fn test_check_stage_heuristic() {
        let failure = TicketFailure::message("Insufficient balance for transfer");
        assert_eq!(kind(failure.clone(), TicketStage::Check), TicketErrorKind::NoTicket);
        assert_eq!(kind(failure, TicketStage::Use), TicketErrorKind::Unknown);
    }

    #[test]
    fn test_display() {
        let error = TicketError::new(TicketErrorKind::NoTicket, TicketStage::Check, "none left");
        assert_eq!(error.to_string(), "ticket check failed (NoTicket): none left");
        assert!(error.needs_user_action());
    }
}
