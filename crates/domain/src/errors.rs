//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for ticketmail
///
/// Every variant is fatal for the run. The variant decides the process exit
/// code, see [`TicketMailError::exit_code`].
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum TicketMailError {
    /// Missing or invalid configuration, unresolved event name, unknown
    /// ticket-type reference or missing report field.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The ticket platform rejected the login or the session expired.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Malformed or error-status response from the ticket platform.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Mail or PDF delivery failed.
    #[error("Delivery error: {0}")]
    Delivery(String),

    /// The dispatch ledger could not be loaded or persisted.
    #[error("Ledger error: {0}")]
    Ledger(String),

    /// Local filesystem failure outside the ledger.
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TicketMailError {
    /// Process exit code reported by the binary for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Internal(_) => 1,
            Self::Config(_) => 2,
            Self::Auth(_) => 3,
            Self::ExternalService(_) => 4,
            Self::Delivery(_) => 5,
            Self::Ledger(_) => 6,
            Self::Io(_) => 7,
        }
    }

    /// Stable label suitable for structured logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Auth(_) => "auth",
            Self::ExternalService(_) => "external_service",
            Self::Delivery(_) => "delivery",
            Self::Ledger(_) => "ledger",
            Self::Io(_) => "io",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for ticketmail operations
pub type Result<T> = std::result::Result<T, TicketMailError>;
