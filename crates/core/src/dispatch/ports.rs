//! Port interfaces for mail dispatch
//!
//! These traits define the boundaries between the dispatch workflow and
//! the mail server, the persisted ledger and the preview output.

use chrono::{DateTime, Utc};
use ticketmail_domain::{DispatchChannel, OutgoingMail, Result};

/// Trait for delivering mails
pub trait Mailer: Send + Sync {
    /// Deliver one mail. Returns only once the server accepted it.
    fn send(&self, mail: &OutgoingMail) -> Result<()>;
}

/// Trait for the persisted record of sent mails
///
/// Recorded entries are never removed.
pub trait LedgerStore: Send + Sync {
    /// Whether `union` has a recorded send on `channel`.
    fn contains(&self, channel: DispatchChannel, union: &str) -> bool;

    /// Record a send and persist it before returning.
    fn record(&self, channel: DispatchChannel, union: &str, at: DateTime<Utc>) -> Result<()>;

    /// Times regular status mails were sent to `union`, oldest first.
    fn status_history(&self, union: &str) -> Vec<DateTime<Utc>>;
}

/// Trait for showing a composed mail before it is sent
pub trait PreviewSink: Send + Sync {
    fn show(&self, mail: &OutgoingMail);
}
