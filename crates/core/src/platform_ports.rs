//! Ticket platform port interface
//!
//! The platform is the vendor's web admin panel. Implementations log in once
//! and keep the session for the rest of the run.

use ticketmail_domain::{Event, Result, TicketType};

/// Trait for reading events and sales from the ticket platform
pub trait TicketPlatform: Send + Sync {
    /// Log in to the admin panel.
    ///
    /// Returns `Ok(false)` when the platform rejects the credentials.
    fn login(&self) -> Result<bool>;

    /// List current events, or past events when `past` is set.
    fn get_events(&self, past: bool) -> Result<Vec<Event>>;

    /// List the ticket types of one event.
    fn get_event_tickets(&self, event_id: i64) -> Result<Vec<TicketType>>;

    /// Export every sold ticket of the given types as `;`-separated CSV text.
    fn export_tickets_stats(&self, event_id: i64, ticket_type_ids: &[i64]) -> Result<String>;
}
