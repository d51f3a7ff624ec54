//! Ticket-platform adapters
//!
//! [`SafeTicketClient`] talks to the admin API of a safeticket organisation
//! and implements the core [`TicketPlatform`](ticketmail_core::TicketPlatform)
//! port. Session cookies survive between runs through [`SessionCache`].

pub mod safeticket;
pub mod session;
mod wire;

pub use safeticket::SafeTicketClient;
pub use session::SessionCache;
