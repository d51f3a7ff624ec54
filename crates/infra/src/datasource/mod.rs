//! Ticket data read from outside the platform API
//!
//! - [`csv_export`]: the platform's `;`-separated ticket export
//! - [`manual_tickets`]: hand-maintained YAML files in the event data folder

pub mod csv_export;
pub mod manual_tickets;

pub use csv_export::parse_export;
pub use manual_tickets::{load_manual_tickets, write_template};
