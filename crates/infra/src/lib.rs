//! # Ticketmail Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - Configuration loading (TOML/JSON files plus environment credentials)
//! - The blocking HTTP client and the safeticket platform client
//! - CSV export and manual-ticket parsing
//! - The JSON-file dispatch ledger and the per-event instance lock
//! - SMTP delivery, `wkhtmltopdf` rendering and XLSX writing
//!
//! ## Architecture
//! - Implements traits defined in `ticketmail-core`
//! - Contains all "impure" code (network, filesystem, subprocesses)

mod atomic_file;

pub mod config;
pub mod data_dir;
pub mod datasource;
pub mod errors;
pub mod http;
pub mod instance_lock;
pub mod ledger;
pub mod mail;
pub mod pdf;
pub mod platform;
pub mod spreadsheet;

// Re-export commonly used items
pub use data_dir::EventDataDir;
pub use datasource::{load_manual_tickets, parse_export, write_template};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use instance_lock::InstanceLock;
pub use ledger::JsonLedger;
pub use mail::SmtpMailer;
pub use pdf::WkHtmlToPdf;
pub use platform::{SafeTicketClient, SessionCache};
pub use spreadsheet::XlsxWriter;
