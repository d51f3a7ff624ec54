//! # Ticketmail Domain
//!
//! Business domain types for the union ticket reporting workflow.
//!
//! This crate contains:
//! - Validated configuration records (platform, SMTP, invoice, unions)
//! - Event, ticket and dispatch types
//! - Domain error types and Result definitions
//! - Domain constants (export field names, file names, fixed texts)
//!
//! ## Architecture
//! - No dependencies on other ticketmail crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
