//! # Ticketmail CLI
//!
//! Argument parsing, listings and wiring of the infrastructure adapters into
//! the core dispatch service. The `ticketmail` binary is a thin wrapper.
//!
//! Listings and mail previews are user-facing output, so this crate prints
//! to stdout directly; everything else goes through `tracing`.

#![allow(clippy::print_stdout, clippy::print_stderr)]

pub mod app;
pub mod args;
pub mod output;

pub use app::run;
pub use args::{Args, EventScope};
