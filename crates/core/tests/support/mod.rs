//! Shared test helpers for `ticketmail-core` integration tests.
//!
//! In-memory fakes of the core ports plus a small event fixture, so the
//! dispatch scenarios can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod fixtures;
pub mod ports;
