//! Mail dispatch
//!
//! Walks the unions, composes their mails and sends what the schedule and
//! the ledger allow.

pub mod ports;
pub mod scheduler;
pub mod service;

pub use scheduler::{decide_invoice, decide_status, InvoiceDecision, Schedule, StatusDecision};
pub use service::{DispatchOptions, DispatchReport, DispatchService, UnionDispatch};
