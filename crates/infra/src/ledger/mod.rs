//! Dispatch ledger persisted as JSON files in the event data folder

pub mod json_ledger;

pub use json_ledger::JsonLedger;
