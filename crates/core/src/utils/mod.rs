//! Shared helpers

pub mod naming;

pub use naming::file_safe_name;
