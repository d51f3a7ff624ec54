//! Mail delivery

pub mod smtp;

pub use smtp::{build_message, SmtpMailer};
