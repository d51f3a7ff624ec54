//! Domain types and models

pub mod dispatch;
pub mod event;
pub mod mail;
pub mod ticket;

pub use dispatch::DispatchChannel;
pub use event::{Event, TicketType};
pub use mail::{address_part, Attachment, OutgoingMail};
pub use ticket::{TicketBuckets, TicketExport, TicketRow};
