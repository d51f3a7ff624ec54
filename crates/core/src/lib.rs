//! # Ticketmail Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Ticket aggregation per ticket type and per union
//! - Report composition (status text, spreadsheet layouts, invoices)
//! - The dispatch scheduler deciding which mails go out on which day
//! - Port interfaces (traits) for the platform, mailer, PDF renderer,
//!   spreadsheet writer and dispatch ledger
//!
//! ## Architecture Principles
//! - Only depends on `ticketmail-domain`
//! - No network, filesystem or subprocess code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod aggregation;
pub mod dispatch;
pub mod invoice;
pub mod report;
pub mod utils;

// Infrastructure ports
pub mod platform_ports;

// Re-export specific items to avoid ambiguity
pub use aggregation::{aggregate, merge_manual, ticket_stats, ManualTicketFile, UnionSelection};
pub use dispatch::ports::{LedgerStore, Mailer, PreviewSink};
pub use dispatch::{
    DispatchOptions, DispatchReport, DispatchService, InvoiceDecision, Schedule, StatusDecision,
    UnionDispatch,
};
pub use invoice::ports::PdfRenderer;
pub use invoice::{GeneratedInvoice, Invoice, InvoiceGenerator, PreparedInvoice};
pub use platform_ports::TicketPlatform;
pub use report::ports::SpreadsheetWriter;
pub use report::spreadsheet::{Cell, Column, SheetLayout, SheetRow};
