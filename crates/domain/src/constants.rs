//! Application constants
//!
//! Centralized location for the export field names, file names and fixed
//! report texts used throughout the application.

// Ticket export fields
pub const FIELD_TICKET_TYPE: &str = "Billettype";
pub const FIELD_PRICE: &str = "Pris";
pub const FIELD_ORDER: &str = "Ordre";
pub const FIELD_TIMESTAMP: &str = "Tidspunkt";

/// Value of [`FIELD_ORDER`] on rows loaded from manual-ticket files.
pub const MANUAL_TICKET_MARKER: &str = "manual-ticket";

/// Format of the platform's settlement date.
pub const SETTLE_DATE_FORMAT: &str = "%d.%m.%Y";

// Ledger files, one set per event directory
pub const LEDGER_FINAL_STATUS_FILE: &str = "final_status_mail_sent.json";
pub const LEDGER_INVOICE_FILE: &str = "invoice_mail_sent.json";
pub const LEDGER_STATUS_FILE: &str = "status_mail_sent.json";

pub const MANUAL_TICKETS_DIR: &str = "manual-tickets";
pub const MANUAL_TICKET_TEMPLATE_FILE: &str = "template.yaml.example";
pub const INVOICES_DIR: &str = "invoices";

// Report texts
pub const SOLD_COUNT_LABEL: &str = "Antal billet solgt";
pub const PURCHASED_COUNT_LABEL: &str = "Antal billetter købt";
pub const INVOICE_TITLE_PREFIX: &str = "Faktura";

// Spreadsheet attachments
pub const SHEET_GROUPED_BY_TYPE: &str = "tickets-sold_grouped-by-type.xlsx";
pub const SHEET_GROUPED_BY_BUYER: &str = "tickets-sold_grouped-by-buyer.xlsx";
pub const SHEET_NAME: &str = "all";

// Column width estimate: 12 characters fill 2.64 cm
pub const COLUMN_CM_PER_CHAR: f64 = 2.64 / 12.0;
pub const COLUMN_PADDING_CM: f64 = 0.2;

/// Session cookies are reused for this long before logging in again.
pub const SESSION_CACHE_MINUTES: i64 = 10;
