//! Spreadsheet writer port

use ticketmail_domain::Result;

use super::spreadsheet::SheetLayout;

/// Trait for turning a sheet layout into a spreadsheet document
pub trait SpreadsheetWriter: Send + Sync {
    /// Render the layout into the bytes of one document.
    fn write(&self, layout: &SheetLayout) -> Result<Vec<u8>>;
}
