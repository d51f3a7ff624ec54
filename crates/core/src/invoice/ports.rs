//! PDF renderer port

use std::path::Path;

use ticketmail_domain::Result;

/// Trait for converting invoice HTML into a PDF document
pub trait PdfRenderer: Send + Sync {
    /// Render `html` to `output` and return the PDF bytes.
    ///
    /// Implementations also keep the HTML beside the PDF.
    fn render(&self, html: &str, title: &str, output: &Path) -> Result<Vec<u8>>;
}
