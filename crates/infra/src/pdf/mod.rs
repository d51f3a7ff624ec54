//! HTML to PDF rendering

pub mod wkhtmltopdf;

pub use wkhtmltopdf::WkHtmlToPdf;
