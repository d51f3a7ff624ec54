//! Spreadsheet files

pub mod xlsx;

pub use xlsx::XlsxWriter;
