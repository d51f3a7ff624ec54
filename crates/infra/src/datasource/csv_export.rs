//! Parser for the platform's CSV ticket export

use std::borrow::Cow;

use csv::ReaderBuilder;
use ticketmail_domain::{Result, TicketExport, TicketRow};

use crate::errors::to_domain;

const DELIMITER: char = ';';
const QUOTE: char = '"';

/// Parse an export: header row of field names, `;` delimiter, `"` quotes.
///
/// Whitespace right after a delimiter is skipped, so `"a"; "b"` holds two
/// quoted fields. Records with a different number of fields than the header
/// are rejected. An empty export yields no fields and no rows.
pub fn parse_export(text: &str) -> Result<TicketExport> {
    let text = skip_initial_space(text.trim_start_matches('\u{feff}'));
    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER as u8)
        .quote(QUOTE as u8)
        .flexible(false)
        .from_reader(text.as_bytes());

    let fields: Vec<String> =
        reader.headers().map_err(to_domain)?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(to_domain)?;
        rows.push(fields.iter().cloned().zip(record.iter().map(str::to_string)).collect::<TicketRow>());
    }

    tracing::debug!(fields = fields.len(), rows = rows.len(), "csv_export.parsed");
    Ok(TicketExport { fields, rows })
}

// The csv reader only honours a quote as the first byte of a field
fn skip_initial_space(text: &str) -> Cow<'_, str> {
    if !text.contains("; ") && !text.contains(";\t") {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut in_quotes = false;
    let mut after_delimiter = false;
    for c in text.chars() {
        if after_delimiter && (c == ' ' || c == '\t') {
            continue;
        }
        after_delimiter = false;
        if c == QUOTE {
            in_quotes = !in_quotes;
        } else if c == DELIMITER && !in_quotes {
            after_delimiter = true;
        }
        out.push(c);
    }
    Cow::Owned(out)
}
