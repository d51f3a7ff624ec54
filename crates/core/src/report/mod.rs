//! Report composition
//!
//! Turns a union's ticket selection into the status mail body and the two
//! spreadsheet attachments.

pub mod ports;
pub mod spreadsheet;
pub mod status;
pub mod table;
pub mod template;

use ticketmail_domain::{Attachment, Config, Result, UnionConfig};

use crate::aggregation::UnionSelection;
use ports::SpreadsheetWriter;

/// Body and attachments of one union's status mail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub body: String,
    pub attachments: Vec<Attachment>,
}

/// Compose the status mail content for one union.
///
/// # Errors
/// Returns `TicketMailError::Config` for a missing report field or a broken
/// template, and whatever the spreadsheet writer reports.
pub fn compose_status_report(
    config: &Config,
    union: &UnionConfig,
    selection: &UnionSelection<'_>,
    writer: &dyn SpreadsheetWriter,
) -> Result<StatusReport> {
    let fields = union.report_fields(&config.ticket_fields);
    let info = status::ticket_info_text(selection, &fields, &config.templates.status_no_tickets)?;
    let body = status::compose_status_body(&config.templates.status, union, &info)?;

    let layouts = [
        spreadsheet::grouped_by_type(union, &config.ticket_fields, selection)?,
        spreadsheet::grouped_by_buyer(
            union,
            &config.ticket_fields,
            selection,
            &config.report.buyer_group_priority,
        )?,
    ];
    let attachments = layouts
        .iter()
        .map(|layout| Ok(Attachment::new(layout.filename.clone(), writer.write(layout)?)))
        .collect::<Result<Vec<_>>>()?;

    Ok(StatusReport { body, attachments })
}
