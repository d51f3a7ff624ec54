//! Ticket aggregation
//!
//! Buckets exported rows by ticket type and appends manually entered tickets.
//! Every row lands in exactly one bucket and buckets keep the order rows were
//! received in.

mod selection;

use std::path::PathBuf;

use ticketmail_domain::constants::{FIELD_ORDER, MANUAL_TICKET_MARKER};
use ticketmail_domain::{Result, TicketBuckets, TicketExport, TicketMailError, TicketRow, TicketType};

pub use selection::UnionSelection;

/// Rows loaded from one manual-ticket file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualTicketFile {
    pub path: PathBuf,
    pub rows: Vec<TicketRow>,
}

/// Bucket every exported row by its ticket type.
///
/// # Errors
/// Returns `TicketMailError::ExternalService` when a row has no ticket type or
/// names a type the platform did not list for the event.
pub fn aggregate(ticket_types: &[TicketType], export: TicketExport) -> Result<TicketBuckets> {
    let mut buckets = TicketBuckets::new(ticket_types.iter().map(|t| t.name.clone()));

    for (index, row) in export.rows.into_iter().enumerate() {
        let type_name = row.ticket_type().map(str::to_owned).ok_or_else(|| {
            TicketMailError::ExternalService(format!("export row {} has no ticket type", index + 1))
        })?;
        buckets.push(&type_name, row).map_err(|_| {
            TicketMailError::ExternalService(format!(
                "export row {} has the unknown ticket type '{type_name}'",
                index + 1
            ))
        })?;
    }

    tracing::debug!(
        event = "aggregation.bucketed",
        ticket_types = buckets.type_names().len(),
        rows = buckets.total_rows(),
        "Bucketed exported tickets"
    );
    Ok(buckets)
}

/// Append manually entered tickets after the exported ones.
///
/// Files are merged in the given order and rows in file order. Every merged
/// row is marked with `Ordre = manual-ticket`.
///
/// # Errors
/// Returns `TicketMailError::Config` naming the file when a row lacks a ticket
/// type or names an unknown one.
pub fn merge_manual(buckets: &mut TicketBuckets, files: Vec<ManualTicketFile>) -> Result<()> {
    for file in files {
        let count = file.rows.len();
        for mut row in file.rows {
            let Some(type_name) = row.ticket_type().map(str::to_owned) else {
                return Err(TicketMailError::Config(format!(
                    "a manual ticket in {} has no ticket type",
                    file.path.display()
                )));
            };
            row.set(FIELD_ORDER, MANUAL_TICKET_MARKER);
            buckets.push(&type_name, row).map_err(|_| {
                TicketMailError::Config(format!(
                    "The ticket type '{type_name}' used in {} doesn't exist for the event",
                    file.path.display()
                ))
            })?;
        }
        tracing::info!(
            event = "aggregation.manual_merged",
            path = %file.path.display(),
            rows = count,
            "Merged manual tickets"
        );
    }
    Ok(())
}

/// Sold count per ticket type, in platform order.
pub fn ticket_stats(buckets: &TicketBuckets) -> Vec<(String, usize)> {
    buckets.iter().map(|(name, rows)| (name.to_string(), rows.len())).collect()
}
