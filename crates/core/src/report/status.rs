//! Status mail text

use minijinja::context;
use ticketmail_domain::constants::SOLD_COUNT_LABEL;
use ticketmail_domain::{Result, UnionConfig};

use super::table::simple_table;
use super::template;
use crate::aggregation::UnionSelection;

/// One block per sold ticket type, separated by blank lines, or
/// `no_tickets` when nothing has been sold.
///
/// # Errors
/// Returns `TicketMailError::Config` naming a field the tickets lack.
pub fn ticket_info_text(
    selection: &UnionSelection<'_>,
    fields: &[String],
    no_tickets: &str,
) -> Result<String> {
    let mut blocks = Vec::new();
    for (type_name, rows) in selection.sold_types() {
        let data = rows
            .iter()
            .map(|row| fields.iter().map(|field| row.get(field).map(str::to_owned)).collect())
            .collect::<Result<Vec<Vec<String>>>>()?;
        blocks.push(format!(
            "{type_name}:\n{}\n{SOLD_COUNT_LABEL}: {}",
            simple_table(fields, &data),
            rows.len()
        ));
    }

    if blocks.is_empty() {
        Ok(no_tickets.to_string())
    } else {
        Ok(blocks.join("\n\n"))
    }
}

/// Render the status template for one union.
pub fn compose_status_body(source: &str, union: &UnionConfig, ticket_info_text: &str) -> Result<String> {
    template::render(
        "status",
        source,
        context! {
            to_name => &union.to_name,
            from_name => &union.from_name,
            union_name => &union.name,
            extra_text => union.extra_text.as_deref().unwrap_or_default(),
            ticket_info_text => ticket_info_text,
        },
    )
}
