//! Spreadsheet layouts
//!
//! Layouts describe the sheets independently of the file format. Column
//! widths are estimated from the longest exported value, so manual tickets
//! never widen a column.

use std::cmp::Reverse;

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use ticketmail_domain::constants::{
    COLUMN_CM_PER_CHAR, COLUMN_PADDING_CM, FIELD_ORDER, FIELD_TICKET_TYPE, PURCHASED_COUNT_LABEL,
    SHEET_GROUPED_BY_BUYER, SHEET_GROUPED_BY_TYPE, SHEET_NAME,
};
use ticketmail_domain::{Result, TicketRow, UnionConfig};

use crate::aggregation::UnionSelection;

static ISO_DATETIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}$").expect("valid regex")
});
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid regex"));

// Digits an f64 holds exactly
const MAX_NUMERIC_DIGITS: usize = 15;

/// A typed cell value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Cell {
    Text(String),
    Number(f64),
    Date(NaiveDateTime),
}

impl Cell {
    /// Type a raw export value: ISO timestamps become dates, plain digit
    /// strings become numbers, anything else stays text.
    ///
    /// Digit strings with a leading zero or more than 15 digits, such as
    /// phone numbers, stay text.
    pub fn typed(value: &str) -> Self {
        if ISO_DATETIME.is_match(value) {
            if let Ok(date) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
                return Self::Date(date);
            }
        } else if DIGITS.is_match(value)
            && value.len() <= MAX_NUMERIC_DIGITS
            && (value == "0" || !value.starts_with('0'))
        {
            if let Ok(number) = value.parse::<f64>() {
                return Self::Number(number);
            }
        }
        Self::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub width_cm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SheetRow {
    /// Centered title spanning `span` columns.
    Title { text: String, span: usize },
    /// Column names with a bottom border.
    Header(Vec<String>),
    Data(Vec<Cell>),
    Summary(String),
    Blank,
}

/// One single-sheet spreadsheet document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetLayout {
    pub filename: String,
    pub sheet_name: String,
    pub columns: Vec<Column>,
    pub rows: Vec<SheetRow>,
}

/// One section per sold ticket type: title, header, tickets and two blank
/// rows.
///
/// # Errors
/// Returns `TicketMailError::Config` naming a field the tickets lack.
pub fn grouped_by_type(
    union: &UnionConfig,
    ticket_fields: &[String],
    selection: &UnionSelection<'_>,
) -> Result<SheetLayout> {
    let names = union.report_fields(ticket_fields);
    let columns = columns(&names, selection)?;

    let mut rows = Vec::new();
    for (type_name, tickets) in selection.sold_types() {
        rows.push(SheetRow::Title { text: type_name.to_string(), span: names.len() });
        rows.push(SheetRow::Header(names.clone()));
        for ticket in tickets {
            rows.push(SheetRow::Data(typed_cells(ticket, &names)?));
        }
        rows.extend([SheetRow::Blank, SheetRow::Blank]);
    }

    Ok(SheetLayout {
        filename: SHEET_GROUPED_BY_TYPE.to_string(),
        sheet_name: SHEET_NAME.to_string(),
        columns,
        rows,
    })
}

/// Tickets clustered by order, each cluster followed by a purchase count.
///
/// Clusters appear in the order their first ticket does. Inside a cluster
/// tickets are sorted by `priority`: a type name containing an earlier
/// keyword sorts first, ties keep their order. Only the first ticket of a
/// cluster shows the union's extra fields.
///
/// # Errors
/// Returns `TicketMailError::Config` naming a field the tickets lack.
pub fn grouped_by_buyer(
    union: &UnionConfig,
    ticket_fields: &[String],
    selection: &UnionSelection<'_>,
    priority: &[String],
) -> Result<SheetLayout> {
    let primary: Vec<String> =
        std::iter::once(FIELD_TICKET_TYPE.to_string()).chain(ticket_fields.iter().cloned()).collect();
    let names: Vec<String> = primary.iter().chain(union.ticket_fields_extra.iter()).cloned().collect();
    let columns = columns(&names, selection)?;

    let mut clusters: Vec<(&str, Vec<&TicketRow>)> = Vec::new();
    for ticket in selection.rows() {
        let order = ticket.get(FIELD_ORDER)?;
        match clusters.iter_mut().find(|(known, _)| *known == order) {
            Some((_, tickets)) => tickets.push(ticket),
            None => clusters.push((order, vec![ticket])),
        }
    }

    let mut rows = vec![SheetRow::Header(names.clone())];
    for (_, mut tickets) in clusters {
        tickets.sort_by_key(|ticket| Reverse(priority_weight(ticket.ticket_type().unwrap_or_default(), priority)));
        for (index, ticket) in tickets.iter().enumerate() {
            let shown = if index == 0 { &names } else { &primary };
            rows.push(SheetRow::Data(typed_cells(ticket, shown)?));
        }
        rows.push(SheetRow::Summary(format!("{PURCHASED_COUNT_LABEL}: {}", tickets.len())));
        rows.push(SheetRow::Blank);
    }

    Ok(SheetLayout {
        filename: SHEET_GROUPED_BY_BUYER.to_string(),
        sheet_name: SHEET_NAME.to_string(),
        columns,
        rows,
    })
}

/// Weight of a ticket type: keyword `i` of `n` contributes `10^(n - i)`.
pub fn priority_weight(type_name: &str, priority: &[String]) -> u64 {
    let count = priority.len();
    priority
        .iter()
        .enumerate()
        .filter(|(_, keyword)| type_name.contains(keyword.as_str()))
        .map(|(index, _)| 10u64.saturating_pow(u32::try_from(count - index).unwrap_or(u32::MAX)))
        .fold(0, u64::saturating_add)
}

fn columns(names: &[String], selection: &UnionSelection<'_>) -> Result<Vec<Column>> {
    names
        .iter()
        .map(|name| {
            let mut longest = name.chars().count();
            for ticket in selection.rows().filter(|ticket| !ticket.is_manual()) {
                longest = longest.max(ticket.get(name)?.chars().count());
            }
            Ok(Column { name: name.clone(), width_cm: column_width_cm(longest) })
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn column_width_cm(characters: usize) -> f64 {
    characters as f64 * COLUMN_CM_PER_CHAR + COLUMN_PADDING_CM
}

fn typed_cells(ticket: &TicketRow, names: &[String]) -> Result<Vec<Cell>> {
    names.iter().map(|name| ticket.get(name).map(Cell::typed)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ticketmail_domain::constants::MANUAL_TICKET_MARKER;
    use ticketmail_domain::TicketBuckets;

    fn union() -> UnionConfig {
        UnionConfig {
            name: "Union1".into(),
            subject: "Status".into(),
            to_name: "Ada".into(),
            to_email: "to@union.org".into(),
            cc_email: None,
            from_name: "Bo".into(),
            from_email: "from@event.com".into(),
            ticket_type_names: vec!["Barn".into(), "Voksen Alle dage".into()],
            invoice_subject: "Invoice".into(),
            invoice_address: "Street 1".into(),
            invoice_zip_code: "1000".into(),
            invoice_city: "City".into(),
            extra_text: None,
            ticket_fields_extra: vec!["Medlem".into()],
            additional_sponsorship: None,
            invoice_cvr_no: None,
            invoice_cc_email: None,
        }
    }

    fn ticket(type_name: &str, order: &str, name: &str) -> TicketRow {
        TicketRow::new()
            .with_field(FIELD_TICKET_TYPE, type_name)
            .with_field(FIELD_ORDER, order)
            .with_field("Navn", name)
            .with_field("Medlem", "42")
    }

    fn buckets() -> TicketBuckets {
        let mut buckets = TicketBuckets::new(["Voksen Alle dage", "Barn"]);
        buckets.push("Barn", ticket("Barn", "100", "Cy")).unwrap();
        buckets.push("Barn", ticket("Barn", "200", "Di")).unwrap();
        buckets.push("Voksen Alle dage", ticket("Voksen Alle dage", "100", "Ada")).unwrap();
        buckets
    }

    fn fields() -> Vec<String> {
        vec!["Navn".into()]
    }

    #[test]
    fn cells_are_typed_by_pattern() {
        assert_eq!(
            Cell::typed("2024-01-10T12:30:00"),
            Cell::Date(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap().and_hms_opt(12, 30, 0).unwrap())
        );
        assert_eq!(Cell::typed("1337"), Cell::Number(1337.0));
        assert_eq!(Cell::typed("0"), Cell::Number(0.0));
        assert_eq!(Cell::typed("13,37"), Cell::Text("13,37".into()));
        assert_eq!(Cell::typed("004512345678"), Cell::Text("004512345678".into()));
        assert_eq!(Cell::typed("1234567890123456"), Cell::Text("1234567890123456".into()));
        assert_eq!(Cell::typed("123456789012345"), Cell::Number(123_456_789_012_345.0));
        assert_eq!(Cell::typed("2024-13-10T12:30:00"), Cell::Text("2024-13-10T12:30:00".into()));
    }

    #[test]
    fn type_sheet_has_a_section_per_sold_type() {
        let union = union();
        let buckets = buckets();
        let selection = UnionSelection::for_union(&union, &buckets).unwrap();
        let layout = grouped_by_type(&union, &fields(), &selection).unwrap();

        assert_eq!(layout.filename, SHEET_GROUPED_BY_TYPE);
        assert_eq!(layout.sheet_name, "all");
        let names: Vec<&str> = layout.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Navn", "Medlem"]);
        assert_eq!(layout.rows.len(), 6 + 5);
        assert_eq!(layout.rows[0], SheetRow::Title { text: "Barn".into(), span: 2 });
        assert_eq!(layout.rows[2], SheetRow::Data(vec![Cell::Text("Cy".into()), Cell::Number(42.0)]));
    }

    #[test]
    fn widths_ignore_manual_tickets() {
        let union = union();
        let mut buckets = buckets();
        buckets
            .push("Barn", ticket("Barn", MANUAL_TICKET_MARKER, "A very long manually entered name"))
            .unwrap();
        let selection = UnionSelection::for_union(&union, &buckets).unwrap();
        let layout = grouped_by_type(&union, &fields(), &selection).unwrap();

        let expected = 6.0 * COLUMN_CM_PER_CHAR + COLUMN_PADDING_CM;
        assert!((layout.columns[1].width_cm - expected).abs() < 1e-9);
        let navn = 4.0 * COLUMN_CM_PER_CHAR + COLUMN_PADDING_CM;
        assert!((layout.columns[0].width_cm - navn).abs() < 1e-9);
    }

    #[test]
    fn buyer_sheet_clusters_orders_and_sorts_by_priority() {
        let union = union();
        let buckets = buckets();
        let selection = UnionSelection::for_union(&union, &buckets).unwrap();
        let priority = vec!["Voksen".to_string(), "Alle dage".to_string()];
        let layout = grouped_by_buyer(&union, &fields(), &selection, &priority).unwrap();

        assert_eq!(layout.filename, SHEET_GROUPED_BY_BUYER);
        assert_eq!(
            layout.rows,
            vec![
                SheetRow::Header(vec!["Billettype".into(), "Navn".into(), "Medlem".into()]),
                SheetRow::Data(vec![
                    Cell::Text("Voksen Alle dage".into()),
                    Cell::Text("Ada".into()),
                    Cell::Number(42.0),
                ]),
                SheetRow::Data(vec![Cell::Text("Barn".into()), Cell::Text("Cy".into())]),
                SheetRow::Summary("Antal billetter købt: 2".into()),
                SheetRow::Blank,
                SheetRow::Data(vec![Cell::Text("Barn".into()), Cell::Text("Di".into()), Cell::Number(42.0)]),
                SheetRow::Summary("Antal billetter købt: 1".into()),
                SheetRow::Blank,
            ]
        );
    }

    #[test]
    fn earlier_keywords_weigh_more() {
        let priority = vec!["Voksen".to_string(), "Alle dage".to_string()];
        assert_eq!(priority_weight("Voksen Alle dage", &priority), 110);
        assert_eq!(priority_weight("Voksen", &priority), 100);
        assert_eq!(priority_weight("Barn Alle dage", &priority), 10);
        assert_eq!(priority_weight("Barn", &priority), 0);
    }
}
