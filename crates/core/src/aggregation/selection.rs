//! A union's view of the sold tickets

use ticketmail_domain::{Result, TicketBuckets, TicketMailError, TicketRow, UnionConfig};

/// Sold tickets restricted to the ticket types one union sponsors
///
/// Types keep the union's configured order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionSelection<'a> {
    types: Vec<(&'a str, &'a [TicketRow])>,
}

impl<'a> UnionSelection<'a> {
    /// Resolve the union's configured ticket types against the buckets.
    ///
    /// # Errors
    /// Returns `TicketMailError::Config` when the union names a ticket type
    /// the event does not have.
    pub fn for_union(union: &'a UnionConfig, buckets: &'a TicketBuckets) -> Result<Self> {
        let types = union
            .ticket_type_names
            .iter()
            .map(|name| {
                buckets.get(name).map(|rows| (name.as_str(), rows)).ok_or_else(|| {
                    TicketMailError::Config(format!(
                        "The ticket type '{name}' of union '{}' doesn't exist for the event, try the --tickets argument",
                        union.name
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { types })
    }

    /// Every configured type with its rows, sold or not.
    pub fn types(&self) -> impl Iterator<Item = (&'a str, &'a [TicketRow])> + '_ {
        self.types.iter().copied()
    }

    /// Configured types with at least one sold ticket.
    pub fn sold_types(&self) -> impl Iterator<Item = (&'a str, &'a [TicketRow])> + '_ {
        self.types().filter(|(_, rows)| !rows.is_empty())
    }

    pub fn sold_count(&self, type_name: &str) -> usize {
        self.types.iter().find(|(name, _)| *name == type_name).map_or(0, |(_, rows)| rows.len())
    }

    pub fn total_sold(&self) -> usize {
        self.types.iter().map(|(_, rows)| rows.len()).sum()
    }

    /// All rows of the union's types, type by type.
    pub fn rows(&self) -> impl Iterator<Item = &'a TicketRow> + '_ {
        self.types.iter().flat_map(|(_, rows)| rows.iter())
    }

    pub fn has_ticket_types(&self) -> bool {
        !self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticketmail_domain::constants::FIELD_TICKET_TYPE;

    fn union(types: &[&str]) -> UnionConfig {
        UnionConfig {
            name: "Union1".into(),
            subject: "Status".into(),
            to_name: "To".into(),
            to_email: "to@union.org".into(),
            cc_email: None,
            from_name: "From".into(),
            from_email: "from@event.com".into(),
            ticket_type_names: types.iter().map(|t| t.to_string()).collect(),
            invoice_subject: "Invoice".into(),
            invoice_address: "Street 1".into(),
            invoice_zip_code: "1000".into(),
            invoice_city: "City".into(),
            extra_text: None,
            ticket_fields_extra: vec![],
            additional_sponsorship: None,
            invoice_cvr_no: None,
            invoice_cc_email: None,
        }
    }

    fn buckets() -> TicketBuckets {
        let mut buckets = TicketBuckets::new(["Voksen", "Barn", "Senior"]);
        for type_name in ["Voksen", "Voksen", "Barn"] {
            buckets.push(type_name, TicketRow::new().with_field(FIELD_TICKET_TYPE, type_name)).unwrap();
        }
        buckets
    }

    #[test]
    fn selection_follows_union_order() {
        let union = union(&["Senior", "Barn", "Voksen"]);
        let buckets = buckets();
        let selection = UnionSelection::for_union(&union, &buckets).unwrap();

        let sold: Vec<&str> = selection.sold_types().map(|(name, _)| name).collect();
        assert_eq!(sold, vec!["Barn", "Voksen"]);
        assert_eq!(selection.sold_count("Voksen"), 2);
        assert_eq!(selection.sold_count("Senior"), 0);
        assert_eq!(selection.total_sold(), 3);
        assert_eq!(selection.rows().count(), 3);
    }

    #[test]
    fn unknown_configured_type_is_a_config_error() {
        let union = union(&["Voksen", "Pensionist"]);
        let buckets = buckets();
        let err = UnionSelection::for_union(&union, &buckets).unwrap_err();
        assert!(matches!(err, TicketMailError::Config(ref msg) if msg.contains("Pensionist")));
    }

    #[test]
    fn union_without_types_selects_nothing() {
        let union = union(&[]);
        let buckets = buckets();
        let selection = UnionSelection::for_union(&union, &buckets).unwrap();
        assert!(!selection.has_ticket_types());
        assert_eq!(selection.total_sold(), 0);
    }
}
