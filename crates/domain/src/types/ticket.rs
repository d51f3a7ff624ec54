//! Sold tickets as exported from the platform

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::constants::{FIELD_ORDER, FIELD_TICKET_TYPE, MANUAL_TICKET_MARKER};
use crate::errors::{Result, TicketMailError};

/// One sold ticket: export field name → value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketRow {
    fields: BTreeMap<String, String>,
}

impl TicketRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Value of `field`.
    ///
    /// # Errors
    /// Returns `TicketMailError::Config` naming the missing field, which
    /// happens when a configured report field does not exist in the export.
    pub fn get(&self, field: &str) -> Result<&str> {
        self.fields.get(field).map(String::as_str).ok_or_else(|| {
            TicketMailError::Config(format!(
                "The field '{field}' doesn't exist, check `ticket_fields` and `ticket_fields_extra` in the config file"
            ))
        })
    }

    pub fn get_opt(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Ticket-type name of the row.
    pub fn ticket_type(&self) -> Option<&str> {
        self.get_opt(FIELD_TICKET_TYPE)
    }

    /// Whether the row came from a manual-ticket file.
    pub fn is_manual(&self) -> bool {
        self.get_opt(FIELD_ORDER) == Some(MANUAL_TICKET_MARKER)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TicketRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

/// Parsed CSV export: header field names plus rows in received order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketExport {
    pub fields: Vec<String>,
    pub rows: Vec<TicketRow>,
}

/// Sold tickets bucketed by ticket-type name
///
/// Iteration follows the order the ticket types were registered in, and each
/// bucket keeps its rows in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketBuckets {
    order: Vec<String>,
    rows: HashMap<String, Vec<TicketRow>>,
}

impl TicketBuckets {
    /// Empty buckets for every known ticket-type name.
    pub fn new<I, S>(type_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut buckets = Self::default();
        for name in type_names {
            let name = name.into();
            if !buckets.rows.contains_key(&name) {
                buckets.rows.insert(name.clone(), Vec::new());
                buckets.order.push(name);
            }
        }
        buckets
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.rows.contains_key(type_name)
    }

    /// Append a row to an existing bucket. Returns the row back when the
    /// ticket type is unknown.
    pub fn push(&mut self, type_name: &str, row: TicketRow) -> std::result::Result<(), TicketRow> {
        match self.rows.get_mut(type_name) {
            Some(bucket) => {
                bucket.push(row);
                Ok(())
            }
            None => Err(row),
        }
    }

    pub fn get(&self, type_name: &str) -> Option<&[TicketRow]> {
        self.rows.get(type_name).map(Vec::as_slice)
    }

    pub fn type_names(&self) -> &[String] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[TicketRow])> {
        self.order
            .iter()
            .map(move |name| (name.as_str(), self.rows.get(name).map_or(&[][..], Vec::as_slice)))
    }

    /// Number of rows across all buckets.
    pub fn total_rows(&self) -> usize {
        self.rows.values().map(Vec::len).sum()
    }
}
