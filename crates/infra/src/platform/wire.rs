//! JSON shapes returned by the safeticket admin API

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use ticketmail_domain::{Event, Result, TicketMailError, TicketType};

/// Envelope around every JSON answer: `{"status": "OK", "data": {...}}`
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResult<T> {
    pub status: String,
    pub data: Option<T>,
}

impl<T> ApiResult<T> {
    /// The payload of an `OK` answer.
    pub fn into_data(self, operation: &str) -> Result<T> {
        if self.status != "OK" {
            return Err(TicketMailError::ExternalService(format!(
                "{operation} answered with status '{}'",
                self.status
            )));
        }
        self.data.ok_or_else(|| {
            TicketMailError::ExternalService(format!("{operation} answered without data"))
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct EventList {
    pub events: Vec<WireEvent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireEvent {
    pub id: i64,
    pub name: String,
    pub settledate: String,
    #[serde(default)]
    pub eventts: i64,
    #[serde(default, deserialize_with = "string_or_number")]
    pub tickets_sold: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub turnover_total: String,
}

impl TryFrom<WireEvent> for Event {
    type Error = TicketMailError;

    fn try_from(wire: WireEvent) -> Result<Self> {
        Ok(Event {
            settle_date: Event::parse_settle_date(&wire.settledate)?,
            id: wire.id,
            name: wire.name,
            event_ts: wire.eventts,
            tickets_sold: wire.tickets_sold,
            turnover_total: wire.turnover_total,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct EventTickets {
    #[allow(dead_code)]
    pub name: Option<String>,
    pub tickets: Vec<WireTicket>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireTicket {
    pub id: i64,
    pub name: String,
}

impl From<WireTicket> for TicketType {
    fn from(wire: WireTicket) -> Self {
        TicketType { id: wire.id, name: wire.name }
    }
}

/// The platform sends counters as numbers or as preformatted strings.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}
