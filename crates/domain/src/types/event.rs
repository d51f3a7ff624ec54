//! Events and ticket types as listed by the ticket platform

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::SETTLE_DATE_FORMAT;
use crate::errors::{Result, TicketMailError};

/// An event on the ticket platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub name: String,
    /// Date after which the event's finances are considered final.
    pub settle_date: NaiveDate,
    pub event_ts: i64,
    pub tickets_sold: String,
    pub turnover_total: String,
}

impl Event {
    /// Parse the platform's `DD.MM.YYYY` settlement date.
    ///
    /// # Errors
    /// Returns `TicketMailError::ExternalService` for any other format.
    pub fn parse_settle_date(raw: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(raw.trim(), SETTLE_DATE_FORMAT).map_err(|e| {
            TicketMailError::ExternalService(format!("invalid settlement date '{raw}': {e}"))
        })
    }

    /// Pick the one event whose name matches exactly.
    ///
    /// # Errors
    /// Returns `TicketMailError::Config` when no event or more than one
    /// event carries the name.
    pub fn select<'a>(events: &'a [Event], name: &str) -> Result<&'a Event> {
        let mut matches = events.iter().filter(|event| event.name == name);
        match (matches.next(), matches.next()) {
            (Some(event), None) => Ok(event),
            (None, _) => Err(TicketMailError::Config(format!(
                "There was no event for the name \"{name}\", try the --events argument"
            ))),
            (Some(_), Some(_)) => Err(TicketMailError::Config(format!(
                "More than one event is named \"{name}\""
            ))),
        }
    }
}

/// A ticket type of one event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketType {
    pub id: i64,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: i64, name: &str) -> Event {
        Event {
            id,
            name: name.into(),
            settle_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            event_ts: 0,
            tickets_sold: "0".into(),
            turnover_total: "0,00".into(),
        }
    }

    #[test]
    fn parses_platform_settle_date() {
        assert_eq!(
            Event::parse_settle_date("10.01.2024").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
        );
        assert!(matches!(
            Event::parse_settle_date("2024-01-10"),
            Err(TicketMailError::ExternalService(_))
        ));
    }

    #[test]
    fn select_requires_exactly_one_match() {
        let events = vec![event(1, "SummerHack 2024"), event(2, "WinterHack 2024")];
        assert_eq!(Event::select(&events, "WinterHack 2024").unwrap().id, 2);

        let err = Event::select(&events, "summerhack 2024").unwrap_err();
        assert!(matches!(err, TicketMailError::Config(ref msg) if msg.contains("summerhack 2024")));

        let duplicated = vec![event(1, "Hack"), event(2, "Hack")];
        assert!(matches!(Event::select(&duplicated, "Hack"), Err(TicketMailError::Config(_))));
    }
}
