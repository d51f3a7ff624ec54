//! Dispatch scheduling
//!
//! Decides per union and channel whether a mail goes out today. Gates are
//! calendar dates counted from the event's settlement date and open on the
//! due day itself.

use chrono::{Duration, NaiveDate};
use ticketmail_domain::{DispatchChannel, ScheduleConfig, UnionConfig};

use super::ports::LedgerStore;

/// Due dates of the final status mail and the invoice mail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub settle_date: NaiveDate,
    pub final_status_due: NaiveDate,
    pub invoice_due: NaiveDate,
}

impl Schedule {
    pub fn new(settle_date: NaiveDate, config: &ScheduleConfig) -> Self {
        Self {
            settle_date,
            final_status_due: offset(settle_date, config.days_until_final_status),
            invoice_due: offset(settle_date, config.days_until_invoice),
        }
    }

    pub fn final_status_reached(&self, today: NaiveDate) -> bool {
        today >= self.final_status_due
    }

    pub fn invoice_reached(&self, today: NaiveDate) -> bool {
        today >= self.invoice_due
    }
}

// Offsets beyond the calendar's range never come due
fn offset(date: NaiveDate, days: i64) -> NaiveDate {
    Duration::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

/// What to do with a union's status mail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusDecision {
    /// The union sponsors no ticket types.
    NoTicketTypes,
    /// The final status mail already went out.
    AlreadySentFinal,
    /// Send the final status mail, blind-copying the union's cc address.
    SendFinal,
    /// Send a regular status mail.
    SendRegular,
}

impl StatusDecision {
    pub const fn channel(&self) -> Option<DispatchChannel> {
        match self {
            Self::SendFinal => Some(DispatchChannel::FinalStatus),
            Self::SendRegular => Some(DispatchChannel::Status),
            Self::NoTicketTypes | Self::AlreadySentFinal => None,
        }
    }
}

/// What to do with a union's invoice mail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceDecision {
    NotRequested,
    NotDue { due: NaiveDate },
    AlreadySent,
    Send,
}

pub fn decide_status(
    union: &UnionConfig,
    schedule: &Schedule,
    today: NaiveDate,
    ledger: &dyn LedgerStore,
) -> StatusDecision {
    if union.ticket_type_names.is_empty() {
        StatusDecision::NoTicketTypes
    } else if !schedule.final_status_reached(today) {
        StatusDecision::SendRegular
    } else if ledger.contains(DispatchChannel::FinalStatus, &union.name) {
        StatusDecision::AlreadySentFinal
    } else {
        StatusDecision::SendFinal
    }
}

pub fn decide_invoice(
    requested: bool,
    union: &UnionConfig,
    schedule: &Schedule,
    today: NaiveDate,
    ledger: &dyn LedgerStore,
) -> InvoiceDecision {
    if !requested {
        InvoiceDecision::NotRequested
    } else if ledger.contains(DispatchChannel::Invoice, &union.name) {
        InvoiceDecision::AlreadySent
    } else if !schedule.invoice_reached(today) {
        InvoiceDecision::NotDue { due: schedule.invoice_due }
    } else {
        InvoiceDecision::Send
    }
}
