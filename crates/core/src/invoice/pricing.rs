//! Invoice pricing
//!
//! Sponsored ticket types carry their discount in the type name, e.g.
//! `Union ticket for adults 20%`. The export only lists the discounted
//! selling price, so the sponsored share is recovered from both.

use num_format::{Locale, ToFormattedString};
use once_cell::sync::Lazy;
use regex::Regex;
use ticketmail_domain::constants::FIELD_PRICE;
use ticketmail_domain::{Result, TicketMailError, TicketRow};

static DISCOUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*%").expect("valid regex"));

/// Parse a price such as `1.234,50`: `.` groups thousands and `,` marks the
/// decimals.
///
/// # Errors
/// Returns `TicketMailError::ExternalService` for anything else.
pub fn parse_locale_decimal(raw: &str) -> Result<f64> {
    let normalized: String = raw.trim().chars().filter(|c| *c != '.').map(|c| if c == ',' { '.' } else { c }).collect();
    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| TicketMailError::ExternalService(format!("invalid price '{raw}' in the ticket export")))
}

/// Discount percentage written in a ticket-type name.
pub fn discount_percent(type_name: &str) -> Option<f64> {
    DISCOUNT.captures(type_name).and_then(|captures| captures[1].parse::<f64>().ok())
}

/// Price facts of one sold ticket type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TicketPricing {
    pub selling_price: f64,
    pub discount_percent: f64,
    pub sold: usize,
}

impl TicketPricing {
    /// Pricing of a ticket type from its sold rows. The first row's price
    /// is taken as the listed price.
    ///
    /// A type name without a percentage counts as undiscounted.
    ///
    /// # Errors
    /// Returns `TicketMailError::Config` when the discount is 100% or more,
    /// and the errors of [`parse_locale_decimal`].
    pub fn from_rows(type_name: &str, rows: &[TicketRow]) -> Result<Self> {
        let selling_price = match rows.first() {
            Some(row) => parse_locale_decimal(row.get(FIELD_PRICE)?)?,
            None => 0.0,
        };

        let discount_percent = discount_percent(type_name).unwrap_or_else(|| {
            tracing::warn!(
                event = "invoice.discount_missing",
                ticket_type = type_name,
                "Ticket type has no discount percentage, nothing is owed for it"
            );
            0.0
        });
        if discount_percent >= 100.0 {
            return Err(TicketMailError::Config(format!(
                "The ticket type '{type_name}' has a discount of {discount_percent}%, it must be below 100%"
            )));
        }

        Ok(Self { selling_price, discount_percent, sold: rows.len() })
    }

    /// Price before the discount.
    pub fn pre_discount_price(&self) -> f64 {
        self.selling_price * 100.0 / (100.0 - self.discount_percent)
    }

    /// Amount the union owes for all sold tickets of this type.
    #[allow(clippy::cast_precision_loss)]
    pub fn owed(&self) -> f64 {
        (self.pre_discount_price() - self.selling_price) * self.sold as f64
    }
}

/// Look up a `num-format` locale by name, e.g. `da` or `en`.
///
/// # Errors
/// Returns `TicketMailError::Config` for unknown names.
pub fn resolve_locale(name: &str) -> Result<Locale> {
    Locale::from_name(name).map_err(|_| TicketMailError::Config(format!("unknown locale '{name}' in report.locale")))
}

/// Format an amount with two decimals and the locale's separators.
#[allow(clippy::cast_possible_truncation)]
pub fn format_amount(amount: f64, locale: &Locale) -> String {
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { locale.minus_sign() } else { "" };
    let cents = cents.unsigned_abs();
    format!(
        "{sign}{}{}{:02}",
        (cents / 100).to_formatted_string(locale),
        locale.decimal(),
        cents % 100
    )
}
