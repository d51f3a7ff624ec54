//! Invoice document

use chrono::{Datelike, NaiveDate};
use num_format::Locale;
use serde::Serialize;
use ticketmail_domain::constants::INVOICE_TITLE_PREFIX;
use ticketmail_domain::{InvoiceConfig, Result, UnionConfig};

use super::pricing::{format_amount, TicketPricing};
use crate::aggregation::UnionSelection;
use crate::report::template;

/// Built-in invoice layout.
pub const DEFAULT_TEMPLATE: &str = include_str!("template.html");

/// One order line: sold count, ticket type and the sponsored amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceLine {
    pub count: usize,
    pub name: String,
    pub price_formatted: String,
}

/// Every value shown on an invoice, amounts already formatted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invoice {
    pub title: String,
    pub invoice_no: String,
    pub date: String,

    pub sender_name: String,
    pub sender_cvr_no: String,
    pub sender_email: String,
    pub from_address: String,
    pub from_zip_code: String,
    pub from_city: String,

    pub receiver_name: String,
    pub receiver_cvr_no: Option<String>,
    pub to_address: String,
    pub to_zip_code: String,
    pub to_city: String,

    pub registration_no: String,
    pub account_no: String,
    pub currency: String,

    pub orders: Vec<InvoiceLine>,
    pub additional_sponsorship: Option<String>,
    pub total_sum: String,

    #[serde(skip)]
    pub total: f64,
}

impl Invoice {
    /// Whether the union has anything to pay.
    pub fn owes_money(&self) -> bool {
        self.total > 0.0
    }
}

/// Invoice number: prefix, year and the union's 1-based position.
pub fn invoice_number(prefix: &str, date: NaiveDate, index: usize) -> String {
    format!("{prefix}{}{index}", date.year())
}

/// Build the invoice of one union.
///
/// # Errors
/// Returns the pricing errors of the sold ticket types.
pub fn build_invoice(
    sender: &InvoiceConfig,
    union: &UnionConfig,
    index: usize,
    selection: &UnionSelection<'_>,
    date: NaiveDate,
    locale: &Locale,
) -> Result<Invoice> {
    let mut total = 0.0;
    let mut orders = Vec::new();
    for (type_name, rows) in selection.sold_types() {
        let pricing = TicketPricing::from_rows(type_name, rows)?;
        let owed = pricing.owed();
        total += owed;
        orders.push(InvoiceLine {
            count: pricing.sold,
            name: type_name.to_string(),
            price_formatted: format_amount(owed, locale),
        });
    }

    let additional_sponsorship = union.additional_sponsorship.filter(|amount| *amount > 0.0).map(|amount| {
        total += amount;
        format_amount(amount, locale)
    });

    Ok(Invoice {
        title: format!("{INVOICE_TITLE_PREFIX}: {}", union.invoice_subject),
        invoice_no: invoice_number(&sender.number_prefix, date, index),
        date: date.format("%Y-%m-%d").to_string(),
        sender_name: sender.sender_name.clone(),
        sender_cvr_no: sender.sender_cvr_no.clone(),
        sender_email: sender.contact_email.clone(),
        from_address: sender.sender_address.clone(),
        from_zip_code: sender.sender_zip_code.clone(),
        from_city: sender.sender_city.clone(),
        receiver_name: union.name.clone(),
        receiver_cvr_no: union.invoice_cvr_no.clone(),
        to_address: union.invoice_address.clone(),
        to_zip_code: union.invoice_zip_code.clone(),
        to_city: union.invoice_city.clone(),
        registration_no: sender.registration_no.clone(),
        account_no: sender.account_no.clone(),
        currency: sender.currency.clone(),
        orders,
        additional_sponsorship,
        total_sum: format_amount(total, locale),
        total,
    })
}

/// Render the invoice as HTML. Values are escaped.
pub fn render_html(source: &str, invoice: &Invoice) -> Result<String> {
    template::render("invoice.html", source, invoice)
}
