//! Event and configuration fixtures

use chrono::NaiveDate;
use ticketmail_domain::constants::{FIELD_ORDER, FIELD_PRICE, FIELD_TICKET_TYPE};
use ticketmail_domain::{
    Config, Event, InvoiceConfig, PlatformConfig, ReportConfig, ScheduleConfig, SmtpConfig,
    TemplateConfig, TicketBuckets, TicketRow, UnionConfig,
};

pub const ADULT: &str = "Union ticket for adults 20%";
pub const KIDS: &str = "Union ticket for kids";

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn union(name: &str, ticket_types: &[&str]) -> UnionConfig {
    UnionConfig {
        name: name.into(),
        subject: "Tickets sold so far".into(),
        to_name: "Union Person".into(),
        to_email: "Union Person <up@union.org>".into(),
        cc_email: Some("board@union.org".into()),
        from_name: "Event Person".into(),
        from_email: "Event Person <ep@event.com>".into(),
        ticket_type_names: ticket_types.iter().map(|t| t.to_string()).collect(),
        invoice_subject: "Invoice for sold tickets".into(),
        invoice_address: "Street Address 2".into(),
        invoice_zip_code: "0000".into(),
        invoice_city: "City".into(),
        extra_text: Some("Phone 8888 8888".into()),
        ticket_fields_extra: vec![],
        additional_sponsorship: None,
        invoice_cvr_no: None,
        invoice_cc_email: None,
    }
}

pub fn config(unions: Vec<UnionConfig>) -> Config {
    Config {
        platform: PlatformConfig {
            organization: "example".into(),
            username: "someone@example.com".into(),
            password: "secret".into(),
            base_url: None,
            timeout_seconds: 30,
        },
        smtp: SmtpConfig {
            host: "smtp.example.com".into(),
            port: 465,
            username: String::new(),
            password: String::new(),
        },
        event_name: "SummerHack 2024".into(),
        schedule: ScheduleConfig { days_until_final_status: 3, days_until_invoice: 17 },
        ticket_fields: vec!["Navn".into()],
        report: ReportConfig::default(),
        invoice: InvoiceConfig {
            number_prefix: "EVENT".into(),
            sender_name: "Event Org".into(),
            sender_cvr_no: "12345678".into(),
            contact_email: "Contact <contact@event.com>".into(),
            cc_email: Some("Treasurer <cc@event.com>".into()),
            sender_address: "Street Name 1".into(),
            sender_zip_code: "1337".into(),
            sender_city: "City".into(),
            registration_no: "1234".into(),
            account_no: "7654321".into(),
            currency: "DKK".into(),
            template_path: None,
            pdf_timeout_seconds: 60,
        },
        templates: TemplateConfig::default(),
        unions,
    }
}

pub fn event(settle_date: NaiveDate) -> Event {
    Event {
        id: 42,
        name: "SummerHack 2024".into(),
        settle_date,
        event_ts: 0,
        tickets_sold: "3".into(),
        turnover_total: "300,00".into(),
    }
}

pub fn ticket(type_name: &str, order: &str, name: &str, price: &str) -> TicketRow {
    TicketRow::new()
        .with_field(FIELD_TICKET_TYPE, type_name)
        .with_field(FIELD_ORDER, order)
        .with_field(FIELD_PRICE, price)
        .with_field("Navn", name)
}

/// Three adult tickets at 100,00 and no kids tickets.
pub fn buckets() -> TicketBuckets {
    let mut buckets = TicketBuckets::new([ADULT, KIDS]);
    for (order, name) in [("1", "Ada"), ("1", "Bo"), ("2", "Cy")] {
        buckets.push(ADULT, ticket(ADULT, order, name, "100,00")).unwrap();
    }
    buckets
}
