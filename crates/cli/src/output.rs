//! User-facing listings and mail previews printed on stdout

use std::io::Write;

use ticketmail_core::report::table::simple_table;
use ticketmail_core::{DispatchReport, InvoiceDecision, PreviewSink, StatusDecision};
use ticketmail_domain::{Event, OutgoingMail, TicketType};

/// `=====(title)=====` banner used between listings.
pub fn banner(title: &str) -> String {
    format!("\n============({title})============")
}

pub fn events_listing(events: &[Event]) -> String {
    let headers: Vec<String> = ["Name", "ID", "Settle date", "Tickets sold", "Turnover"]
        .iter()
        .map(ToString::to_string)
        .collect();
    let rows: Vec<Vec<String>> = events
        .iter()
        .map(|event| {
            vec![
                event.name.clone(),
                event.id.to_string(),
                event.settle_date.format("%d.%m.%Y").to_string(),
                event.tickets_sold.clone(),
                event.turnover_total.clone(),
            ]
        })
        .collect();
    simple_table(&headers, &rows)
}

/// Ticket-type names, sorted.
pub fn ticket_types_listing(types: &[TicketType]) -> String {
    let mut names: Vec<&str> = types.iter().map(|t| t.name.as_str()).collect();
    names.sort_unstable();
    names.join("\n")
}

/// Export field names, sorted.
pub fn fields_listing(fields: &[String]) -> String {
    let mut sorted: Vec<&str> = fields.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.join("\n")
}

pub fn stats_listing(stats: &[(String, usize)]) -> String {
    stats.iter().map(|(name, count)| format!("{name}: {count}")).collect::<Vec<_>>().join("\n")
}

pub fn mail_preview(mail: &OutgoingMail) -> String {
    let mut lines = vec![banner(&format!("Mail - {}", mail.union_name))];
    lines.push(format!("TO:      {}", mail.to));
    if !mail.cc.is_empty() {
        lines.push(format!("CC:      {}", mail.cc.join(", ")));
    }
    if !mail.bcc.is_empty() {
        lines.push(format!("BCC:     {}", mail.bcc.join(", ")));
    }
    lines.push(format!("FROM:    {}", mail.from));
    lines.push(format!("SUBJECT: {}", mail.subject));
    if let Some(receiver) = &mail.override_recipient {
        lines.push(format!("DELIVERED ONLY TO: {receiver}"));
    }
    if !mail.attachments.is_empty() {
        let names: Vec<&str> = mail.attachments.iter().map(|a| a.filename.as_str()).collect();
        lines.push(format!("ATTACHED: {}", names.join(", ")));
    }
    lines.push("\n---------------------------".into());
    lines.push(mail.body.clone());
    lines.join("\n")
}

/// One line per union describing what the run did.
pub fn dispatch_summary(report: &DispatchReport) -> String {
    let mut lines = vec![banner("Summary")];
    for union in &report.unions {
        let mut parts = Vec::new();
        match union.status {
            Some(StatusDecision::SendRegular) => parts.push("status mail sent".to_string()),
            Some(StatusDecision::SendFinal) => parts.push("final status mail sent".to_string()),
            Some(StatusDecision::AlreadySentFinal) => {
                parts.push("final status mail already sent".to_string());
            }
            Some(StatusDecision::NoTicketTypes) => parts.push("no ticket types".to_string()),
            None => {}
        }
        if let Some(pdf) = &union.invoice_pdf {
            let owed = if union.owes_money == Some(true) { "money owed" } else { "nothing owed" };
            parts.push(format!("invoice {} ({owed})", pdf.display()));
        }
        match union.invoice {
            Some(InvoiceDecision::Send) => parts.push("invoice mail sent".to_string()),
            Some(InvoiceDecision::NotDue { due }) => parts.push(format!("invoice mail due {due}")),
            Some(InvoiceDecision::AlreadySent) => parts.push("invoice mail already sent".to_string()),
            Some(InvoiceDecision::NotRequested) | None => {}
        }
        if parts.is_empty() {
            parts.push("nothing sent".to_string());
        }
        lines.push(format!("{}: {}", union.union, parts.join(", ")));
    }
    lines.join("\n")
}

/// Prints previews to stdout
#[derive(Debug, Default)]
pub struct StdoutPreview;

impl PreviewSink for StdoutPreview {
    fn show(&self, mail: &OutgoingMail) {
        let mut stdout = std::io::stdout().lock();
        if let Err(err) = writeln!(stdout, "{}", mail_preview(mail)) {
            tracing::warn!(error = %err, "preview.write_failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use ticketmail_domain::Attachment;

    use super::*;

    #[test]
    fn events_are_tabulated() {
        let events = vec![Event {
            id: 41,
            name: "SummerHack 2024".into(),
            settle_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            event_ts: 0,
            tickets_sold: "3".into(),
            turnover_total: "300,00".into(),
        }];

        let listing = events_listing(&events);
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Name"));
        assert!(lines[2].starts_with("SummerHack 2024  41"));
        assert!(lines[2].contains("10.01.2024"));
    }

    #[test]
    fn listings_are_sorted() {
        let types = vec![
            TicketType { id: 1, name: "Voksen".into() },
            TicketType { id: 2, name: "Barn".into() },
        ];
        assert_eq!(ticket_types_listing(&types), "Barn\nVoksen");
        assert_eq!(fields_listing(&["Navn".into(), "Email".into()]), "Email\nNavn");
        assert_eq!(stats_listing(&[("Voksen".into(), 3), ("Barn".into(), 0)]), "Voksen: 3\nBarn: 0");
    }

    #[test]
    fn preview_shows_headers_and_body() {
        let mail = OutgoingMail {
            union_name: "Union1".into(),
            from: "Event <e@event.com>".into(),
            to: "Union <u@union.org>".into(),
            cc: vec!["board@union.org".into()],
            bcc: Vec::new(),
            subject: "Status".into(),
            body: "Hej".into(),
            attachments: vec![Attachment::new("a.xlsx", Vec::new())],
            override_recipient: None,
        };

        let preview = mail_preview(&mail);
        assert!(preview.contains("(Mail - Union1)"));
        assert!(preview.contains("CC:      board@union.org"));
        assert!(!preview.contains("BCC"));
        assert!(preview.contains("ATTACHED: a.xlsx"));
        assert!(preview.ends_with("Hej"));
    }
}
