//! Command line arguments

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

/// Ticket sales status mails and invoices for the unions selling an event's
/// tickets.
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(author, version, name = "ticketmail")]
pub struct Args {
    /// Configuration file (TOML or JSON). Probed in the working directory
    /// and beside the executable when left out.
    #[arg(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Folder holding one subfolder per event with the sent-mail ledger,
    /// manual tickets and invoices
    #[arg(long = "data-folder", value_name = "DIR", default_value = ".")]
    pub data_folder: PathBuf,

    /// Debug logging, and print every listing
    #[arg(long)]
    pub debug: bool,

    /// List the events of the organisation
    #[arg(long)]
    pub events: bool,

    /// List the ticket types of the event
    #[arg(long)]
    pub tickets: bool,

    /// List the fields of the ticket export
    #[arg(long = "ticket-fields")]
    pub ticket_fields: bool,

    /// Print how many tickets were sold per ticket type
    #[arg(long = "ticket-stats")]
    pub ticket_stats: bool,

    /// Create the manual-ticket folder with a template file
    #[arg(long = "generate-manual-ticket-template", alias = "use-manual-ticket")]
    pub manual_ticket_template: bool,

    /// Print the mails instead of, or as well as, sending them
    #[arg(long = "show-emails")]
    pub show_emails: bool,

    /// Send the status mails that are due
    #[arg(long = "send-emails")]
    pub send_emails: bool,

    /// Deliver every mail to this address only, keeping the headers
    #[arg(long = "overwrite-email-receiver", value_name = "ADDRESS")]
    pub overwrite_email_receiver: Option<String>,

    /// Generate invoices into this folder
    #[arg(long = "generate-invoice", value_name = "DIR")]
    pub generate_invoice: Option<PathBuf>,

    /// Send the invoice mails that are due
    #[arg(long = "send-invoice")]
    pub send_invoice: bool,

    /// Use past events instead of current ones
    #[arg(long, conflicts_with = "auto_include_past")]
    pub past: bool,

    /// Use both current and past events
    #[arg(long = "auto-include-past")]
    pub auto_include_past: bool,

    /// Pretend today is this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub today: Option<NaiveDate>,
}

/// Which event listings to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventScope {
    Current,
    Past,
    Both,
}

impl Args {
    /// Whether any flag asks for work. Without one the help is shown.
    pub fn has_action(&self) -> bool {
        self.debug
            || self.events
            || self.tickets
            || self.ticket_fields
            || self.ticket_stats
            || self.manual_ticket_template
            || self.wants_dispatch()
    }

    pub fn wants_dispatch(&self) -> bool {
        self.show_emails || self.send_emails || self.generate_invoice.is_some() || self.send_invoice
    }

    pub fn event_scope(&self) -> EventScope {
        match (self.past, self.auto_include_past) {
            (_, true) => EventScope::Both,
            (true, false) => EventScope::Past,
            (false, false) => EventScope::Current,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_dispatch_flags() {
        let args = Args::try_parse_from([
            "ticketmail",
            "--config",
            "ticketmail.toml",
            "--data-folder",
            "/data",
            "--send-emails",
            "--generate-invoice",
            "/data/invoices",
            "--overwrite-email-receiver",
            "test@example.com",
            "--today",
            "2024-01-13",
        ])
        .unwrap();

        assert!(args.has_action());
        assert!(args.wants_dispatch());
        assert_eq!(args.data_folder, PathBuf::from("/data"));
        assert_eq!(args.generate_invoice, Some(PathBuf::from("/data/invoices")));
        assert_eq!(args.today, NaiveDate::from_ymd_opt(2024, 1, 13));
        assert_eq!(args.event_scope(), EventScope::Current);
    }

    #[test]
    fn past_flags_are_exclusive() {
        assert!(Args::try_parse_from(["ticketmail", "--past", "--auto-include-past"]).is_err());
        let args = Args::try_parse_from(["ticketmail", "--events", "--auto-include-past"]).unwrap();
        assert_eq!(args.event_scope(), EventScope::Both);
    }

    #[test]
    fn config_alone_is_not_an_action() {
        let args = Args::try_parse_from(["ticketmail", "--config", "x.toml"]).unwrap();
        assert!(!args.has_action());
        assert_eq!(args.data_folder, PathBuf::from("."));
    }

    #[test]
    fn legacy_manual_ticket_alias() {
        let args = Args::try_parse_from(["ticketmail", "--use-manual-ticket"]).unwrap();
        assert!(args.manual_ticket_template);
    }

    #[test]
    fn invalid_date_is_rejected() {
        assert!(Args::try_parse_from(["ticketmail", "--today", "13.01.2024"]).is_err());
    }
}
