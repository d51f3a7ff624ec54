//! One run: fetch tickets, print listings, dispatch mails and invoices

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, Utc};
use ticketmail_core::{
    aggregate, merge_manual, ticket_stats, DispatchOptions, DispatchService, LedgerStore, Mailer, TicketPlatform,
};
use ticketmail_domain::{Config, Event, OutgoingMail, Result, TicketBuckets, TicketMailError};
use ticketmail_infra::{
    config, load_manual_tickets, parse_export, write_template, EventDataDir, InstanceLock, JsonLedger,
    SafeTicketClient, SessionCache, SmtpMailer, WkHtmlToPdf, XlsxWriter,
};

use crate::args::{Args, EventScope};
use crate::output::{self, StdoutPreview};

/// Run everything the arguments ask for.
///
/// # Errors
/// Any failure aborts the run. Mails sent before it stay recorded.
pub fn run(args: &Args) -> Result<()> {
    let config = config::load(args.config.clone())?;

    let platform = SafeTicketClient::new(&config.platform)?
        .with_session_cache(Some(SessionCache::for_organization(&config.platform.organization)));
    if !platform.login()? {
        return Err(TicketMailError::Auth(
            "Login to the ticket platform failed, check platform.username and platform.password".into(),
        ));
    }

    let events = fetch_events(&platform, args.event_scope())?;
    if args.events || args.debug {
        println!("{}", output::banner("Events"));
        println!("{}", output::events_listing(&events));
    }
    if !needs_event(args) {
        return Ok(());
    }

    let event = Event::select(&events, &config.event_name)?;
    tracing::info!(event_id = event.id, event_name = %event.name, settle_date = %event.settle_date, "event.selected");

    let ticket_types = platform.get_event_tickets(event.id)?;
    let type_ids: Vec<i64> = ticket_types.iter().map(|t| t.id).collect();
    let export = parse_export(&platform.export_tickets_stats(event.id, &type_ids)?)?;
    let fields = export.fields.clone();
    let mut buckets = aggregate(&ticket_types, export)?;

    let data_dir = EventDataDir::new(&args.data_folder, &config.event_name);
    if args.manual_ticket_template {
        let path = write_template(&data_dir.manual_tickets(), &fields)?;
        println!("Manual-ticket template written to {}", path.display());
    }
    merge_manual(&mut buckets, load_manual_tickets(&data_dir.manual_tickets())?)?;

    if args.tickets || args.debug {
        println!("{}", output::banner("All The Ticket Types"));
        println!("{}", output::ticket_types_listing(&ticket_types));
    }
    if args.ticket_fields || args.debug {
        println!("{}", output::banner("All The Possible Fields of The Tickets"));
        println!("{}", output::fields_listing(&fields));
    }
    if args.ticket_stats || args.debug {
        println!("{}", output::banner("Ticket Stats"));
        println!("{}", output::stats_listing(&ticket_stats(&buckets)));
    }

    if args.wants_dispatch() {
        dispatch(args, &config, event, &buckets, &data_dir)?;
    }
    Ok(())
}

fn needs_event(args: &Args) -> bool {
    args.debug
        || args.tickets
        || args.ticket_fields
        || args.ticket_stats
        || args.manual_ticket_template
        || args.wants_dispatch()
}

/// Current, past or both listings; an event in both counts once.
fn fetch_events(platform: &dyn TicketPlatform, scope: EventScope) -> Result<Vec<Event>> {
    match scope {
        EventScope::Current => platform.get_events(false),
        EventScope::Past => platform.get_events(true),
        EventScope::Both => {
            let mut events = platform.get_events(false)?;
            for event in platform.get_events(true)? {
                if !events.iter().any(|known| known.id == event.id) {
                    events.push(event);
                }
            }
            Ok(events)
        }
    }
}

fn dispatch(
    args: &Args,
    config: &Config,
    event: &Event,
    buckets: &TicketBuckets,
    data_dir: &EventDataDir,
) -> Result<()> {
    // Previews only read the ledger and never touch the data folder or SMTP
    let sending = args.send_emails || args.send_invoice;
    let (ledger, mailer, _lock): (Arc<dyn LedgerStore>, Arc<dyn Mailer>, Option<InstanceLock>) = if sending {
        data_dir.ensure()?;
        let lock = InstanceLock::acquire(data_dir.path())?;
        (Arc::new(JsonLedger::open(data_dir.path())?), Arc::new(SmtpMailer::new(&config.smtp)?), Some(lock))
    } else {
        (Arc::new(JsonLedger::read_only(data_dir.path())?), Arc::new(PreviewOnly), None)
    };

    let options = DispatchOptions {
        show_emails: args.show_emails || args.debug,
        send_status: args.send_emails,
        invoice_dir: invoice_dir(args, data_dir)?,
        send_invoice: args.send_invoice,
        override_recipient: args.overwrite_email_receiver.clone(),
    };
    let generate_invoices = options.invoice_dir.is_some();

    let mut service = DispatchService::new(config, mailer, ledger, Arc::new(XlsxWriter::new()), options)
        .with_preview(Arc::new(StdoutPreview));
    if generate_invoices {
        let renderer = WkHtmlToPdf::new(Duration::from_secs(config.invoice.pdf_timeout_seconds));
        service = service.with_invoices(Arc::new(renderer), invoice_template(config)?)?;
    }

    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let report = service.run(event, buckets, today, Utc::now())?;
    println!("{}", output::dispatch_summary(&report));
    Ok(())
}

struct PreviewOnly;

impl Mailer for PreviewOnly {
    fn send(&self, mail: &OutgoingMail) -> Result<()> {
        Err(TicketMailError::Internal(format!("mail to '{}' not sent, this run only previews", mail.union_name)))
    }
}

/// `--generate-invoice <dir>` as given; with only `--send-invoice` the
/// event's own invoice folder, created on demand.
fn invoice_dir(args: &Args, data_dir: &EventDataDir) -> Result<Option<PathBuf>> {
    match (&args.generate_invoice, args.send_invoice) {
        (Some(dir), _) => Ok(Some(dir.clone())),
        (None, true) => {
            let dir = data_dir.invoices();
            fs::create_dir_all(&dir).map_err(|e| {
                TicketMailError::Io(format!("cannot create {}: {e}", dir.display()))
            })?;
            Ok(Some(dir))
        }
        (None, false) => Ok(None),
    }
}

fn invoice_template(config: &Config) -> Result<Option<String>> {
    let Some(path) = &config.invoice.template_path else {
        return Ok(None);
    };
    fs::read_to_string(path).map(Some).map_err(|e| {
        TicketMailError::Config(format!("cannot read invoice.template_path {}: {e}", path.display()))
    })
}
