//! Dispatch service - core workflow

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use ticketmail_domain::{
    Attachment, Config, DispatchChannel, Event, OutgoingMail, Result, TicketBuckets, UnionConfig,
};
use tracing::{info, warn};

use super::ports::{LedgerStore, Mailer, PreviewSink};
use super::scheduler::{decide_invoice, decide_status, InvoiceDecision, Schedule, StatusDecision};
use crate::aggregation::UnionSelection;
use crate::invoice::ports::PdfRenderer;
use crate::invoice::{InvoiceGenerator, PreparedInvoice};
use crate::report::{compose_status_report, StatusReport};
use crate::report::ports::SpreadsheetWriter;

/// What a run is asked to do
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Hand every composed mail to the preview sink.
    pub show_emails: bool,
    /// Send status mails.
    pub send_status: bool,
    /// Generate invoices into this directory.
    pub invoice_dir: Option<PathBuf>,
    /// Send invoice mails. Requires `invoice_dir`.
    pub send_invoice: bool,
    /// Deliver every mail to this address only.
    pub override_recipient: Option<String>,
}

/// Decisions taken for one union
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionDispatch {
    pub union: String,
    /// `None` when status mails were not requested.
    pub status: Option<StatusDecision>,
    /// `None` when no invoice was generated.
    pub invoice: Option<InvoiceDecision>,
    pub invoice_pdf: Option<PathBuf>,
    pub owes_money: Option<bool>,
    /// Channels a mail was actually sent on.
    pub sent: Vec<DispatchChannel>,
}

impl UnionDispatch {
    fn new(union: &str) -> Self {
        Self {
            union: union.to_string(),
            status: None,
            invoice: None,
            invoice_pdf: None,
            owes_money: None,
            sent: Vec::new(),
        }
    }
}

/// Outcome of one run, unions in configuration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub unions: Vec<UnionDispatch>,
}

impl DispatchReport {
    pub fn union(&self, name: &str) -> Option<&UnionDispatch> {
        self.unions.iter().find(|dispatch| dispatch.union == name)
    }

    /// Number of mails sent on `channel`.
    pub fn sent_count(&self, channel: DispatchChannel) -> usize {
        self.unions.iter().filter(|dispatch| dispatch.sent.contains(&channel)).count()
    }
}

/// A union's mails, composed before anything is sent
struct PreparedUnion<'c> {
    union: &'c UnionConfig,
    status: Option<StatusReport>,
    invoice: Option<PreparedInvoice>,
}

/// Status and invoice dispatch service
pub struct DispatchService<'a> {
    config: &'a Config,
    mailer: Arc<dyn Mailer>,
    ledger: Arc<dyn LedgerStore>,
    sheets: Arc<dyn SpreadsheetWriter>,
    invoices: Option<InvoiceGenerator<'a>>,
    preview: Option<Arc<dyn PreviewSink>>,
    options: DispatchOptions,
}

impl<'a> DispatchService<'a> {
    /// Create a new dispatch service
    pub fn new(
        config: &'a Config,
        mailer: Arc<dyn Mailer>,
        ledger: Arc<dyn LedgerStore>,
        sheets: Arc<dyn SpreadsheetWriter>,
        options: DispatchOptions,
    ) -> Self {
        Self { config, mailer, ledger, sheets, invoices: None, preview: None, options }
    }

    /// Enable invoice generation with the given renderer and optional
    /// template source.
    ///
    /// # Errors
    /// Returns `TicketMailError::Config` when the configured locale is unknown.
    pub fn with_invoices(mut self, renderer: Arc<dyn PdfRenderer>, template: Option<String>) -> Result<Self> {
        self.invoices = Some(InvoiceGenerator::new(self.config, renderer, template)?);
        Ok(self)
    }

    /// Add a sink that receives every composed mail when previews are on
    pub fn with_preview(mut self, preview: Arc<dyn PreviewSink>) -> Self {
        self.preview = Some(preview);
        self
    }

    /// Process every union of the configuration.
    ///
    /// `today` drives the schedule; `now` timestamps ledger entries.
    ///
    /// Every union is composed first, so a configuration error aborts the
    /// run before the first mail goes out.
    ///
    /// # Errors
    /// Stops at the first failure. Sends that completed before it stay
    /// recorded in the ledger.
    pub fn run(
        &self,
        event: &Event,
        buckets: &TicketBuckets,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<DispatchReport> {
        let schedule = Schedule::new(event.settle_date, &self.config.schedule);
        info!(
            event = "dispatch.started",
            event_name = %event.name,
            settle_date = %event.settle_date,
            final_status_due = %schedule.final_status_due,
            invoice_due = %schedule.invoice_due,
            today = %today,
            "Starting dispatch"
        );

        let prepared = self.prepare(buckets, today)?;

        let mut report = DispatchReport::default();
        for PreparedUnion { union, status, invoice } in prepared {
            let mut dispatch = UnionDispatch::new(&union.name);

            self.dispatch_status(union, status, &schedule, today, now, &mut dispatch)?;
            self.dispatch_invoice(union, invoice, &schedule, today, now, &mut dispatch)?;

            report.unions.push(dispatch);
        }

        info!(
            event = "dispatch.finished",
            status_sent = report.sent_count(DispatchChannel::Status),
            final_status_sent = report.sent_count(DispatchChannel::FinalStatus),
            invoice_sent = report.sent_count(DispatchChannel::Invoice),
            "Dispatch finished"
        );
        Ok(report)
    }

    fn prepare(&self, buckets: &TicketBuckets, today: NaiveDate) -> Result<Vec<PreparedUnion<'a>>> {
        let compose_status = self.options.show_emails || self.options.send_status;
        let config: &'a Config = self.config;
        config
            .unions
            .iter()
            .enumerate()
            .map(|(position, union)| -> Result<PreparedUnion<'a>> {
                let selection = UnionSelection::for_union(union, buckets)?;
                let status = if compose_status {
                    Some(compose_status_report(config, union, &selection, self.sheets.as_ref())?)
                } else {
                    None
                };
                let invoice = match (&self.invoices, &self.options.invoice_dir) {
                    (Some(generator), Some(_)) => Some(generator.prepare(union, position + 1, &selection, today)?),
                    _ => None,
                };
                Ok(PreparedUnion { union, status, invoice })
            })
            .collect()
    }

    fn dispatch_status(
        &self,
        union: &UnionConfig,
        status: Option<StatusReport>,
        schedule: &Schedule,
        today: NaiveDate,
        now: DateTime<Utc>,
        dispatch: &mut UnionDispatch,
    ) -> Result<()> {
        let Some(content) = status else {
            return Ok(());
        };

        let decision = decide_status(union, schedule, today, self.ledger.as_ref());
        let bcc: Vec<String> = if decision == StatusDecision::SendFinal {
            union.cc_email.iter().cloned().collect()
        } else {
            Vec::new()
        };
        let mail = self.compose_mail(union, &union.subject, content.body, Vec::new(), bcc, content.attachments);

        if self.options.show_emails {
            self.show(&mail);
        }
        if !self.options.send_status {
            return Ok(());
        }

        dispatch.status = Some(decision);
        let channel = match decision {
            StatusDecision::NoTicketTypes => {
                info!(event = "dispatch.status_skipped", union = %union.name, reason = "no_ticket_types", "Union has no ticket types, no status mail sent");
                return Ok(());
            }
            StatusDecision::AlreadySentFinal => {
                info!(event = "dispatch.status_skipped", union = %union.name, reason = "final_already_sent", "The final status mail was already sent");
                return Ok(());
            }
            StatusDecision::SendFinal => DispatchChannel::FinalStatus,
            StatusDecision::SendRegular => DispatchChannel::Status,
        };

        self.mailer.send(&mail)?;
        self.ledger.record(channel, &union.name, now)?;
        dispatch.sent.push(channel);
        info!(event = "dispatch.status_sent", union = %union.name, channel = %channel, "Sent status mail");
        Ok(())
    }

    fn dispatch_invoice(
        &self,
        union: &UnionConfig,
        prepared: Option<PreparedInvoice>,
        schedule: &Schedule,
        today: NaiveDate,
        now: DateTime<Utc>,
        dispatch: &mut UnionDispatch,
    ) -> Result<()> {
        let (Some(generator), Some(dir), Some(prepared)) = (&self.invoices, &self.options.invoice_dir, prepared) else {
            if self.options.send_invoice {
                warn!(event = "dispatch.invoice_unavailable", union = %union.name, "Invoice sending requested without an invoice directory");
            }
            return Ok(());
        };

        let generated = generator.generate(union, &prepared, dir)?;
        let owes_money = generated.owes_money();
        dispatch.invoice_pdf = Some(generated.pdf_path.clone());
        dispatch.owes_money = Some(owes_money);

        let body = prepared.mail_body;
        let attachments = if owes_money {
            vec![Attachment::new(generated.filename(), generated.pdf)]
        } else {
            Vec::new()
        };
        let cc: Vec<String> = union
            .invoice_cc_email
            .as_ref()
            .or(self.config.invoice.cc_email.as_ref())
            .into_iter()
            .cloned()
            .collect();
        let bcc = vec![union.from_email.clone()];
        let mail = self.compose_mail(union, &union.invoice_subject, body, cc, bcc, attachments);

        if self.options.show_emails {
            self.show(&mail);
        }

        let decision = decide_invoice(self.options.send_invoice, union, schedule, today, self.ledger.as_ref());
        dispatch.invoice = Some(decision);
        match decision {
            InvoiceDecision::NotRequested => {}
            InvoiceDecision::NotDue { due } => {
                info!(event = "dispatch.invoice_not_due", union = %union.name, due = %due, "Invoice mail is not due yet");
            }
            InvoiceDecision::AlreadySent => {
                info!(event = "dispatch.invoice_skipped", union = %union.name, "The invoice mail was already sent");
            }
            InvoiceDecision::Send => {
                self.mailer.send(&mail)?;
                self.ledger.record(DispatchChannel::Invoice, &union.name, now)?;
                dispatch.sent.push(DispatchChannel::Invoice);
                info!(event = "dispatch.invoice_sent", union = %union.name, owes_money, "Sent invoice mail");
            }
        }
        Ok(())
    }

    /// Mail from the union's sender to the union. The union's own cc address
    /// is always copied; `cc` and `bcc` add channel specific recipients.
    fn compose_mail(
        &self,
        union: &UnionConfig,
        subject: &str,
        body: String,
        cc: Vec<String>,
        bcc: Vec<String>,
        attachments: Vec<Attachment>,
    ) -> OutgoingMail {
        let cc = cc.into_iter().chain(union.cc_email.iter().cloned()).collect();
        OutgoingMail {
            union_name: union.name.clone(),
            from: union.from_email.clone(),
            to: union.to_email.clone(),
            cc,
            bcc,
            subject: subject.to_string(),
            body,
            attachments,
            override_recipient: self.options.override_recipient.clone(),
        }
    }

    fn show(&self, mail: &OutgoingMail) {
        if let Some(preview) = &self.preview {
            preview.show(mail);
        }
    }
}
