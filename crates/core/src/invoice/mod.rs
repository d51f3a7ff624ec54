//! Invoices
//!
//! Builds the invoice of a union from its sold tickets, renders it as HTML
//! and hands it to a [`PdfRenderer`](ports::PdfRenderer).

pub mod document;
pub mod ports;
pub mod pricing;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use minijinja::context;
use num_format::Locale;
use ticketmail_domain::{Config, Result, UnionConfig};

pub use document::{build_invoice, invoice_number, render_html, Invoice, InvoiceLine, DEFAULT_TEMPLATE};
use ports::PdfRenderer;

use crate::aggregation::UnionSelection;
use crate::report::template;
use crate::utils::file_safe_name;

/// A rendered invoice
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedInvoice {
    pub invoice: Invoice,
    pub pdf_path: PathBuf,
    pub pdf: Vec<u8>,
}

impl GeneratedInvoice {
    pub fn owes_money(&self) -> bool {
        self.invoice.owes_money()
    }

    /// Attachment file name of the PDF.
    pub fn filename(&self) -> String {
        self.pdf_path
            .file_name()
            .map_or_else(|| "invoice.pdf".to_string(), |name| name.to_string_lossy().into_owned())
    }
}

/// An invoice with its HTML and mail text, not yet converted to PDF
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedInvoice {
    pub invoice: Invoice,
    pub html: String,
    pub mail_body: String,
}

/// Renders union invoices into one output directory
pub struct InvoiceGenerator<'a> {
    config: &'a Config,
    renderer: Arc<dyn PdfRenderer>,
    template: String,
    locale: Locale,
}

impl<'a> InvoiceGenerator<'a> {
    /// Create a generator using `template` or the built-in layout.
    ///
    /// # Errors
    /// Returns `TicketMailError::Config` when the configured locale is unknown.
    pub fn new(config: &'a Config, renderer: Arc<dyn PdfRenderer>, template: Option<String>) -> Result<Self> {
        Ok(Self {
            config,
            renderer,
            template: template.unwrap_or_else(|| DEFAULT_TEMPLATE.to_string()),
            locale: pricing::resolve_locale(&config.report.locale)?,
        })
    }

    /// Build the invoice of the union at 1-based position `index` and
    /// render its HTML and mail text. Nothing is converted or written yet.
    ///
    /// # Errors
    /// Returns pricing and template errors.
    pub fn prepare(
        &self,
        union: &UnionConfig,
        index: usize,
        selection: &UnionSelection<'_>,
        date: NaiveDate,
    ) -> Result<PreparedInvoice> {
        let invoice = build_invoice(&self.config.invoice, union, index, selection, date, &self.locale)?;
        let html = render_html(&self.template, &invoice)?;
        let mail_body = self.mail_body(union, invoice.owes_money())?;
        Ok(PreparedInvoice { invoice, html, mail_body })
    }

    /// Convert a prepared invoice to PDF in `output_dir`.
    ///
    /// # Errors
    /// Returns whatever the renderer reports.
    pub fn generate(
        &self,
        union: &UnionConfig,
        prepared: &PreparedInvoice,
        output_dir: &Path,
    ) -> Result<GeneratedInvoice> {
        let pdf_path = output_dir.join(format!("{}.pdf", file_safe_name(&union.name)));
        let pdf = self.renderer.render(&prepared.html, &union.invoice_subject, &pdf_path)?;

        tracing::info!(
            event = "invoice.generated",
            union = %union.name,
            invoice_no = %prepared.invoice.invoice_no,
            total = %prepared.invoice.total_sum,
            path = %pdf_path.display(),
            "Generated invoice"
        );
        Ok(GeneratedInvoice { invoice: prepared.invoice.clone(), pdf_path, pdf })
    }

    /// Text of the invoice mail: the `invoice` template when money is owed,
    /// the `no_invoice` template otherwise.
    fn mail_body(&self, union: &UnionConfig, owes_money: bool) -> Result<String> {
        let (name, source) = if owes_money {
            ("invoice", &self.config.templates.invoice)
        } else {
            ("no_invoice", &self.config.templates.no_invoice)
        };
        template::render(
            name,
            source,
            context! {
                to_name => &union.to_name,
                from_name => &union.from_name,
                union_name => &union.name,
                event_name => &self.config.event_name,
                extra_text => union.extra_text.as_deref().unwrap_or_default(),
            },
        )
    }
}
