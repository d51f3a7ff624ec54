//! In-memory fakes of the core ports

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use ticketmail_core::{LedgerStore, Mailer, PdfRenderer, PreviewSink, SheetLayout, SpreadsheetWriter};
use ticketmail_domain::{DispatchChannel, OutgoingMail, Result as DomainResult, TicketMailError};

/// Ledger kept in memory.
#[derive(Default, Clone)]
pub struct MemoryLedger {
    status: Arc<Mutex<HashMap<String, Vec<DateTime<Utc>>>>>,
    final_status: Arc<Mutex<HashSet<String>>>,
    invoice: Arc<Mutex<HashSet<String>>>,
}

impl LedgerStore for MemoryLedger {
    fn contains(&self, channel: DispatchChannel, union: &str) -> bool {
        match channel {
            DispatchChannel::Status => {
                self.status.lock().unwrap().get(union).is_some_and(|history| !history.is_empty())
            }
            DispatchChannel::FinalStatus => self.final_status.lock().unwrap().contains(union),
            DispatchChannel::Invoice => self.invoice.lock().unwrap().contains(union),
        }
    }

    fn record(&self, channel: DispatchChannel, union: &str, at: DateTime<Utc>) -> DomainResult<()> {
        match channel {
            DispatchChannel::Status => {
                self.status.lock().unwrap().entry(union.to_string()).or_default().push(at);
            }
            DispatchChannel::FinalStatus => {
                self.final_status.lock().unwrap().insert(union.to_string());
            }
            DispatchChannel::Invoice => {
                self.invoice.lock().unwrap().insert(union.to_string());
            }
        }
        Ok(())
    }

    fn status_history(&self, union: &str) -> Vec<DateTime<Utc>> {
        self.status.lock().unwrap().get(union).cloned().unwrap_or_default()
    }
}

/// Mailer that records every mail, or fails every send when asked to.
#[derive(Default, Clone)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<OutgoingMail>>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self { sent: Arc::default(), fail: true }
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

impl Mailer for RecordingMailer {
    fn send(&self, mail: &OutgoingMail) -> DomainResult<()> {
        if self.fail {
            return Err(TicketMailError::Delivery("connection refused".into()));
        }
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

/// Renderer that keeps the HTML and returns it as the "PDF".
#[derive(Default, Clone)]
pub struct FakePdf {
    rendered: Arc<Mutex<Vec<(PathBuf, String)>>>,
}

impl FakePdf {
    pub fn rendered(&self) -> Vec<(PathBuf, String)> {
        self.rendered.lock().unwrap().clone()
    }
}

impl PdfRenderer for FakePdf {
    fn render(&self, html: &str, _title: &str, output: &Path) -> DomainResult<Vec<u8>> {
        self.rendered.lock().unwrap().push((output.to_path_buf(), html.to_string()));
        Ok(html.as_bytes().to_vec())
    }
}

/// Writer that serializes the layout's file name and row count.
#[derive(Default, Clone)]
pub struct FakeSheets;

impl SpreadsheetWriter for FakeSheets {
    fn write(&self, layout: &SheetLayout) -> DomainResult<Vec<u8>> {
        Ok(format!("{}:{}", layout.filename, layout.rows.len()).into_bytes())
    }
}

/// Preview sink collecting the shown mails.
#[derive(Default, Clone)]
pub struct CollectingPreview {
    shown: Arc<Mutex<Vec<OutgoingMail>>>,
}

impl CollectingPreview {
    pub fn shown(&self) -> Vec<OutgoingMail> {
        self.shown.lock().unwrap().clone()
    }
}

impl PreviewSink for CollectingPreview {
    fn show(&self, mail: &OutgoingMail) {
        self.shown.lock().unwrap().push(mail.clone());
    }
}
