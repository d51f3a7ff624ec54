use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use ticketmail_core::LedgerStore;
use ticketmail_domain::constants::{
    LEDGER_FINAL_STATUS_FILE, LEDGER_INVOICE_FILE, LEDGER_STATUS_FILE,
};
use ticketmail_domain::{DispatchChannel, Result, TicketMailError};

use crate::atomic_file::write_atomic;

#[derive(Debug, Clone, Default)]
struct LedgerState {
    status: BTreeMap<String, Vec<DateTime<Utc>>>,
    final_status: BTreeSet<String>,
    invoice: BTreeSet<String>,
}

/// Ledger backed by three JSON files
///
/// - `status_mail_sent.json`: union name → send times of regular status mails
/// - `final_status_mail_sent.json`: union names that got the final status mail
/// - `invoice_mail_sent.json`: union names that got the invoice mail
///
/// Each record rewrites the affected file through a temp file and a rename.
/// The in-memory state only changes once the file is written.
pub struct JsonLedger {
    dir: PathBuf,
    state: Mutex<LedgerState>,
    read_only: bool,
}

impl JsonLedger {
    /// Load the ledger in `dir`, creating empty files on first use.
    ///
    /// # Errors
    /// Returns `TicketMailError::Ledger` when a file cannot be read, parsed or
    /// created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|err| {
            TicketMailError::Ledger(format!("cannot create {}: {err}", dir.display()))
        })?;

        let state = LedgerState {
            status: load_or_create(&dir.join(LEDGER_STATUS_FILE))?,
            final_status: load_or_create(&dir.join(LEDGER_FINAL_STATUS_FILE))?,
            invoice: load_or_create(&dir.join(LEDGER_INVOICE_FILE))?,
        };
        tracing::debug!(
            dir = %dir.display(),
            status = state.status.len(),
            final_status = state.final_status.len(),
            invoice = state.invoice.len(),
            "ledger.loaded"
        );

        Ok(Self { dir, state: Mutex::new(state), read_only: false })
    }

    /// Load the ledger in `dir` without creating anything. Missing files
    /// read as empty and every `record` fails.
    ///
    /// # Errors
    /// Returns `TicketMailError::Ledger` when an existing file cannot be read
    /// or parsed.
    pub fn read_only(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let state = LedgerState {
            status: load_existing(&dir.join(LEDGER_STATUS_FILE))?.unwrap_or_default(),
            final_status: load_existing(&dir.join(LEDGER_FINAL_STATUS_FILE))?.unwrap_or_default(),
            invoice: load_existing(&dir.join(LEDGER_INVOICE_FILE))?.unwrap_or_default(),
        };
        tracing::debug!(dir = %dir.display(), "ledger.loaded_read_only");
        Ok(Self { dir, state: Mutex::new(state), read_only: true })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl LedgerStore for JsonLedger {
    fn contains(&self, channel: DispatchChannel, union: &str) -> bool {
        let state = self.lock();
        match channel {
            DispatchChannel::Status => state.status.get(union).is_some_and(|sent| !sent.is_empty()),
            DispatchChannel::FinalStatus => state.final_status.contains(union),
            DispatchChannel::Invoice => state.invoice.contains(union),
        }
    }

    fn record(&self, channel: DispatchChannel, union: &str, at: DateTime<Utc>) -> Result<()> {
        if self.read_only {
            return Err(TicketMailError::Ledger(format!(
                "cannot record {channel} for '{union}', the ledger in {} is read-only",
                self.dir.display()
            )));
        }
        let mut state = self.lock();
        match channel {
            DispatchChannel::Status => {
                let mut status = state.status.clone();
                status.entry(union.to_string()).or_default().push(at);
                persist(&self.dir.join(LEDGER_STATUS_FILE), &status)?;
                state.status = status;
            }
            DispatchChannel::FinalStatus => {
                let mut sent = state.final_status.clone();
                sent.insert(union.to_string());
                persist(&self.dir.join(LEDGER_FINAL_STATUS_FILE), &sent)?;
                state.final_status = sent;
            }
            DispatchChannel::Invoice => {
                let mut sent = state.invoice.clone();
                sent.insert(union.to_string());
                persist(&self.dir.join(LEDGER_INVOICE_FILE), &sent)?;
                state.invoice = sent;
            }
        }

        tracing::info!(union, %channel, at = %at, "ledger.recorded");
        Ok(())
    }

    fn status_history(&self, union: &str) -> Vec<DateTime<Utc>> {
        self.lock().status.get(union).cloned().unwrap_or_default()
    }
}

fn load_or_create<T>(path: &Path) -> Result<T>
where
    T: Default + Serialize + DeserializeOwned,
{
    match load_existing(path)? {
        Some(value) => Ok(value),
        None => {
            let empty = T::default();
            persist(path, &empty)?;
            Ok(empty)
        }
    }
}

fn load_existing<T>(path: &Path) -> Result<Option<T>>
where
    T: Default + DeserializeOwned,
{
    if !path.exists() {
        return Ok(None);
    }

    let text = fs::read_to_string(path)
        .map_err(|err| TicketMailError::Ledger(format!("cannot read {}: {err}", path.display())))?;
    if text.trim().is_empty() {
        return Ok(Some(T::default()));
    }
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|err| TicketMailError::Ledger(format!("corrupt ledger file {}: {err}", path.display())))
}

fn persist<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(value)
        .map_err(|err| TicketMailError::Ledger(format!("cannot encode {}: {err}", path.display())))?;
    write_atomic(path, &json)
        .map_err(|err| TicketMailError::Ledger(format!("cannot write {}: {err}", path.display())))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 9, 30, 0).unwrap()
    }

    #[test]
    fn first_open_creates_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        let event_dir = dir.path().join("summerhack-2024");

        let ledger = JsonLedger::open(&event_dir).unwrap();

        assert_eq!(fs::read_to_string(event_dir.join(LEDGER_STATUS_FILE)).unwrap(), "{}");
        assert_eq!(fs::read_to_string(event_dir.join(LEDGER_INVOICE_FILE)).unwrap(), "[]");
        assert!(!ledger.contains(DispatchChannel::FinalStatus, "Union1"));
        assert!(ledger.status_history("Union1").is_empty());
    }

    #[test]
    fn records_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        {
            let ledger = JsonLedger::open(dir.path()).unwrap();
            ledger.record(DispatchChannel::Status, "Union1", at(8)).unwrap();
            ledger.record(DispatchChannel::Status, "Union1", at(9)).unwrap();
            ledger.record(DispatchChannel::FinalStatus, "Union1", at(13)).unwrap();
            ledger.record(DispatchChannel::Invoice, "Union2", at(27)).unwrap();
        }

        let ledger = JsonLedger::open(dir.path()).unwrap();
        assert_eq!(ledger.status_history("Union1"), vec![at(8), at(9)]);
        assert!(ledger.contains(DispatchChannel::Status, "Union1"));
        assert!(ledger.contains(DispatchChannel::FinalStatus, "Union1"));
        assert!(!ledger.contains(DispatchChannel::FinalStatus, "Union2"));
        assert!(ledger.contains(DispatchChannel::Invoice, "Union2"));
        assert!(!ledger.contains(DispatchChannel::Invoice, "Union1"));
    }

    #[test]
    fn once_only_channels_are_sets() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = JsonLedger::open(dir.path()).unwrap();
        ledger.record(DispatchChannel::Invoice, "Union1", at(1)).unwrap();
        ledger.record(DispatchChannel::Invoice, "Union1", at(2)).unwrap();

        let stored: Vec<String> =
            serde_json::from_str(&fs::read_to_string(dir.path().join(LEDGER_INVOICE_FILE)).unwrap())
                .unwrap();
        assert_eq!(stored, vec!["Union1".to_string()]);
    }

    #[test]
    fn read_only_ledger_sees_records_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("never-sent");
        let empty = JsonLedger::read_only(&missing).unwrap();
        assert!(!empty.contains(DispatchChannel::FinalStatus, "Union1"));
        assert!(!missing.exists());

        JsonLedger::open(dir.path()).unwrap().record(DispatchChannel::FinalStatus, "Union1", at(13)).unwrap();
        let ledger = JsonLedger::read_only(dir.path()).unwrap();
        assert!(ledger.contains(DispatchChannel::FinalStatus, "Union1"));

        let err = ledger.record(DispatchChannel::Invoice, "Union1", at(27)).unwrap_err();
        assert!(matches!(err, TicketMailError::Ledger(msg) if msg.contains("read-only")));
        assert!(!JsonLedger::read_only(dir.path()).unwrap().contains(DispatchChannel::Invoice, "Union1"));
    }

    #[test]
    fn corrupt_file_is_a_ledger_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(LEDGER_FINAL_STATUS_FILE), "{not json").unwrap();

        let err = JsonLedger::open(dir.path()).err().unwrap();
        assert!(matches!(err, TicketMailError::Ledger(msg) if msg.contains(LEDGER_FINAL_STATUS_FILE)));
    }

    #[test]
    fn failed_write_leaves_memory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let event_dir = dir.path().join("event");
        let ledger = JsonLedger::open(&event_dir).unwrap();
        fs::remove_dir_all(&event_dir).unwrap();

        let err = ledger.record(DispatchChannel::FinalStatus, "Union1", at(13)).unwrap_err();
        assert!(matches!(err, TicketMailError::Ledger(_)));
        assert!(!ledger.contains(DispatchChannel::FinalStatus, "Union1"));
    }
}
