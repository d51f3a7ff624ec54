//! Per-event folder inside the data folder

use std::fs;
use std::path::{Path, PathBuf};

use ticketmail_core::utils::file_safe_name;
use ticketmail_domain::constants::{INVOICES_DIR, MANUAL_TICKETS_DIR};
use ticketmail_domain::Result;

use crate::errors::to_domain;

/// `<data_folder>/<event-slug>/`: ledger files, PID file, manual tickets and
/// invoices of one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDataDir {
    path: PathBuf,
}

impl EventDataDir {
    pub fn new(data_folder: &Path, event_name: &str) -> Self {
        Self { path: data_folder.join(file_safe_name(event_name)) }
    }

    /// Create the folder if needed.
    pub fn ensure(&self) -> Result<&Self> {
        fs::create_dir_all(&self.path).map_err(to_domain)?;
        Ok(self)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn manual_tickets(&self) -> PathBuf {
        self.path.join(MANUAL_TICKETS_DIR)
    }

    pub fn invoices(&self) -> PathBuf {
        self.path.join(INVOICES_DIR)
    }
}
