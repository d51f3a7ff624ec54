//! Single-run lock using a PID file
//!
//! Two runs against the same event folder would race on the ledger files,
//! so a run holds `ticketmail.pid` in the event folder until it ends.

use std::fs;
use std::path::{Path, PathBuf};

use ticketmail_domain::{Result, TicketMailError};

const PID_FILE: &str = "ticketmail.pid";

/// Held for the whole run; removes the PID file when dropped
#[derive(Debug)]
pub struct InstanceLock {
    pid_file: PathBuf,
}

impl InstanceLock {
    /// Take the lock in `lock_dir`.
    ///
    /// A PID file left behind by a process that is no longer running is
    /// replaced.
    ///
    /// # Errors
    /// Returns `TicketMailError::Ledger` when another live process holds the
    /// lock or the PID file cannot be written.
    pub fn acquire<P: AsRef<Path>>(lock_dir: P) -> Result<Self> {
        let pid_file = lock_dir.as_ref().join(PID_FILE);

        if pid_file.exists() {
            if let Ok(content) = fs::read_to_string(&pid_file) {
                if let Ok(pid) = content.trim().parse::<u32>() {
                    if Self::is_process_running(pid) {
                        tracing::warn!(existing_pid = pid, "instance_lock.process_active");
                        return Err(TicketMailError::Ledger(format!(
                            "Another run is active for this event (PID: {pid}). Wait for it to finish."
                        )));
                    }
                    tracing::warn!(stale_pid = pid, "instance_lock.stale_pid_file_detected");
                }
            }
            if let Err(err) = fs::remove_file(&pid_file) {
                tracing::warn!(error = %err, path = %pid_file.display(), "instance_lock.remove_stale_pid_failed");
            }
        }

        let current_pid = std::process::id();
        fs::write(&pid_file, current_pid.to_string())
            .map_err(|e| TicketMailError::Ledger(format!("Failed to create PID file: {e}")))?;

        tracing::debug!(pid = current_pid, path = %pid_file.display(), "instance_lock.acquired");

        Ok(Self { pid_file })
    }

    #[cfg(unix)]
    fn is_process_running(pid: u32) -> bool {
        #[cfg(target_os = "linux")]
        {
            Path::new("/proc").join(pid.to_string()).exists()
        }

        #[cfg(not(target_os = "linux"))]
        {
            use std::process::Command;

            // `kill -0` checks for the process without signalling it
            Command::new("kill")
                .arg("-0")
                .arg(pid.to_string())
                .output()
                .map(|output| output.status.success())
                .unwrap_or(false)
        }
    }

    #[cfg(not(unix))]
    fn is_process_running(pid: u32) -> bool {
        tracing::warn!(pid = pid, "instance_lock.process_check_unsupported");
        false
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.pid_file) {
            tracing::warn!(error = %e, path = %self.pid_file.display(), "instance_lock.remove_pid_failed");
        } else {
            tracing::debug!(path = %self.pid_file.display(), "instance_lock.released");
        }
    }
}
