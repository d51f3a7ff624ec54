//! `wkhtmltopdf` subprocess renderer with timeout handling
//!
//! The HTML is piped to the process on stdin and also kept beside the PDF
//! (same file name, `.html` extension) so a broken layout can be inspected.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;

use ticketmail_core::PdfRenderer;
use ticketmail_domain::{Result, TicketMailError};
use wait_timeout::ChildExt;

const DEFAULT_PROGRAM: &str = "wkhtmltopdf";

/// Renderer invoking `wkhtmltopdf`
#[derive(Debug, Clone)]
pub struct WkHtmlToPdf {
    program: OsString,
    leading_args: Vec<OsString>,
    timeout: Duration,
}

impl WkHtmlToPdf {
    pub fn new(timeout: Duration) -> Self {
        Self { program: DEFAULT_PROGRAM.into(), leading_args: Vec::new(), timeout }
    }

    /// Run another program, given `leading_args` before the renderer's own
    /// arguments.
    pub fn with_command<I, S>(mut self, program: impl Into<OsString>, leading_args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.program = program.into();
        self.leading_args = leading_args.into_iter().map(Into::into).collect();
        self
    }
}

impl PdfRenderer for WkHtmlToPdf {
    fn render(&self, html: &str, title: &str, output: &Path) -> Result<Vec<u8>> {
        let dir = output.parent().filter(|dir| !dir.as_os_str().is_empty()).unwrap_or(Path::new("."));
        if !dir.is_dir() {
            return Err(TicketMailError::Delivery(format!(
                "The invoice folder {} doesn't exist",
                dir.display()
            )));
        }

        let html_copy = output.with_extension("html");
        fs::write(&html_copy, html).map_err(|e| {
            TicketMailError::Delivery(format!("cannot write {}: {e}", html_copy.display()))
        })?;

        tracing::debug!(
            output = %output.display(),
            timeout_secs = self.timeout.as_secs(),
            "pdf.render_started"
        );

        let mut child = Command::new(&self.program)
            .args(&self.leading_args)
            .args(["--enable-local-file-access", "--encoding", "UTF-8", "--title"])
            .arg(title)
            .arg("-")
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                TicketMailError::Delivery(format!(
                    "cannot start {}: {e}",
                    Path::new(&self.program).display()
                ))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // a renderer that exits early closes the pipe; its exit status tells why
            if let Err(err) = stdin.write_all(html.as_bytes()) {
                tracing::debug!(error = %err, "pdf.stdin_write_failed");
            }
        }

        let status = match child.wait_timeout(self.timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                tracing::warn!(timeout_secs = self.timeout.as_secs(), "pdf.render_timed_out");
                let _ = child.kill();
                let _ = child.wait();
                return Err(TicketMailError::Delivery(format!(
                    "PDF rendering timed out after {}s",
                    self.timeout.as_secs()
                )));
            }
            Err(e) => {
                return Err(TicketMailError::Delivery(format!("waiting for the PDF renderer failed: {e}")))
            }
        };

        let stderr = child
            .wait_with_output()
            .map(|out| String::from_utf8_lossy(&out.stderr).trim().to_string())
            .unwrap_or_default();

        if !status.success() {
            tracing::warn!(exit_code = status.code(), stderr = %stderr, "pdf.render_failed");
            return Err(TicketMailError::Delivery(format!(
                "PDF rendering failed ({status}): {stderr}"
            )));
        }

        let pdf = fs::read(output).map_err(|e| {
            TicketMailError::Delivery(format!("cannot read {}: {e}", output.display()))
        })?;
        tracing::info!(output = %output.display(), bytes = pdf.len(), "pdf.rendered");
        Ok(pdf)
    }
}
