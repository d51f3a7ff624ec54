//! SMTP delivery over implicit TLS

use std::path::Path;
use std::time::Duration;

use lettre::address::Envelope;
use lettre::message::header::ContentType;
use lettre::message::{Attachment as MailPart, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, Message, SmtpTransport, Transport};
use ticketmail_core::Mailer;
use ticketmail_domain::{address_part, Attachment, OutgoingMail, Result, SmtpConfig, TicketMailError};

use crate::errors::to_domain;

const SMTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Mailer sending through one SMTPS relay
pub struct SmtpMailer {
    transport: SmtpTransport,
    host: String,
}

impl SmtpMailer {
    /// # Errors
    /// Returns `TicketMailError::Delivery` when the relay cannot be set up.
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let mut builder = SmtpTransport::relay(&config.host)
            .map_err(to_domain)?
            .port(config.port)
            .timeout(Some(SMTP_TIMEOUT));

        if !config.username.is_empty() {
            builder = builder
                .credentials(Credentials::new(config.username.clone(), config.password.clone()));
        }

        Ok(Self { transport: builder.build(), host: config.host.clone() })
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, mail: &OutgoingMail) -> Result<()> {
        let (envelope, message) = build_message(mail)?;
        self.transport.send_raw(&envelope, &message.formatted()).map_err(to_domain)?;

        tracing::info!(
            union = %mail.union_name,
            subject = %mail.subject,
            recipients = envelope.to().len(),
            attachments = mail.attachments.len(),
            host = %self.host,
            "smtp.sent"
        );
        Ok(())
    }
}

/// Compose the MIME message and its envelope.
///
/// Bcc addresses only appear in the envelope. With an override recipient the
/// envelope holds that address alone while the headers stay untouched.
///
/// # Errors
/// Returns `TicketMailError::Config` for an unparsable address and
/// `TicketMailError::Delivery` when the message cannot be assembled.
pub fn build_message(mail: &OutgoingMail) -> Result<(Envelope, Message)> {
    let from: Mailbox = mail.from.parse().map_err(to_domain)?;
    let to: Mailbox = mail.to.parse().map_err(to_domain)?;

    let mut builder = Message::builder().from(from.clone()).to(to).subject(mail.subject.clone());
    for cc in &mail.cc {
        builder = builder.cc(cc.parse::<Mailbox>().map_err(to_domain)?);
    }

    let mut body = MultiPart::mixed().singlepart(SinglePart::plain(mail.body.clone()));
    for attachment in &mail.attachments {
        body = body.singlepart(attachment_part(attachment)?);
    }
    let message = builder.multipart(body).map_err(to_domain)?;

    let recipients = mail
        .envelope_recipients()
        .iter()
        .map(|recipient| address_part(recipient).parse::<Address>().map_err(to_domain))
        .collect::<Result<Vec<_>>>()?;
    let envelope = Envelope::new(Some(from.email), recipients).map_err(to_domain)?;

    Ok((envelope, message))
}

fn attachment_part(attachment: &Attachment) -> Result<SinglePart> {
    let mime = content_type_for(&attachment.filename);
    let content_type = ContentType::parse(mime).map_err(|err| {
        TicketMailError::Internal(format!("invalid content type {mime}: {err}"))
    })?;
    Ok(MailPart::new(attachment.filename.clone()).body(attachment.data.clone(), content_type))
}

/// Content type guessed from the file extension.
fn content_type_for(filename: &str) -> &'static str {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => "application/pdf",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "csv" => "text/csv",
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        _ => "application/octet-stream",
    }
}
