//! Outgoing mail handed to the mail sender

use serde::{Deserialize, Serialize};

/// An in-memory file attached to a mail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn new(filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self { filename: filename.into(), data }
    }
}

/// A fully composed mail to one union
///
/// Addresses are `Name <address>` or bare addresses. `cc` and `bcc` hold the
/// complete lists, union addresses included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMail {
    pub union_name: String,
    pub from: String,
    pub to: String,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<Attachment>,
    /// When set, the envelope goes to this address only. Headers are kept.
    pub override_recipient: Option<String>,
}

impl OutgoingMail {
    /// Envelope recipients without duplicates, in To, Cc, Bcc order.
    pub fn envelope_recipients(&self) -> Vec<String> {
        if let Some(overridden) = &self.override_recipient {
            return vec![address_part(overridden).to_string()];
        }

        let mut recipients: Vec<String> = Vec::new();
        for entry in std::iter::once(&self.to).chain(&self.cc).chain(&self.bcc) {
            let address = address_part(entry);
            if !address.is_empty() && !recipients.iter().any(|known| known == address) {
                recipients.push(address.to_string());
            }
        }
        recipients
    }
}

/// The bare address of `Name <address>`; the input itself when no angle
/// brackets are present.
pub fn address_part(mailbox: &str) -> &str {
    let trimmed = mailbox.trim();
    match (trimmed.rfind('<'), trimmed.rfind('>')) {
        (Some(start), Some(end)) if start < end => trimmed[start + 1..end].trim(),
        _ => trimmed,
    }
}
