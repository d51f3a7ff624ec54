//! Conversions from external infrastructure errors into domain errors.

use lettre::address::AddressError;
use lettre::transport::smtp::Error as SmtpError;
use reqwest::Error as HttpError;
use rust_xlsxwriter::XlsxError;
use ticketmail_domain::TicketMailError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub TicketMailError);

impl From<InfraError> for TicketMailError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<TicketMailError> for InfraError {
    fn from(value: TicketMailError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoTicketMailError {
    fn into_ticketmail(self) -> TicketMailError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → TicketMailError */
/* -------------------------------------------------------------------------- */

impl IntoTicketMailError for HttpError {
    fn into_ticketmail(self) -> TicketMailError {
        if self.is_timeout() {
            return TicketMailError::ExternalService("HTTP request timed out".into());
        }

        if self.is_connect() {
            return TicketMailError::ExternalService(format!("HTTP connection failure: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => TicketMailError::Auth(message),
                _ => TicketMailError::ExternalService(message),
            };
        }

        if self.is_decode() {
            return TicketMailError::ExternalService(format!("malformed response body: {self}"));
        }

        TicketMailError::ExternalService(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_ticketmail())
    }
}

/* -------------------------------------------------------------------------- */
/* Parsers */
/* -------------------------------------------------------------------------- */

impl From<csv::Error> for InfraError {
    fn from(value: csv::Error) -> Self {
        let position = value
            .position()
            .map(|pos| format!(" (line {})", pos.line()))
            .unwrap_or_default();
        InfraError(TicketMailError::ExternalService(format!(
            "malformed ticket export{position}: {value}"
        )))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(TicketMailError::ExternalService(format!("invalid JSON: {value}")))
    }
}

impl From<serde_yaml::Error> for InfraError {
    fn from(value: serde_yaml::Error) -> Self {
        InfraError(TicketMailError::Config(format!("invalid YAML: {value}")))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        InfraError(TicketMailError::Config(format!("Invalid TOML format: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* Delivery */
/* -------------------------------------------------------------------------- */

impl IntoTicketMailError for SmtpError {
    fn into_ticketmail(self) -> TicketMailError {
        if self.is_permanent() {
            if let Some(code) = self.status() {
                return TicketMailError::Delivery(format!("SMTP server rejected the mail ({code}): {self}"));
            }
        }
        if self.is_transient() {
            return TicketMailError::Delivery(format!("SMTP server is temporarily unavailable: {self}"));
        }
        TicketMailError::Delivery(format!("SMTP failure: {self}"))
    }
}

impl From<SmtpError> for InfraError {
    fn from(value: SmtpError) -> Self {
        InfraError(value.into_ticketmail())
    }
}

impl From<lettre::error::Error> for InfraError {
    fn from(value: lettre::error::Error) -> Self {
        InfraError(TicketMailError::Delivery(format!("failed to build the mail: {value}")))
    }
}

impl From<AddressError> for InfraError {
    fn from(value: AddressError) -> Self {
        InfraError(TicketMailError::Config(format!("invalid mail address: {value}")))
    }
}

impl From<XlsxError> for InfraError {
    fn from(value: XlsxError) -> Self {
        InfraError(TicketMailError::Internal(format!("failed to write spreadsheet: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → TicketMailError */
/* -------------------------------------------------------------------------- */

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(TicketMailError::Io(value.to_string()))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
