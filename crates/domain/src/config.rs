//! Configuration records
//!
//! The whole configuration is parsed once into an immutable [`Config`] and
//! handed to every component by reference. Every record rejects unknown
//! fields, and [`Config::validate`] checks the cross-field rules that serde
//! cannot express.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, TicketMailError};

/// Root configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub platform: PlatformConfig,
    pub smtp: SmtpConfig,
    /// Exact name of the event to report on.
    pub event_name: String,
    pub schedule: ScheduleConfig,
    /// Ticket fields included for every union, in column order.
    pub ticket_fields: Vec<String>,
    #[serde(default)]
    pub report: ReportConfig,
    pub invoice: InvoiceConfig,
    #[serde(default)]
    pub templates: TemplateConfig,
    pub unions: Vec<UnionConfig>,
}

/// Login for the ticket platform's admin panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformConfig {
    /// Sub-domain of the organisation, `{organization}.safeticket.dk`.
    pub organization: String,
    /// Normally an email address. May come from the environment instead.
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Overrides the URL derived from `organization`.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_http_timeout")]
    pub timeout_seconds: u64,
}

impl PlatformConfig {
    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| format!("https://{}.safeticket.dk", self.organization))
    }
}

/// SMTP server, implicit TLS only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Day offsets from the event's settlement date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleConfig {
    /// From this day on the status mail is sent as the final one.
    pub days_until_final_status: i64,
    /// From this day on the invoice mail is sent.
    pub days_until_invoice: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Locale used to group thousands in invoice amounts.
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Keywords ordering tickets inside one order cluster of the buyer sheet.
    /// A ticket type containing an earlier keyword sorts first.
    #[serde(default = "default_buyer_group_priority")]
    pub buyer_group_priority: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { locale: default_locale(), buyer_group_priority: default_buyer_group_priority() }
    }
}

/// Sender side of the invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InvoiceConfig {
    /// Prefix of the invoice number, followed by the year and union index.
    pub number_prefix: String,
    pub sender_name: String,
    pub sender_cvr_no: String,
    /// Person to contact if something is wrong with the invoice.
    pub contact_email: String,
    /// Copied on every invoice mail.
    #[serde(default)]
    pub cc_email: Option<String>,
    pub sender_address: String,
    pub sender_zip_code: String,
    pub sender_city: String,
    pub registration_no: String,
    pub account_no: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// HTML template replacing the built-in invoice layout.
    #[serde(default)]
    pub template_path: Option<PathBuf>,
    #[serde(default = "default_pdf_timeout")]
    pub pdf_timeout_seconds: u64,
}

/// Mail body templates
///
/// Templates use `{{ variable }}` placeholders. Status templates see
/// `to_name`, `from_name`, `union_name`, `extra_text` and
/// `ticket_info_text`; invoice templates see `to_name`, `from_name`,
/// `union_name`, `event_name` and `extra_text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateConfig {
    #[serde(default = "default_status_template")]
    pub status: String,
    /// Replaces `ticket_info_text` when nothing has been sold.
    #[serde(default = "default_status_no_tickets")]
    pub status_no_tickets: String,
    #[serde(default = "default_invoice_template")]
    pub invoice: String,
    #[serde(default = "default_no_invoice_template")]
    pub no_invoice: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            status: default_status_template(),
            status_no_tickets: default_status_no_tickets(),
            invoice: default_invoice_template(),
            no_invoice: default_no_invoice_template(),
        }
    }
}

/// A sponsoring union receiving reports and an invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnionConfig {
    pub name: String,
    /// Subject of the status mails.
    pub subject: String,
    pub to_name: String,
    /// `Name <address>` or a bare address.
    pub to_email: String,
    #[serde(default)]
    pub cc_email: Option<String>,
    pub from_name: String,
    pub from_email: String,
    /// Ticket types this union sponsors, in report order.
    #[serde(default)]
    pub ticket_type_names: Vec<String>,
    pub invoice_subject: String,
    pub invoice_address: String,
    pub invoice_zip_code: String,
    pub invoice_city: String,
    /// Appended after the sender's name, e.g. a phone number.
    #[serde(default)]
    pub extra_text: Option<String>,
    /// Fields shown for this union on top of the global ticket fields.
    #[serde(default)]
    pub ticket_fields_extra: Vec<String>,
    /// Flat amount sponsored on top of the ticket discounts.
    #[serde(default)]
    pub additional_sponsorship: Option<f64>,
    #[serde(default)]
    pub invoice_cvr_no: Option<String>,
    /// Overrides the global invoice cc for this union.
    #[serde(default)]
    pub invoice_cc_email: Option<String>,
}

impl UnionConfig {
    /// Global ticket fields followed by this union's extra fields.
    pub fn report_fields(&self, ticket_fields: &[String]) -> Vec<String> {
        ticket_fields.iter().chain(self.ticket_fields_extra.iter()).cloned().collect()
    }
}

impl Config {
    /// Check the rules serde cannot express.
    ///
    /// # Errors
    /// Returns `TicketMailError::Config` naming the offending field.
    pub fn validate(&self) -> Result<()> {
        require("platform.organization", &self.platform.organization)?;
        require("platform.username", &self.platform.username)?;
        require("platform.password", &self.platform.password)?;
        require("smtp.host", &self.smtp.host)?;
        require("event_name", &self.event_name)?;
        require("invoice.number_prefix", &self.invoice.number_prefix)?;

        if self.ticket_fields.is_empty() {
            return Err(TicketMailError::Config("ticket_fields must not be empty".into()));
        }
        if self.unions.is_empty() {
            return Err(TicketMailError::Config("unions must not be empty".into()));
        }

        let mut seen = HashSet::new();
        for (index, union) in self.unions.iter().enumerate() {
            require(&format!("unions[{index}].name"), &union.name)?;
            require(&format!("unions[{index}].to_email"), &union.to_email)?;
            require(&format!("unions[{index}].from_email"), &union.from_email)?;
            if !seen.insert(union.name.as_str()) {
                return Err(TicketMailError::Config(format!(
                    "union name '{}' is configured more than once",
                    union.name
                )));
            }
            if let Some(amount) = union.additional_sponsorship {
                if !amount.is_finite() || amount < 0.0 {
                    return Err(TicketMailError::Config(format!(
                        "unions[{index}].additional_sponsorship must be a non-negative amount"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Warning text when the invoice gate opens before the final status gate.
    pub fn schedule_warning(&self) -> Option<String> {
        (self.schedule.days_until_invoice < self.schedule.days_until_final_status).then(|| {
            format!(
                "schedule.days_until_invoice ({}) is lower than schedule.days_until_final_status ({})",
                self.schedule.days_until_invoice, self.schedule.days_until_final_status
            )
        })
    }

    /// Look up a union by name.
    pub fn union(&self, name: &str) -> Option<&UnionConfig> {
        self.unions.iter().find(|union| union.name == name)
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(TicketMailError::Config(format!("missing required field `{field}`")))
    } else {
        Ok(())
    }
}

fn default_http_timeout() -> u64 {
    30
}

fn default_smtp_port() -> u16 {
    465
}

fn default_locale() -> String {
    "da".into()
}

fn default_buyer_group_priority() -> Vec<String> {
    vec!["Voksen".into(), "Alle dage".into()]
}

fn default_currency() -> String {
    "DKK".into()
}

fn default_pdf_timeout() -> u64 {
    60
}

fn default_status_template() -> String {
    "Hej {{ to_name }}\n\
     \n\
     Hermed billetter med tilskud fra {{ union_name }}. \
     Skulle der være solgt {{ union_name }}-billetter til personer der viser sig ikke at være medlem, \
     så må I lige sige til.\n\
     \n\
     ---=== Billet Info ===---\n\
     {{ ticket_info_text }}\n\
     \n\
     Mvh. {{ from_name }}\n\
     {{ extra_text }}\n\
     \n\
     PS Hvis der mangler information eller hvis I har ønsker til hvordan vi gør denne mail bedre, \
     så vil jeg gøre mit bedste for at efterkomme dem."
        .into()
}

fn default_status_no_tickets() -> String {
    "Der er ikke blevet solgt nogle billetter endnu".into()
}

fn default_invoice_template() -> String {
    "Hej {{ to_name }}\n\
     \n\
     Vi takker mange gange for støtten fra {{ union_name }}. \
     {{ event_name }} er ovre og det gik rigtig godt :D\n\
     Så som det sidste sender vi jer hermed faktura, \
     og vi håber selvfølgelig, at I vil støtte os igen næste gang :)\n\
     \n\
     Mvh. {{ from_name }}\n\
     {{ extra_text }}"
        .into()
}

fn default_no_invoice_template() -> String {
    "Hej {{ to_name }}\n\
     \n\
     Vi takker mange gange for støtten fra {{ union_name }}. \
     {{ event_name }} er ovre og det gik rigtig godt :D\n\
     Vi har (desværre) ingen faktura til jer, da der ikke er blevet solgt nogle billetter til {{ union_name }}. \
     Vi håber dog stadigvæk, at I vil støtte os igen næste gang ;)\n\
     \n\
     Mvh. {{ from_name }}\n\
     {{ extra_text }}"
        .into()
}
