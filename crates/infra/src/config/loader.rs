//! Configuration loader
//!
//! Loads the configuration file and fills in credentials from environment
//! variables.
//!
//! ## Loading Strategy
//! 1. Read the file given on the command line, or probe the standard paths
//! 2. Parse it as TOML or JSON, detected by extension
//! 3. Override credentials from the environment
//! 4. Validate the result
//!
//! ## Environment Variables
//! - `TICKETMAIL_PLATFORM_USERNAME`: Ticket platform login
//! - `TICKETMAIL_PLATFORM_PASSWORD`: Ticket platform password
//! - `TICKETMAIL_SMTP_USERNAME`: SMTP login
//! - `TICKETMAIL_SMTP_PASSWORD`: SMTP password
//!
//! ## File Locations
//! Without an explicit path the loader probes (in order):
//! 1. `./ticketmail.toml`, `./ticketmail.json`, `./config.toml`,
//!    `./config.json` (current working directory)
//! 2. The same names next to the executable

use std::path::{Path, PathBuf};

use ticketmail_core::invoice::pricing::resolve_locale;
use ticketmail_domain::{Config, Result, TicketMailError};

use crate::errors::InfraError;

const CONFIG_FILE_NAMES: [&str; 4] = ["ticketmail.toml", "ticketmail.json", "config.toml", "config.json"];

const ENV_PLATFORM_USERNAME: &str = "TICKETMAIL_PLATFORM_USERNAME";
const ENV_PLATFORM_PASSWORD: &str = "TICKETMAIL_PLATFORM_PASSWORD";
const ENV_SMTP_USERNAME: &str = "TICKETMAIL_SMTP_USERNAME";
const ENV_SMTP_PASSWORD: &str = "TICKETMAIL_SMTP_PASSWORD";

/// Load, complete and validate the configuration
///
/// # Errors
/// Returns `TicketMailError::Config` if:
/// - No file is found or it cannot be read
/// - The file format is invalid or has unknown or missing fields
/// - Validation fails after the environment was applied
pub fn load(path: Option<PathBuf>) -> Result<Config> {
    let mut config = load_from_file(path)?;
    apply_env_overrides(&mut config);

    config.validate()?;
    resolve_locale(&config.report.locale)?;
    if let Some(warning) = config.schedule_warning() {
        tracing::warn!(warning = %warning, "config.schedule_inverted");
    }

    tracing::debug!(event_name = %config.event_name, unions = config.unions.len(), "config.loaded");
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations.
///
/// # Errors
/// Returns `TicketMailError::Config` if the file is missing, unreadable or
/// cannot be parsed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(TicketMailError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            TicketMailError::Config(format!(
                "No config file found, pass --config or create one of: {}",
                CONFIG_FILE_NAMES.join(", ")
            ))
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| TicketMailError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents).map_err(|e| TicketMailError::from(InfraError::from(e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| TicketMailError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(TicketMailError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard paths for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    // Try current working directory
    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(CONFIG_FILE_NAMES.iter().map(|name| cwd.join(name)));
    }

    // Try relative to executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(CONFIG_FILE_NAMES.iter().map(|name| exe_dir.join(name)));
        }
    }

    candidates.into_iter().find(|path| path.is_file())
}

/// Replace credentials with the values of their environment variables
///
/// Unset or empty variables leave the file value untouched.
pub fn apply_env_overrides(config: &mut Config) {
    let overrides = [
        (ENV_PLATFORM_USERNAME, &mut config.platform.username),
        (ENV_PLATFORM_PASSWORD, &mut config.platform.password),
        (ENV_SMTP_USERNAME, &mut config.smtp.username),
        (ENV_SMTP_PASSWORD, &mut config.smtp.password),
    ];

    for (key, target) in overrides {
        if let Some(value) = env_var(key) {
            tracing::debug!(variable = key, "config.env_override");
            *target = value;
        }
    }
}

/// Non-empty environment variable
fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const MINIMAL_TOML: &str = r#"
event_name = "SummerHack 2024"
ticket_fields = ["Navn"]

[platform]
organization = "example"
username = "file-user"
password = "file-password"

[smtp]
host = "smtp.example.com"

[schedule]
days_until_final_status = 3
days_until_invoice = 17

[invoice]
number_prefix = "EVENT"
sender_name = "Sender"
sender_cvr_no = "0000"
contact_email = "contact@example.com"
sender_address = "Street 1"
sender_zip_code = "1000"
sender_city = "City"
registration_no = "0000"
account_no = "0000000"

[[unions]]
name = "Union1"
subject = "Status"
to_name = "To"
to_email = "to@union.org"
from_name = "From"
from_email = "from@event.com"
ticket_type_names = ["Voksen"]
invoice_subject = "Invoice"
invoice_address = "Street 2"
invoice_zip_code = "2000"
invoice_city = "Town"
"#;

    fn write_config(contents: &str, extension: &str) -> (NamedTempFile, PathBuf) {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        let path = temp_file.path().with_extension(extension);
        std::fs::copy(temp_file.path(), &path).unwrap();
        (temp_file, path)
    }

    fn clear_env() {
        for key in [ENV_PLATFORM_USERNAME, ENV_PLATFORM_PASSWORD, ENV_SMTP_USERNAME, ENV_SMTP_PASSWORD] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_file_toml() {
        let (_temp, path) = write_config(MINIMAL_TOML, "toml");

        let config = load_from_file(Some(path.clone())).expect("Should load config from TOML file");
        assert_eq!(config.event_name, "SummerHack 2024");
        assert_eq!(config.smtp.port, 465);
        assert_eq!(config.report.locale, "da");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_json() {
        let value: toml::Value = toml::from_str(MINIMAL_TOML).unwrap();
        let (_temp, path) = write_config(&serde_json::to_string(&value).unwrap(), "json");

        let config = load_from_file(Some(path.clone())).expect("Should load config from JSON file");
        assert_eq!(config.unions[0].name, "Union1");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/ticketmail.toml")));
        assert!(matches!(result, Err(TicketMailError::Config(_))), "Should be a Config error");
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("some content", Path::new("ticketmail.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }

    #[test]
    fn test_parse_config_rejects_unknown_fields() {
        let contents = MINIMAL_TOML.replace("[smtp]", "[smtp]\nhots = \"typo\"");
        let err = parse_config(&contents, Path::new("ticketmail.toml")).unwrap_err();
        assert!(matches!(err, TicketMailError::Config(ref msg) if msg.contains("hots")));
    }

    #[test]
    fn test_env_overrides_credentials() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let mut config = parse_config(MINIMAL_TOML, Path::new("ticketmail.toml")).unwrap();
        std::env::set_var(ENV_PLATFORM_PASSWORD, "env-password");
        std::env::set_var(ENV_SMTP_USERNAME, "mailer@example.com");
        std::env::set_var(ENV_PLATFORM_USERNAME, "   ");

        apply_env_overrides(&mut config);
        assert_eq!(config.platform.username, "file-user");
        assert_eq!(config.platform.password, "env-password");
        assert_eq!(config.smtp.username, "mailer@example.com");

        clear_env();
    }

    #[test]
    fn test_load_requires_credentials_from_somewhere() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let contents = MINIMAL_TOML.replace("password = \"file-password\"", "");
        let (_temp, path) = write_config(&contents, "toml");

        let err = load(Some(path.clone())).unwrap_err();
        assert_eq!(err, TicketMailError::Config("missing required field `platform.password`".into()));

        std::env::set_var(ENV_PLATFORM_PASSWORD, "from-env");
        let config = load(Some(path.clone())).expect("env password should satisfy validation");
        assert_eq!(config.platform.password, "from-env");

        clear_env();
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_rejects_unknown_locale() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let contents = format!("{MINIMAL_TOML}\n[report]\nlocale = \"klingon\"\n");
        let (_temp, path) = write_config(&contents, "toml");

        let err = load(Some(path.clone())).unwrap_err();
        assert!(matches!(err, TicketMailError::Config(ref msg) if msg.contains("klingon")));

        std::fs::remove_file(path).ok();
    }
}
