//! Manually entered tickets kept as YAML next to the event's ledger
//!
//! Every `*.yaml`/`*.yml` file in the folder is a list of tickets, each a map
//! from export field name to value. Files are read in file-name order.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use ticketmail_core::ManualTicketFile;
use ticketmail_domain::constants::{FIELD_TICKET_TYPE, MANUAL_TICKET_TEMPLATE_FILE};
use ticketmail_domain::{Result, TicketMailError, TicketRow};

use crate::errors::to_domain;

const TEMPLATE_HEADER: &str = "\
# Copy this file to <name>.yaml and add one entry per ticket.
# `Billettype` must be one of the event's ticket types (see --tickets).
# Fields left out are reported as missing when a union shows them.
";

/// Load every manual-ticket file in `dir`. A missing folder means no files.
///
/// # Errors
/// Returns `TicketMailError::Config` naming the file when it is not a list of
/// flat maps, and `TicketMailError::Io` when the folder cannot be read.
pub fn load_manual_tickets(dir: &Path) -> Result<Vec<ManualTicketFile>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(to_domain)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.is_file() && is_yaml(path))
        .collect();
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let text = fs::read_to_string(&path).map_err(to_domain)?;
            let rows = parse_tickets(&text)
                .map_err(|err| TicketMailError::Config(format!("{}: {err}", path.display())))?;
            tracing::debug!(path = %path.display(), rows = rows.len(), "manual_tickets.loaded");
            Ok(ManualTicketFile { path, rows })
        })
        .collect()
}

/// Create `dir` and write a template listing every export field.
///
/// Returns the path of the written template.
pub fn write_template(dir: &Path, fields: &[String]) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(to_domain)?;

    let mut sorted: Vec<&String> = fields.iter().collect();
    sorted.sort();
    let ticket: BTreeMap<&str, &str> = sorted
        .into_iter()
        .map(|field| (field.as_str(), if field == FIELD_TICKET_TYPE { "<ticket type>" } else { "" }))
        .collect();
    let body = serde_yaml::to_string(&vec![ticket]).map_err(to_domain)?;

    let path = dir.join(MANUAL_TICKET_TEMPLATE_FILE);
    fs::write(&path, format!("{TEMPLATE_HEADER}{body}")).map_err(to_domain)?;
    tracing::info!(path = %path.display(), fields = fields.len(), "manual_tickets.template_written");
    Ok(path)
}

fn is_yaml(path: &Path) -> bool {
    matches!(path.extension().and_then(|ext| ext.to_str()), Some("yaml" | "yml"))
}

fn parse_tickets(text: &str) -> std::result::Result<Vec<TicketRow>, String> {
    let blank = text.lines().map(str::trim).all(|line| line.is_empty() || line.starts_with('#'));
    if blank {
        return Ok(Vec::new());
    }

    let document: Value = serde_yaml::from_str(text).map_err(|err| err.to_string())?;
    let entries = match document {
        Value::Null => return Ok(Vec::new()),
        Value::Sequence(entries) => entries,
        _ => return Err("expected a list of tickets".into()),
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let Value::Mapping(map) = entry else {
                return Err(format!("ticket {} is not a map of fields", index + 1));
            };
            map.into_iter()
                .map(|(key, value)| {
                    let field = scalar_text(key)
                        .ok_or_else(|| format!("ticket {} has a non-text field name", index + 1))?;
                    let text = scalar_text(value).ok_or_else(|| {
                        format!("field '{field}' of ticket {} is not a plain value", index + 1)
                    })?;
                    Ok((field, text))
                })
                .collect::<std::result::Result<TicketRow, String>>()
        })
        .collect()
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_yaml_files_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.yml"), "- Billettype: Barn\n  Navn: Bob\n").unwrap();
        fs::write(
            dir.path().join("a.yaml"),
            "- Billettype: Voksen\n  Navn: Ada\n  Pris: 100\n- Billettype: Voksen\n  Navn: Eve\n",
        )
        .unwrap();
        fs::write(dir.path().join(MANUAL_TICKET_TEMPLATE_FILE), "- Billettype: x\n").unwrap();
        fs::write(dir.path().join("empty.yaml"), "# nothing yet\n").unwrap();

        let files = load_manual_tickets(dir.path()).unwrap();
        let names: Vec<_> =
            files.iter().map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned()).collect();
        assert_eq!(names, vec!["a.yaml", "b.yml", "empty.yaml"]);
        assert_eq!(files[0].rows.len(), 2);
        assert_eq!(files[0].rows[0].get("Pris").unwrap(), "100");
        assert_eq!(files[1].rows[0].ticket_type(), Some("Barn"));
        assert!(files[2].rows.is_empty());
    }

    #[test]
    fn missing_folder_has_no_tickets() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_manual_tickets(&dir.path().join("absent")).unwrap().is_empty());
    }

    #[test]
    fn nested_values_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.yaml"), "- Navn:\n    first: Ada\n").unwrap();

        let err = load_manual_tickets(dir.path()).unwrap_err();
        assert!(matches!(err, TicketMailError::Config(msg) if msg.contains("bad.yaml") && msg.contains("Navn")));
    }

    #[test]
    fn template_lists_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("manual-tickets");
        let fields = vec!["Navn".to_string(), "Billettype".to_string()];

        let path = write_template(&target, &fields).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# Copy this file"));
        assert!(text.contains("<ticket type>"));
        assert!(text.contains("Navn: ''"));

        // the template itself is not loaded as tickets
        assert!(load_manual_tickets(&target).unwrap().is_empty());
    }
}
