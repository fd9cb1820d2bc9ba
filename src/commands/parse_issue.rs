// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Issue commands - parse a submission issue, optionally adding it to the registry

use crate::config::Config;
use crate::prelude::*;
use crate::store::{FileStore, RecordStore};
use crate::submission::parse_submission;
use crate::template::TemplateFields;
use sha2::{Digest, Sha256};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Prefix of the heredoc delimiter for multi-line GitHub Actions outputs
const OUTPUT_DELIMITER: &str = "ECOSYSTEM_SUBMISSION_EOF";

/// Where the issue body comes from
#[derive(Debug, Clone, Default)]
pub struct IssueBody {
    /// Body passed inline
    pub body: Option<String>,
    /// File holding the body
    pub body_file: Option<PathBuf>,
}

impl IssueBody {
    fn read(self) -> Result<String> {
        match (self.body, self.body_file) {
            (Some(body), None) => Ok(body),
            (None, Some(path)) => fs::read_to_string(&path)
                .with_context(|| format!("Failed to read issue body from {}", path.display())),
            (Some(_), Some(_)) => anyhow::bail!("Use either --body or --body-file, not both"),
            (None, None) => anyhow::bail!("An issue body is required (--body or --body-file)"),
        }
    }
}

fn parse(config: &Config, body: IssueBody) -> Result<Record> {
    let body = body.read()?;
    let fields = TemplateFields::load(&config.template_path)?;
    let record = parse_submission(&body, &fields).context("Failed to parse submission issue")?;
    Ok(record)
}

/// Run the parse-issue command
pub fn run(config: &Config, body: IssueBody, json: bool) -> Result<()> {
    let record = parse(config, body)?;
    info!("Parsed submission for {}", record.url);

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    let outputs = submission_outputs(&record);
    match std::env::var_os("GITHUB_OUTPUT") {
        Some(path) => {
            let path = PathBuf::from(path);
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            write_action_outputs(&mut file, &outputs)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            for (key, value) in &outputs {
                writeln!(stdout, "{key}={value}")?;
            }
        }
    }

    Ok(())
}

/// Run the add-from-issue command
pub fn run_add(config: &Config, body: IssueBody) -> Result<()> {
    let record = parse(config, body)?;

    let mut store = FileStore::open(&config.resources_dir)
        .with_context(|| format!("Failed to open registry in {}", config.resources_dir.display()))?;
    let url = record.url.clone();
    store.write(record)?;

    println!("Added {url}");
    Ok(())
}

/// GitHub Actions outputs describing a parsed submission
#[must_use]
pub fn submission_outputs(record: &Record) -> Vec<(&'static str, String)> {
    let optional = |value: &Option<String>| value.clone().unwrap_or_default();
    vec![
        ("SUBMISSION_NAME", record.name.clone()),
        ("SUBMISSION_REPO", record.url.clone()),
        ("SUBMISSION_DESCRIPTION", record.description.clone()),
        ("SUBMISSION_LICENCE", record.licence.clone()),
        ("SUBMISSION_CONTACT", optional(&record.contact_info)),
        ("SUBMISSION_ALTERNATIVES", optional(&record.alternatives)),
        ("SUBMISSION_AFFILIATIONS", optional(&record.affiliations)),
        ("SUBMISSION_LABELS", record.labels.join(",")),
        ("SUBMISSION_WEBSITE", optional(&record.website)),
    ]
}

/// Heredoc delimiter for one output value, never a line of the value itself
fn heredoc_delimiter(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let hash = hex::encode(hasher.finalize());
    let mut delimiter = format!("{OUTPUT_DELIMITER}_{}", &hash[..16]);
    while value.contains(&delimiter) {
        delimiter.push('_');
    }
    delimiter
}

/// Write outputs in the `$GITHUB_OUTPUT` heredoc format
pub fn write_action_outputs(out: &mut impl Write, outputs: &[(&str, String)]) -> std::io::Result<()> {
    for (key, value) in outputs {
        let delimiter = heredoc_delimiter(value);
        writeln!(out, "{key}<<{delimiter}")?;
        writeln!(out, "{value}")?;
        writeln!(out, "{delimiter}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outputs_blank_absent_values() {
        let mut record = Record::new("Foo", "https://github.com/x/foo");
        record.labels = vec!["a".into(), "b".into()];

        let outputs = submission_outputs(&record);

        assert_eq!(outputs[0], ("SUBMISSION_NAME", "Foo".to_string()));
        assert_eq!(outputs[4], ("SUBMISSION_CONTACT", String::new()));
        assert_eq!(outputs[7], ("SUBMISSION_LABELS", "a,b".to_string()));
    }

    /// Read `$GITHUB_OUTPUT` heredocs back the way the runner does
    fn read_action_outputs(text: &str) -> Vec<(String, String)> {
        let mut outputs = Vec::new();
        let mut lines = text.lines();
        while let Some(header) = lines.next() {
            let (key, delimiter) = header.split_once("<<").unwrap();
            let value: Vec<&str> = lines.by_ref().take_while(|line| *line != delimiter).collect();
            outputs.push((key.to_string(), value.join("\n")));
        }
        outputs
    }

    #[test]
    fn test_write_action_outputs_heredoc() {
        let mut out = Vec::new();
        write_action_outputs(&mut out, &[("SUBMISSION_NAME", "Foo".to_string())]).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("SUBMISSION_NAME<<ECOSYSTEM_SUBMISSION_EOF_"));
        assert_eq!(read_action_outputs(&text), [("SUBMISSION_NAME".to_string(), "Foo".to_string())]);
    }

    #[test]
    fn test_value_cannot_close_heredoc_early() {
        let hostile = format!("first line\n{OUTPUT_DELIMITER}\nSUBMISSION_REPO<<{OUTPUT_DELIMITER}");
        let outputs = [
            ("SUBMISSION_DESCRIPTION", OUTPUT_DELIMITER.to_string()),
            ("SUBMISSION_NAME", hostile.clone()),
            ("SUBMISSION_REPO", "https://github.com/x/foo".to_string()),
        ];

        let mut out = Vec::new();
        write_action_outputs(&mut out, &outputs).unwrap();
        let read = read_action_outputs(&String::from_utf8(out).unwrap());

        assert_eq!(
            read,
            [
                ("SUBMISSION_DESCRIPTION".to_string(), OUTPUT_DELIMITER.to_string()),
                ("SUBMISSION_NAME".to_string(), hostile),
                ("SUBMISSION_REPO".to_string(), "https://github.com/x/foo".to_string()),
            ]
        );
    }

    #[test]
    fn test_body_sources_are_exclusive() {
        let both = IssueBody {
            body: Some("x".into()),
            body_file: Some(PathBuf::from("y")),
        };
        assert!(both.read().is_err());
        assert!(IssueBody::default().read().is_err());
    }
}
