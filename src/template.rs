// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Issue template field resolution
//!
//! The submission issue form (GitHub issue-form YAML) names each field twice:
//! a human readable `label`, which is what ends up as a `### ` heading in the
//! rendered issue body, and a stable `id`, which is what the record uses.

use crate::error::TemplateFormatError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Issue form document, only the parts we read
#[derive(Debug, Deserialize)]
struct IssueForm {
    body: Vec<FormElement>,
}

#[derive(Debug, Deserialize)]
struct FormElement {
    #[serde(rename = "type")]
    kind: String,
    id: Option<String>,
    attributes: Option<FormAttributes>,
}

#[derive(Debug, Deserialize)]
struct FormAttributes {
    label: Option<String>,
}

/// Mapping between section titles and field ids, built once per template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateFields {
    by_label: HashMap<String, String>,
    /// Field ids in form order
    ids: Vec<String>,
    /// Labels in form order, parallel to `ids`
    labels: Vec<String>,
}

impl TemplateFields {
    /// Read and resolve the template at `path`
    pub fn load(path: &Path) -> Result<Self, TemplateFormatError> {
        let content = fs::read_to_string(path).map_err(|source| TemplateFormatError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Resolve an issue-form YAML document
    pub fn from_yaml(yaml: &str) -> Result<Self, TemplateFormatError> {
        let form: IssueForm = serde_yaml::from_str(yaml)?;

        let mut pairs = Vec::new();
        for (index, element) in form.body.into_iter().enumerate() {
            if element.kind == "markdown" {
                continue;
            }
            let id = element.id.ok_or(TemplateFormatError::MissingId { index })?;
            let label = element
                .attributes
                .and_then(|a| a.label)
                .ok_or(TemplateFormatError::MissingLabel { index })?;
            pairs.push((label, id));
        }

        Self::from_pairs(pairs)
    }

    /// Build from explicit `(label, id)` pairs
    pub fn from_pairs<L, I>(pairs: impl IntoIterator<Item = (L, I)>) -> Result<Self, TemplateFormatError>
    where
        L: Into<String>,
        I: Into<String>,
    {
        let mut fields = Self::default();
        for (label, id) in pairs {
            let (label, id) = (label.into(), id.into());
            if let Some(first) = fields.by_label.get(&label) {
                return Err(TemplateFormatError::DuplicateLabel {
                    label,
                    first: first.clone(),
                    second: id,
                });
            }
            if let Some(first) = fields.label_for(&id) {
                return Err(TemplateFormatError::DuplicateId {
                    first: first.to_string(),
                    second: label,
                    id,
                });
            }
            fields.ids.push(id.clone());
            fields.labels.push(label.clone());
            fields.by_label.insert(label, id);
        }
        Ok(fields)
    }

    /// Field id for a section title
    #[must_use]
    pub fn id_for(&self, label: &str) -> Option<&str> {
        self.by_label.get(label).map(String::as_str)
    }

    /// Section title for a field id
    #[must_use]
    pub fn label_for(&self, id: &str) -> Option<&str> {
        let index = self.ids.iter().position(|field| field == id)?;
        self.labels.get(index).map(String::as_str)
    }

    /// Field ids in form order
    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Number of fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when the template has no fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM: &str = r#"
name: Ecosystem submission
description: Add a project to the ecosystem
body:
  - type: markdown
    attributes:
      value: Thanks for submitting!
  - type: input
    id: name
    attributes:
      label: Name
  - type: input
    id: url
    attributes:
      label: Repository
  - type: textarea
    id: labels
    attributes:
      label: Labels
"#;

    #[test]
    fn test_resolves_labels_skipping_markdown() {
        let fields = TemplateFields::from_yaml(FORM).unwrap();

        assert_eq!(fields.len(), 3);
        assert_eq!(fields.id_for("Name"), Some("name"));
        assert_eq!(fields.id_for("Repository"), Some("url"));
        assert_eq!(fields.id_for("Thanks for submitting!"), None);
        assert_eq!(fields.label_for("labels"), Some("Labels"));
        assert_eq!(fields.ids(), ["name", "url", "labels"]);
    }

    #[test]
    fn test_duplicate_label_is_an_error() {
        let err = TemplateFields::from_pairs([("Name", "name"), ("Name", "title")]).unwrap_err();

        match err {
            TemplateFormatError::DuplicateLabel { label, first, second } => {
                assert_eq!(label, "Name");
                assert_eq!(first, "name");
                assert_eq!(second, "title");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_id_is_an_error() {
        let err = TemplateFields::from_pairs([("Name", "name"), ("Title", "name")]).unwrap_err();

        match err {
            TemplateFormatError::DuplicateId { id, first, second } => {
                assert_eq!(id, "name");
                assert_eq!(first, "Name");
                assert_eq!(second, "Title");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_label_for_follows_form_order() {
        let fields = TemplateFields::from_pairs([("Repository", "url"), ("Name", "name"), ("Website", "website")]).unwrap();

        assert_eq!(fields.label_for("url"), Some("Repository"));
        assert_eq!(fields.label_for("website"), Some("Website"));
        assert_eq!(fields.label_for("licence"), None);
    }

    #[test]
    fn test_missing_id_is_an_error() {
        let form = "body:\n  - type: input\n    attributes:\n      label: Name\n";
        assert!(matches!(
            TemplateFields::from_yaml(form),
            Err(TemplateFormatError::MissingId { index: 0 })
        ));
    }

    #[test]
    fn test_missing_label_is_an_error() {
        let form = "body:\n  - type: markdown\n    attributes:\n      value: hi\n  - type: input\n    id: name\n";
        assert!(matches!(
            TemplateFields::from_yaml(form),
            Err(TemplateFormatError::MissingLabel { index: 1 })
        ));
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(matches!(
            TemplateFields::from_yaml("title: no body here"),
            Err(TemplateFormatError::Yaml(_))
        ));
    }
}
