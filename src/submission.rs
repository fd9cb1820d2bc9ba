// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Submission parsing - issue body markdown to a validated record
//!
//! Nothing in here does I/O: the template is resolved by the caller and the
//! resulting record is persisted by the caller.

use crate::error::{SubmissionError, UnknownSectionError, ValidationError};
use crate::markdown::{normalize, split_sections, Section};
use crate::template::TemplateFields;
use crate::types::{Record, Tier};
use std::collections::HashMap;

/// What an issue form renders for a field left blank
pub const NO_RESPONSE: &str = "_No response_";

/// Field ids a submission may carry
const SUBMISSION_FIELDS: [&str; 10] = [
    "name",
    "url",
    "description",
    "licence",
    "contact_info",
    "alternatives",
    "affiliations",
    "labels",
    "website",
    "tier",
];

/// Parse a raw issue body into a record
pub fn parse_submission(body: &str, fields: &TemplateFields) -> Result<Record, SubmissionError> {
    let sections = split_sections(&normalize(body));
    normalize_submission(&sections, fields)
}

/// Turn split sections into a record, resolving titles through `fields`.
///
/// A later section with the same title overwrites an earlier one.
pub fn normalize_submission(
    sections: &[Section],
    fields: &TemplateFields,
) -> Result<Record, SubmissionError> {
    let mut values: HashMap<&str, Option<String>> = HashMap::new();

    for section in sections {
        let id = fields
            .id_for(&section.title)
            .ok_or_else(|| UnknownSectionError(section.title.clone()))?;
        let value = (section.body.trim() != NO_RESPONSE).then(|| section.body.clone());
        values.insert(id, value);
    }

    Ok(build_record(values)?)
}

/// Split a comma separated label list, dropping empty pieces
#[must_use]
pub fn split_labels(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(String::from)
        .collect()
}

fn build_record(mut values: HashMap<&str, Option<String>>) -> Result<Record, ValidationError> {
    if let Some(unknown) = values
        .keys()
        .copied()
        .filter(|id| !SUBMISSION_FIELDS.contains(id))
        .min()
    {
        return Err(ValidationError::UnknownField(unknown.to_string()));
    }

    let mut take = |id: &str| values.remove(id).flatten();

    let name = take("name")
        .filter(|v| !v.trim().is_empty())
        .ok_or(ValidationError::MissingField("name"))?;
    let url = take("url")
        .filter(|v| !v.trim().is_empty())
        .ok_or(ValidationError::MissingField("url"))?;
    let tier = take("tier")
        .map(|raw| raw.parse::<Tier>())
        .transpose()?
        .unwrap_or_default();

    let mut record = Record::new(name, url);
    record.description = take("description").unwrap_or_default();
    record.licence = take("licence").unwrap_or_default();
    record.contact_info = take("contact_info");
    record.alternatives = take("alternatives");
    record.affiliations = take("affiliations");
    record.labels = take("labels").map(|raw| split_labels(&raw)).unwrap_or_default();
    record.website = take("website");
    record.tier = tier;

    Ok(record)
}

/// Render a record as the issue body the template would produce.
///
/// Fields the template does not know are left out; absent values render as
/// [`NO_RESPONSE`].
#[must_use]
pub fn render_submission(record: &Record, fields: &TemplateFields) -> String {
    let mut out = String::new();

    for id in fields.ids() {
        let Some(label) = fields.label_for(id) else {
            continue;
        };
        let value = match id.as_str() {
            "name" => Some(record.name.clone()),
            "url" => Some(record.url.clone()),
            "description" => Some(record.description.clone()),
            "licence" => Some(record.licence.clone()),
            "contact_info" => record.contact_info.clone(),
            "alternatives" => record.alternatives.clone(),
            "affiliations" => record.affiliations.clone(),
            "labels" => (!record.labels.is_empty()).then(|| record.labels.join(", ")),
            "website" => record.website.clone(),
            "tier" => Some(record.tier.to_string()),
            _ => continue,
        };

        out.push_str("### ");
        out.push_str(label);
        out.push_str("\n\n");
        out.push_str(value.as_deref().unwrap_or(NO_RESPONSE));
        out.push_str("\n\n");
    }

    out
}
