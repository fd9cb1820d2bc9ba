// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error types for submission parsing, the record store and maintenance batches

use std::path::PathBuf;
use thiserror::Error;

/// The issue template could not be turned into a label to id mapping.
#[derive(Debug, Error)]
pub enum TemplateFormatError {
    /// The template file could not be read.
    #[error("failed to read issue template {path}: {source}")]
    Io {
        /// Template path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The template is not valid issue-form YAML.
    #[error("issue template is not a valid issue form: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A field element has no `id`.
    #[error("form element {index} has no id")]
    MissingId {
        /// Position of the element in the form body
        index: usize,
    },

    /// A field element has no `attributes.label`.
    #[error("form element {index} has no label")]
    MissingLabel {
        /// Position of the element in the form body
        index: usize,
    },

    /// Two field elements share the same label.
    #[error("label '{label}' is used by both '{first}' and '{second}'")]
    DuplicateLabel {
        /// The shared label
        label: String,
        /// Id of the earlier element
        first: String,
        /// Id of the later element
        second: String,
    },

    /// Two field elements share the same id.
    #[error("id '{id}' is used by both '{first}' and '{second}'")]
    DuplicateId {
        /// The shared id
        id: String,
        /// Label of the earlier element
        first: String,
        /// Label of the later element
        second: String,
    },
}

/// A submission section title has no matching template field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown section '{0}' in submission")]
pub struct UnknownSectionError(pub String);

/// A submission does not describe a valid record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent, empty or left as the placeholder.
    #[error("required field '{0}' is missing")]
    MissingField(&'static str),

    /// A field id is not part of the record.
    #[error("field '{0}' is not a record field")]
    UnknownField(String),

    /// The tier is not one of the known tiers.
    #[error("unknown tier '{0}', expected one of Main, Member, Candidate, Community")]
    UnknownTier(String),
}

/// Any failure while turning an issue body into a record.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// Template could not be resolved
    #[error(transparent)]
    Template(#[from] TemplateFormatError),

    /// Section title not in the template
    #[error(transparent)]
    UnknownSection(#[from] UnknownSectionError),

    /// Resulting record is invalid
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// An external service call did not succeed. Batches log and skip on this.
#[derive(Debug, Error)]
pub enum ExternalServiceFailure {
    /// The service answered with a non-success status.
    #[error("{service} answered with status {status}")]
    Status {
        /// Service name
        service: &'static str,
        /// HTTP status code
        status: u16,
    },

    /// The request never produced a usable response.
    #[error("{service} request failed: {message}")]
    Transport {
        /// Service name
        service: &'static str,
        /// Description of the failure
        message: String,
    },

    /// The response body could not be decoded.
    #[error("{service} returned an unreadable body: {message}")]
    Decode {
        /// Service name
        service: &'static str,
        /// Description of the failure
        message: String,
    },
}

/// A test-result artifact is malformed. Fails the whole ingestion batch.
#[derive(Debug, Error)]
pub enum ArtifactDecodeError {
    /// The artifact root could not be walked.
    #[error("failed to walk artifacts under {path}: {source}")]
    Walk {
        /// Artifact root
        path: PathBuf,
        /// Underlying walk error
        source: walkdir::Error,
    },

    /// The artifact could not be read.
    #[error("failed to read artifact {path}: {source}")]
    Io {
        /// Artifact path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The artifact is not a JSON object.
    #[error("artifact {path} is not a JSON object")]
    NotAnObject {
        /// Artifact path
        path: PathBuf,
    },

    /// The artifact has no string `repo_name`.
    #[error("artifact {path} has no repo_name")]
    MissingRepoName {
        /// Artifact path
        path: PathBuf,
    },

    /// The artifact is not valid JSON or not a valid test result.
    #[error("failed to decode artifact {path}: {source}")]
    Json {
        /// Artifact path
        path: PathBuf,
        /// Underlying decode error
        source: serde_json::Error,
    },
}

/// The record store could not complete an operation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a store file failed.
    #[error("store I/O failed on {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The source-of-truth file could not be decoded.
    #[error("failed to parse {path}: {source}")]
    Decode {
        /// File path
        path: PathBuf,
        /// Underlying decode error
        source: toml::de::Error,
    },

    /// Records could not be encoded as TOML.
    #[error("failed to encode records: {0}")]
    Encode(#[from] toml::ser::Error),

    /// The snapshot could not be encoded as JSON.
    #[error("failed to encode snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// No record has this url.
    #[error("no record with url {0}")]
    UnknownRecord(String),
}
