// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Ecosystem registry library - curated registry of ecosystem member repositories
//!
//! This crate turns issue-form submissions into registry records and keeps
//! derived registry state (tier badges, star counts, test results) in sync
//! with external sources.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod commands;
pub mod config;
pub mod error;
pub mod maintenance;
pub mod markdown;
pub mod services;
pub mod store;
pub mod submission;
pub mod template;

/// Core data types for registry records
pub mod types {
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;
    use std::fmt;
    use std::str::FromStr;

    use crate::error::ValidationError;

    // =========================================================================
    // Tier
    // =========================================================================

    /// Classification level of a registry member
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    pub enum Tier {
        /// Maintained alongside the core project
        Main,
        /// Established member of the ecosystem
        Member,
        /// Under review for membership
        Candidate,
        /// Community-submitted project
        #[default]
        Community,
    }

    impl Tier {
        /// Every tier, in canonical iteration order
        pub const ALL: [Self; 4] = [Self::Main, Self::Member, Self::Candidate, Self::Community];

        /// Display name, also the serialized form
        #[must_use]
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Main => "Main",
                Self::Member => "Member",
                Self::Candidate => "Candidate",
                Self::Community => "Community",
            }
        }
    }

    impl fmt::Display for Tier {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    impl FromStr for Tier {
        type Err = ValidationError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            Self::ALL
                .into_iter()
                .find(|tier| tier.as_str() == s)
                .ok_or_else(|| ValidationError::UnknownTier(s.to_string()))
        }
    }

    // =========================================================================
    // Test Result
    // =========================================================================

    /// Outcome of one automated test run against a member repository.
    ///
    /// Only `test_type` and `passed` are interpreted. Everything else the test
    /// producer reports (package, version, logs link, timestamp, ...) is kept
    /// as-is in `metadata` and written back unchanged.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct TestResult {
        /// Kind of test, e.g. "standard"
        pub test_type: String,
        /// Whether the run passed
        pub passed: bool,
        /// Auxiliary fields reported by the test producer
        #[serde(flatten)]
        pub metadata: BTreeMap<String, serde_json::Value>,
    }

    impl TestResult {
        /// Test type whose outcome drives the tier badge color
        pub const STANDARD: &'static str = "standard";

        /// Create a result with no auxiliary metadata
        #[must_use]
        pub fn new(test_type: impl Into<String>, passed: bool) -> Self {
            Self {
                test_type: test_type.into(),
                passed,
                metadata: BTreeMap::new(),
            }
        }

        /// Auxiliary field reported by the test producer
        #[must_use]
        pub fn metadata(&self, key: &str) -> Option<&serde_json::Value> {
            self.metadata.get(key)
        }
    }

    // =========================================================================
    // Record
    // =========================================================================

    /// One tracked repository in the registry, keyed by `url`
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Record {
        /// Display name
        pub name: String,
        /// Canonical source repository URL (identity key)
        pub url: String,
        /// Free-text description
        #[serde(default)]
        pub description: String,
        /// Licence identifier
        #[serde(default)]
        pub licence: String,
        /// Maintainer email or handle
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub contact_info: Option<String>,
        /// Alternative projects
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub alternatives: Option<String>,
        /// University, company or other affiliations
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub affiliations: Option<String>,
        /// Ordered labels (duplicates kept)
        #[serde(default)]
        pub labels: Vec<String>,
        /// Project website
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub website: Option<String>,
        /// Classification tier
        #[serde(default)]
        pub tier: Tier,
        /// Star count from the hosting platform, unset until first refresh
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub stars: Option<u64>,
        /// Exclude from automated test-candidate selection
        #[serde(default)]
        pub skip_tests: bool,
        /// Test results in append order
        #[serde(default)]
        pub tests_results: Vec<TestResult>,
    }

    impl Record {
        /// Create a community-tier record with only the required fields set
        #[must_use]
        pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
            Self {
                name: name.into(),
                url: url.into(),
                description: String::new(),
                licence: String::new(),
                contact_info: None,
                alternatives: None,
                affiliations: None,
                labels: Vec::new(),
                website: None,
                tier: Tier::default(),
                stars: None,
                skip_tests: false,
                tests_results: Vec::new(),
            }
        }
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::types::*;
    pub use anyhow::{Context, Result};
}
