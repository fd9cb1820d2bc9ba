// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Registry maintenance - badges, star counts, test results and test candidates
//!
//! Badge and star batches skip a record when its external call fails and
//! carry on with the next one. Artifact ingestion is all-or-nothing: every
//! artifact is decoded before any result is stored, and one malformed file
//! fails the batch.

use crate::error::{ArtifactDecodeError, StoreError};
use crate::services::{BadgeService, RepoHost};
use crate::store::{FieldChange, RecordStore};
use crate::types::{Record, TestResult, Tier};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Badge color for members whose standard tests pass (or have none)
pub const PASSING_COLOR: &str = "blueviolet";
/// Badge color for members with a failing standard test
pub const FAILING_COLOR: &str = "gray";

/// Outcome of a maintenance batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Records (or artifacts) that were applied
    pub updated: usize,
    /// Urls of records that were skipped
    pub skipped: Vec<String>,
}

impl BatchReport {
    fn skip(&mut self, url: &str) {
        self.skipped.push(url.to_string());
    }
}

// =============================================================================
// Tier iteration
// =============================================================================

/// Records with the given tier, in store order
pub fn records_in_tier(records: &[Record], tier: Tier) -> impl Iterator<Item = &Record> {
    records.iter().filter(move |r| r.tier == tier)
}

/// Every tier in canonical order, paired with its records in store order
pub fn by_tier(records: &[Record]) -> impl Iterator<Item = (Tier, Vec<&Record>)> {
    Tier::ALL
        .into_iter()
        .map(move |tier| (tier, records_in_tier(records, tier).collect()))
}

// =============================================================================
// Badges
// =============================================================================

/// True unless some `standard` result failed. A later pass does not undo a failure.
#[must_use]
pub fn standard_tests_passed(record: &Record) -> bool {
    let mut passed = true;
    for result in &record.tests_results {
        if result.test_type == TestResult::STANDARD && !result.passed {
            passed = false;
        }
    }
    passed
}

/// Badge color for a record
#[must_use]
pub fn badge_color(record: &Record) -> &'static str {
    if standard_tests_passed(record) {
        PASSING_COLOR
    } else {
        FAILING_COLOR
    }
}

/// File name of a record's badge inside the badges directory
#[must_use]
pub fn badge_file_name(record: &Record) -> String {
    format!("{}.svg", record.name.replace(['/', '\\'], "-"))
}

/// Fetch a badge for every record and write it to `badges_dir`
pub fn update_badges(
    store: &impl RecordStore,
    badges: &impl BadgeService,
    badges_dir: &Path,
) -> Result<BatchReport> {
    let records = store.read_all().context("Failed to read registry")?;
    fs::create_dir_all(badges_dir)
        .with_context(|| format!("Failed to create directory {}", badges_dir.display()))?;

    let mut report = BatchReport::default();
    for (tier, members) in by_tier(&records) {
        for record in members {
            let color = badge_color(record);
            let svg = match badges.fetch(&record.name, tier.as_str(), color) {
                Ok(svg) => svg,
                Err(e) => {
                    warn!("Skipping badge for {}: {}", record.name, e);
                    report.skip(&record.url);
                    continue;
                }
            };

            let path = badges_dir.join(badge_file_name(record));
            fs::write(&path, svg).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Badge for {} has been updated.", record.name);
            report.updated += 1;
        }
    }

    Ok(report)
}

// =============================================================================
// Stars
// =============================================================================

/// `(owner, repo)` from the last two path segments of a repository url.
///
/// One trailing slash is ignored.
#[must_use]
pub fn owner_repo(url: &str) -> Option<(&str, &str)> {
    let trimmed = url.strip_suffix('/').unwrap_or(url);
    let mut segments = trimmed.rsplit('/');
    let repo = segments.next()?;
    let owner = segments.next()?;
    (!owner.is_empty() && !repo.is_empty()).then_some((owner, repo))
}

/// Refresh the star count of every record from the hosting platform
pub fn update_stars(store: &mut impl RecordStore, host: &impl RepoHost) -> Result<BatchReport> {
    let records = store.read_all().context("Failed to read registry")?;

    let mut report = BatchReport::default();
    for (_, members) in by_tier(&records) {
        for record in members {
            let Some((owner, repo)) = owner_repo(&record.url) else {
                warn!("Cannot derive owner/repo from {}", record.url);
                report.skip(&record.url);
                continue;
            };

            let stars = match host.repo_info(owner, repo) {
                Ok(info) => info.stars,
                Err(e) => {
                    warn!("Bad response for project {}: {}", record.url, e);
                    report.skip(&record.url);
                    continue;
                }
            };

            store
                .update(&record.url, &[FieldChange::Stars(stars)])
                .with_context(|| format!("Failed to store star count for {}", record.url))?;
            info!("Updating star count for {}: {}", record.url, stars);
            report.updated += 1;
        }
    }

    Ok(report)
}

// =============================================================================
// Test results
// =============================================================================

/// All `*.json` files under `root`, in path order
pub fn discover_artifacts(root: &Path) -> Result<Vec<PathBuf>, ArtifactDecodeError> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| ArtifactDecodeError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        let is_json = entry.path().extension().is_some_and(|ext| ext == "json");
        if entry.file_type().is_file() && is_json {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}

/// Decode one artifact into the record url it targets and its test result
pub fn decode_artifact(path: &Path) -> Result<(String, TestResult), ArtifactDecodeError> {
    let content = fs::read_to_string(path).map_err(|source| ArtifactDecodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let json = |source| ArtifactDecodeError::Json {
        path: path.to_path_buf(),
        source,
    };

    let value: serde_json::Value = serde_json::from_str(&content).map_err(json)?;
    let serde_json::Value::Object(mut fields) = value else {
        return Err(ArtifactDecodeError::NotAnObject {
            path: path.to_path_buf(),
        });
    };

    let repo_name = match fields.remove("repo_name") {
        Some(serde_json::Value::String(name)) if !name.is_empty() => name,
        _ => {
            return Err(ArtifactDecodeError::MissingRepoName {
                path: path.to_path_buf(),
            })
        }
    };
    fields.retain(|_, v| !v.is_null());

    let result: TestResult = serde_json::from_value(serde_json::Value::Object(fields)).map_err(json)?;
    Ok((format!("https://github.com/{repo_name}"), result))
}

/// Append the test result of every artifact under `root` to its record.
///
/// Artifacts for urls the registry does not know are skipped.
pub fn ingest_artifacts(store: &mut impl RecordStore, root: &Path) -> Result<BatchReport> {
    let paths = discover_artifacts(root)?;
    let decoded = paths
        .iter()
        .map(|path| decode_artifact(path))
        .collect::<Result<Vec<_>, _>>()?;
    debug!("Decoded {} artifacts under {}", decoded.len(), root.display());

    let mut report = BatchReport::default();
    for (url, result) in decoded {
        let test_type = result.test_type.clone();
        match store.append_test_result(&url, result) {
            Ok(()) => {
                info!("Added {} test result for {}", test_type, url);
                report.updated += 1;
            }
            Err(StoreError::UnknownRecord(_)) => {
                warn!("No registry record for {}, skipping its test result", url);
                report.skip(&url);
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to store test result for {url}")),
        }
    }

    Ok(report)
}

// =============================================================================
// Test candidates
// =============================================================================

/// `owner/repo` from the fourth and fifth `/`-separated pieces of a url
#[must_use]
pub fn candidate_name(url: &str) -> Option<String> {
    let segments: Vec<&str> = url.split('/').collect();
    match (segments.get(3), segments.get(4)) {
        (Some(owner), Some(repo)) if !owner.is_empty() && !repo.is_empty() => {
            Some(format!("{owner}/{repo}"))
        }
        _ => None,
    }
}

/// `owner/repo` of every record that is not excluded from testing, in store order
#[must_use]
pub fn test_candidates(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .filter(|r| !r.skip_tests)
        .filter_map(|r| {
            let name = candidate_name(&r.url);
            if name.is_none() {
                warn!("Cannot derive owner/repo from {}", r.url);
            }
            name
        })
        .collect()
}
