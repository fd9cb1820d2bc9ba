// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Record store - the registry's persistent records, keyed by url
//!
//! `members.toml` is the human-editable source of truth and keeps records in
//! insertion order. `members.json` is a canonical snapshot rebuilt by
//! [`RecordStore::recompile`].

use crate::error::StoreError;
use crate::types::{Record, TestResult, Tier};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Source-of-truth file name inside the resources directory
pub const SOURCE_FILE: &str = "members.toml";
/// Snapshot file name inside the resources directory
pub const SNAPSHOT_FILE: &str = "members.json";

/// A single field change applied by [`RecordStore::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldChange {
    /// Set the star count
    Stars(u64),
    /// Move the record to another tier
    Tier(Tier),
}

impl FieldChange {
    fn apply(self, record: &mut Record) {
        match self {
            Self::Stars(stars) => record.stars = Some(stars),
            Self::Tier(tier) => record.tier = tier,
        }
    }
}

/// Persistence contract for registry records
pub trait RecordStore {
    /// All records in insertion order
    fn read_all(&self) -> Result<Vec<Record>, StoreError>;

    /// Insert a record, replacing any record with the same url in place
    fn write(&mut self, record: Record) -> Result<(), StoreError>;

    /// Apply field changes to the record with this url.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownRecord`] when no record has the url.
    fn update(&mut self, url: &str, changes: &[FieldChange]) -> Result<(), StoreError>;

    /// Append a test result to the record with this url.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownRecord`] when no record has the url.
    fn append_test_result(&mut self, url: &str, result: TestResult) -> Result<(), StoreError>;

    /// Rebuild the canonical snapshot from the source of truth
    fn recompile(&self) -> Result<(), StoreError>;
}

/// On-disk layout of `members.toml`
#[derive(Debug, Default, Serialize, Deserialize)]
struct MembersFile {
    #[serde(default)]
    members: Vec<Record>,
}

/// File-backed store rooted at a resources directory
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    records: Vec<Record>,
}

impl FileStore {
    /// Open the store in `dir`. A missing source file is an empty registry.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        let source_path = dir.join(SOURCE_FILE);

        let file: MembersFile = if source_path.exists() {
            let content = fs::read_to_string(&source_path).map_err(|source| StoreError::Io {
                path: source_path.clone(),
                source,
            })?;
            toml::from_str(&content).map_err(|source| StoreError::Decode {
                path: source_path.clone(),
                source,
            })?
        } else {
            MembersFile::default()
        };

        debug!("Loaded {} records from {}", file.members.len(), source_path.display());

        Ok(Self {
            dir: dir.to_path_buf(),
            records: file.members,
        })
    }

    /// Resources directory this store lives in
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Get a record by url
    #[must_use]
    pub fn get(&self, url: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.url == url)
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the registry has no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn get_mut(&mut self, url: &str) -> Result<&mut Record, StoreError> {
        self.records
            .iter_mut()
            .find(|r| r.url == url)
            .ok_or_else(|| StoreError::UnknownRecord(url.to_string()))
    }

    fn save(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let source_path = self.dir.join(SOURCE_FILE);
        let file = MembersFile {
            members: self.records.clone(),
        };
        let content = toml::to_string_pretty(&file)?;
        write_file(&source_path, &content)
    }
}

impl RecordStore for FileStore {
    fn read_all(&self) -> Result<Vec<Record>, StoreError> {
        Ok(self.records.clone())
    }

    fn write(&mut self, record: Record) -> Result<(), StoreError> {
        if let Some(existing) = self.records.iter_mut().find(|r| r.url == record.url) {
            *existing = record;
        } else {
            self.records.push(record);
        }
        self.save()
    }

    fn update(&mut self, url: &str, changes: &[FieldChange]) -> Result<(), StoreError> {
        let record = self.get_mut(url)?;
        for change in changes {
            change.apply(record);
        }
        self.save()
    }

    fn append_test_result(&mut self, url: &str, result: TestResult) -> Result<(), StoreError> {
        self.get_mut(url)?.tests_results.push(result);
        self.save()
    }

    fn recompile(&self) -> Result<(), StoreError> {
        let mut records: Vec<&Record> = self.records.iter().collect();
        records.sort_by(|a, b| a.tier.cmp(&b.tier).then_with(|| a.url.cmp(&b.url)));

        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let snapshot_path = self.dir.join(SNAPSHOT_FILE);
        let mut content = serde_json::to_string_pretty(&records)?;
        content.push('\n');
        write_file(&snapshot_path, &content)
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), StoreError> {
    fs::write(path, content).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}
