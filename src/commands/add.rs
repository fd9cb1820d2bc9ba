// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Administrative commands - insert a record directly, move a record between tiers

use crate::config::Config;
use crate::prelude::*;
use crate::store::{FieldChange, FileStore, RecordStore};
use crate::submission::split_labels;

/// Arguments for the add command
#[derive(Debug, Clone, Default)]
pub struct AddArgs {
    /// Display name
    pub name: String,
    /// Repository url
    pub url: String,
    /// Description
    pub description: Option<String>,
    /// Licence
    pub licence: Option<String>,
    /// Contact email or handle
    pub contact: Option<String>,
    /// Alternative projects
    pub alternatives: Option<String>,
    /// Affiliations
    pub affiliations: Option<String>,
    /// Comma separated labels
    pub labels: Option<String>,
    /// Tier name
    pub tier: Option<String>,
    /// Website
    pub website: Option<String>,
}

impl AddArgs {
    /// Build the record these arguments describe
    pub fn into_record(self) -> Result<Record> {
        if self.name.trim().is_empty() {
            anyhow::bail!("--name must not be empty");
        }
        if self.url.trim().is_empty() {
            anyhow::bail!("--url must not be empty");
        }

        let mut record = Record::new(self.name, self.url);
        record.description = self.description.unwrap_or_default();
        record.licence = self.licence.unwrap_or_default();
        record.contact_info = self.contact;
        record.alternatives = self.alternatives;
        record.affiliations = self.affiliations;
        record.labels = self.labels.as_deref().map(split_labels).unwrap_or_default();
        record.website = self.website;
        if let Some(tier) = self.tier {
            record.tier = tier.parse()?;
        }
        Ok(record)
    }
}

fn open_store(config: &Config) -> Result<FileStore> {
    FileStore::open(&config.resources_dir)
        .with_context(|| format!("Failed to open registry in {}", config.resources_dir.display()))
}

/// Run the add command
pub fn run(config: &Config, args: AddArgs) -> Result<()> {
    let record = args.into_record()?;
    let mut store = open_store(config)?;

    let replaced = store.get(&record.url).is_some();
    let url = record.url.clone();
    store.write(record)?;

    if replaced {
        println!("Replaced {url}");
    } else {
        println!("Added {url}");
    }
    Ok(())
}

/// Run the set-tier command
pub fn run_set_tier(config: &Config, url: &str, tier: &str) -> Result<()> {
    let tier: Tier = tier.parse()?;
    let mut store = open_store(config)?;

    store.update(url, &[FieldChange::Tier(tier)])?;

    println!("{url} is now {tier}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_record() {
        let args = AddArgs {
            name: "Foo".into(),
            url: "https://github.com/x/foo".into(),
            labels: Some("a, b,".into()),
            tier: Some("Member".into()),
            ..AddArgs::default()
        };

        let record = args.into_record().unwrap();

        assert_eq!(record.labels, ["a", "b"]);
        assert_eq!(record.tier, Tier::Member);
        assert_eq!(record.contact_info, None);
    }

    #[test]
    fn test_into_record_rejects_unknown_tier() {
        let args = AddArgs {
            name: "Foo".into(),
            url: "https://github.com/x/foo".into(),
            tier: Some("member".into()),
            ..AddArgs::default()
        };

        assert!(args.into_record().is_err());
    }
}
