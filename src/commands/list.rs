// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Listing commands - registry members by tier, and the test candidate list

use crate::config::Config;
use crate::maintenance::{badge_color, by_tier, test_candidates, PASSING_COLOR};
use crate::prelude::*;
use crate::store::{FileStore, RecordStore};
use owo_colors::OwoColorize;

fn read_records(config: &Config) -> Result<Vec<Record>> {
    let store = FileStore::open(&config.resources_dir)
        .with_context(|| format!("Failed to open registry in {}", config.resources_dir.display()))?;
    Ok(store.read_all()?)
}

/// Run the list-candidates command, printing a JSON array of `owner/repo`
pub fn run_candidates(config: &Config) -> Result<()> {
    let records = read_records(config)?;
    println!("{}", serde_json::to_string(&test_candidates(&records))?);
    Ok(())
}

/// Run the list command
pub fn run(config: &Config, tier: Option<&str>, json: bool, color: bool) -> Result<()> {
    let filter: Option<Tier> = tier.map(str::parse::<Tier>).transpose()?;
    let records = read_records(config)?;

    let groups: Vec<_> = by_tier(&records)
        .filter(|(tier, members)| filter.map_or(!members.is_empty(), |f| f == *tier))
        .collect();

    if json {
        let records: Vec<&Record> = groups.iter().flat_map(|(_, members)| members.iter().copied()).collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No members registered. Use 'ecosystem add' or 'ecosystem add-from-issue'.");
        return Ok(());
    }

    for (tier, members) in groups {
        let heading = format!("{tier} ({})", members.len());
        if color {
            println!("{}", heading.bold());
        } else {
            println!("{heading}");
        }

        for record in members {
            let stars = record.stars.map(|s| format!(" ★{s}")).unwrap_or_default();
            let tests = if badge_color(record) == PASSING_COLOR { "ok" } else { "failing" };
            let tests = if color && tests == "failing" {
                tests.red().to_string()
            } else {
                tests.to_string()
            };
            println!("  {} <{}>{} [tests: {}]", record.name, record.url, stars, tests);
            if !record.labels.is_empty() {
                println!("    labels: {}", record.labels.join(", "));
            }
        }
    }

    Ok(())
}
