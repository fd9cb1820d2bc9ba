// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Maintenance commands - recompile, badges, stars and test-result ingestion

use crate::config::Config;
use crate::maintenance::{self, BatchReport};
use crate::prelude::*;
use crate::services::{http_client, GitHubClient, ShieldsClient};
use crate::store::{FileStore, RecordStore, SNAPSHOT_FILE};
use std::path::PathBuf;

fn open_store(config: &Config) -> Result<FileStore> {
    FileStore::open(&config.resources_dir)
        .with_context(|| format!("Failed to open registry in {}", config.resources_dir.display()))
}

fn print_report(action: &str, report: &BatchReport) {
    println!("{action}: {} updated, {} skipped", report.updated, report.skipped.len());
    for url in &report.skipped {
        println!("  skipped {url}");
    }
}

/// Run the recompile command
pub fn run_recompile(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    store.recompile()?;
    println!(
        "Recompiled {} records into {}",
        store.len(),
        config.resources_dir.join(SNAPSHOT_FILE).display()
    );
    Ok(())
}

/// Run the update-badges command
pub fn run_badges(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let client = http_client(&config.user_agent).context("Failed to build HTTP client")?;
    let shields = ShieldsClient::new(client, config.shields_url.clone());

    let report = maintenance::update_badges(&store, &shields, &config.badges_dir)?;
    print_report("Badges", &report);
    Ok(())
}

/// Run the update-stars command
pub fn run_stars(config: &Config) -> Result<()> {
    let mut store = open_store(config)?;
    let client = http_client(&config.user_agent).context("Failed to build HTTP client")?;
    let github = GitHubClient::new(client, config.github_api_url.clone(), config.github_token.clone());

    let report = maintenance::update_stars(&mut store, &github)?;
    print_report("Stars", &report);
    Ok(())
}

/// Run the ingest-results command
pub fn run_ingest(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let root = path.unwrap_or_else(|| config.artifacts_dir.clone());
    let mut store = open_store(config)?;

    let report = maintenance::ingest_artifacts(&mut store, &root)
        .with_context(|| format!("Failed to ingest test results from {}", root.display()))?;
    print_report("Test results", &report);
    Ok(())
}
