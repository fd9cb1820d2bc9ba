// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Layers, lowest first: built-in defaults, `ecosystem.toml` in the project
//! root (or an explicit file), then `ECOSYSTEM_*` environment variables.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the project root when none is given
pub const CONFIG_FILE: &str = "ecosystem.toml";

/// Application configuration, paths already resolved against the project root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Project root
    pub root: PathBuf,
    /// Directory holding `members.toml` and `members.json`
    pub resources_dir: PathBuf,
    /// Directory badge SVGs are written to
    pub badges_dir: PathBuf,
    /// Submission issue template
    pub template_path: PathBuf,
    /// Default directory scanned for test-result artifacts
    pub artifacts_dir: PathBuf,
    /// Static badge endpoint
    pub shields_url: String,
    /// Repository hosting API base url
    pub github_api_url: String,
    /// API token, sent when set
    #[serde(skip_serializing)]
    pub github_token: Option<String>,
    /// User-Agent for outgoing requests
    pub user_agent: String,
}

/// Values as they appear in the layered sources, before path resolution
#[derive(Debug, Deserialize)]
struct RawConfig {
    resources_dir: PathBuf,
    badges_dir: PathBuf,
    template_path: PathBuf,
    artifacts_dir: PathBuf,
    shields_url: String,
    github_api_url: String,
    github_token: Option<String>,
    user_agent: String,
}

/// Load configuration for the project at `root`
pub fn load(root: &Path, file: Option<&Path>) -> Result<Config> {
    let file = file.map_or_else(|| root.join(CONFIG_FILE), Path::to_path_buf);
    let required = file != root.join(CONFIG_FILE);

    let raw: RawConfig = config::Config::builder()
        .set_default("resources_dir", "ecosystem/resources")?
        .set_default("badges_dir", "badges")?
        .set_default("template_path", ".github/ISSUE_TEMPLATE/submission.yml")?
        .set_default("artifacts_dir", "artifacts")?
        .set_default("shields_url", "https://img.shields.io/static/v1")?
        .set_default("github_api_url", "https://api.github.com")?
        .set_default("user_agent", concat!("ecosystem-registry/", env!("CARGO_PKG_VERSION")))?
        .add_source(config::File::from(file.as_path()).format(config::FileFormat::Toml).required(required))
        .add_source(config::Environment::with_prefix("ECOSYSTEM"))
        .build()
        .with_context(|| format!("Failed to load configuration from {}", file.display()))?
        .try_deserialize()
        .context("Invalid configuration")?;

    Ok(Config {
        root: root.to_path_buf(),
        resources_dir: root.join(raw.resources_dir),
        badges_dir: root.join(raw.badges_dir),
        template_path: root.join(raw.template_path),
        artifacts_dir: root.join(raw.artifacts_dir),
        shields_url: raw.shields_url,
        github_api_url: raw.github_api_url,
        github_token: raw.github_token.filter(|t| !t.is_empty()),
        user_agent: raw.user_agent,
    })
}
