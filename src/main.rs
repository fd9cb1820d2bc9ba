// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Ecosystem CLI - curated registry of ecosystem member repositories

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use ecosystem_registry::commands::{self, add::AddArgs, parse_issue::IssueBody};
use ecosystem_registry::config::{self, Config};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ecosystem")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Project root holding the registry, badges and issue template
    #[arg(long, env = "ECOSYSTEM_ROOT", global = true)]
    root: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, env = "ECOSYSTEM_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// GitHub API token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    github_token: Option<String>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", global = true, value_parser = clap::builder::FalseyValueParser::new())]
    no_color: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct BodyArgs {
    /// Issue body markdown
    #[arg(long)]
    body: Option<String>,

    /// File holding the issue body markdown
    #[arg(long, conflicts_with = "body")]
    body_file: Option<PathBuf>,
}

impl From<BodyArgs> for IssueBody {
    fn from(args: BodyArgs) -> Self {
        Self {
            body: args.body,
            body_file: args.body_file,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a submission issue and emit GitHub Actions outputs
    ParseIssue(BodyArgs),

    /// Parse a submission issue and add it to the registry
    AddFromIssue(BodyArgs),

    /// Add a member to the registry directly
    Add {
        /// Display name
        #[arg(long)]
        name: String,

        /// Repository url
        #[arg(long)]
        url: String,

        /// Description
        #[arg(long)]
        description: Option<String>,

        /// Licence
        #[arg(long)]
        licence: Option<String>,

        /// Contact email or handle
        #[arg(long)]
        contact: Option<String>,

        /// Alternative projects
        #[arg(long)]
        alternatives: Option<String>,

        /// Affiliations
        #[arg(long)]
        affiliations: Option<String>,

        /// Comma separated labels
        #[arg(long)]
        labels: Option<String>,

        /// Tier (Main, Member, Candidate, Community)
        #[arg(long)]
        tier: Option<String>,

        /// Project website
        #[arg(long)]
        website: Option<String>,
    },

    /// Move a member to another tier
    SetTier {
        /// Repository url of the member
        url: String,

        /// Tier (Main, Member, Candidate, Community)
        tier: String,
    },

    /// Rebuild members.json from members.toml
    Recompile,

    /// Refresh tier badges
    UpdateBadges,

    /// Refresh star counts
    UpdateStars,

    /// Add test results from artifact files
    IngestResults {
        /// Directory scanned for *.json artifacts
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Print the repositories to test as a JSON array
    ListCandidates,

    /// List members by tier
    List {
        /// Only this tier
        #[arg(long)]
        tier: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 if cli.quiet => tracing::Level::ERROR,
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(log_level).into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let json = cli.json;
    let color = !cli.no_color;
    let github_token = cli.github_token;
    let config_file = cli.config;
    let root = cli.root;

    // Completions need no project, so configuration is only loaded on demand
    let load_config = || -> Result<Config> {
        let root = match &root {
            Some(root) => root.clone(),
            None => std::env::current_dir().context("Failed to determine current directory")?,
        };
        let mut config = config::load(&root, config_file.as_deref())?;
        if github_token.is_some() {
            config.github_token.clone_from(&github_token);
        }
        Ok(config)
    };

    // Execute command
    match cli.command {
        Commands::ParseIssue(body) => {
            commands::parse_issue::run(&load_config()?, body.into(), json)
        }
        Commands::AddFromIssue(body) => {
            commands::parse_issue::run_add(&load_config()?, body.into())
        }
        Commands::Add { name, url, description, licence, contact, alternatives, affiliations, labels, tier, website } => {
            let args = AddArgs { name, url, description, licence, contact, alternatives, affiliations, labels, tier, website };
            commands::add::run(&load_config()?, args)
        }
        Commands::SetTier { url, tier } => {
            commands::add::run_set_tier(&load_config()?, &url, &tier)
        }
        Commands::Recompile => {
            commands::maintain::run_recompile(&load_config()?)
        }
        Commands::UpdateBadges => {
            commands::maintain::run_badges(&load_config()?)
        }
        Commands::UpdateStars => {
            commands::maintain::run_stars(&load_config()?)
        }
        Commands::IngestResults { path } => {
            commands::maintain::run_ingest(&load_config()?, path)
        }
        Commands::ListCandidates => {
            commands::list::run_candidates(&load_config()?)
        }
        Commands::List { tier } => {
            commands::list::run(&load_config()?, tier.as_deref(), json, color)
        }
        Commands::Completions { shell } => {
            commands::completions::run(shell, Cli::command())
        }
    }
}
