// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! External services - the badge image service and the repository hosting API

use crate::error::ExternalServiceFailure;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use tracing::debug;

const SHIELDS: &str = "shields";
const GITHUB: &str = "github";

/// Renders static badge images
pub trait BadgeService {
    /// Fetch a badge image with the given label, message and color
    fn fetch(&self, label: &str, message: &str, color: &str) -> Result<Vec<u8>, ExternalServiceFailure>;
}

/// Repository metadata from the hosting platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RepoInfo {
    /// Star count
    #[serde(rename = "stargazers_count")]
    pub stars: u64,
}

/// Answers repository metadata queries
pub trait RepoHost {
    /// Look up `owner/repo`
    fn repo_info(&self, owner: &str, repo: &str) -> Result<RepoInfo, ExternalServiceFailure>;
}

fn transport(service: &'static str, err: &reqwest::Error) -> ExternalServiceFailure {
    ExternalServiceFailure::Transport {
        service,
        message: err.to_string(),
    }
}

fn check_status(service: &'static str, response: Response) -> Result<Response, ExternalServiceFailure> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ExternalServiceFailure::Status {
            service,
            status: status.as_u16(),
        })
    }
}

/// shields.io static badge client
#[derive(Debug, Clone)]
pub struct ShieldsClient {
    client: Client,
    base_url: String,
}

impl ShieldsClient {
    /// Create a client for the static badge endpoint at `base_url`
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

impl BadgeService for ShieldsClient {
    fn fetch(&self, label: &str, message: &str, color: &str) -> Result<Vec<u8>, ExternalServiceFailure> {
        debug!("Fetching badge {label}/{message}/{color}");
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("label", label), ("message", message), ("color", color)])
            .send()
            .map_err(|e| transport(SHIELDS, &e))?;
        let response = check_status(SHIELDS, response)?;
        let bytes = response.bytes().map_err(|e| transport(SHIELDS, &e))?;
        Ok(bytes.to_vec())
    }
}

/// GitHub REST API client
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl GitHubClient {
    /// Create a client for the API at `api_url`, authenticating when a token is given
    #[must_use]
    pub fn new(client: Client, api_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }
}

impl RepoHost for GitHubClient {
    fn repo_info(&self, owner: &str, repo: &str) -> Result<RepoInfo, ExternalServiceFailure> {
        let url = format!("{}/repos/{owner}/{repo}", self.api_url);
        debug!("GET {url}");

        let mut request = self
            .client
            .get(&url)
            .header(ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request.send().map_err(|e| transport(GITHUB, &e))?;
        let response = check_status(GITHUB, response)?;
        response
            .json::<RepoInfo>()
            .map_err(|e| ExternalServiceFailure::Decode {
                service: GITHUB,
                message: e.to_string(),
            })
    }
}

/// Build the shared blocking HTTP client
pub fn http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder().user_agent(user_agent).build()
}
