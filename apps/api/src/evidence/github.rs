//! GitHub profile references and the public repository listing.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::errors::UpstreamError;

const HOST_MARKER: &str = "github.com";
const PROFILE_BASE: &str = "https://github.com/";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const REPOS_PER_PAGE: u32 = 100;

/// Repository descriptor as returned by the listing endpoint.
/// Only the fields the miner inspects are decoded.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Repo {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
}

/// Turns a profile URL or bare handle into a canonical profile URL.
/// Returns an empty string for a blank reference.
pub fn normalize_profile_url(profile_ref: &str) -> String {
    let profile_ref = profile_ref.trim();
    if profile_ref.is_empty() {
        return String::new();
    }
    if !profile_ref.contains(HOST_MARKER) {
        let handle = profile_ref.strip_prefix('@').unwrap_or(profile_ref);
        return format!("{PROFILE_BASE}{handle}");
    }
    let without_query = profile_ref.split('?').next().unwrap_or_default();
    without_query
        .strip_suffix('/')
        .unwrap_or(without_query)
        .to_string()
}

/// Username at path index 3 of the normalized profile URL, if it looks like a
/// GitHub login.
pub fn extract_username(profile_ref: &str) -> Option<String> {
    let url = normalize_profile_url(profile_ref);
    let username = url.split('/').nth(3)?;
    let plausible = !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');
    plausible.then(|| username.to_string())
}

/// Thin client over the GitHub REST API.
#[derive(Clone)]
pub struct GithubClient {
    client: Client,
    api_base: String,
}

impl GithubClient {
    pub fn new(api_base: impl Into<String>, token: Option<&str>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
                .context("GITHUB_TOKEN is not a valid header value")?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(Self {
            client: Client::builder()
                .user_agent(USER_AGENT)
                .default_headers(headers)
                .timeout(timeout)
                .build()
                .context("Failed to build GitHub HTTP client")?,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    /// Lists up to 100 public repositories, most recently updated first.
    pub async fn list_repos(&self, username: &str) -> Result<Vec<Repo>, UpstreamError> {
        let url = format!("{}/users/{username}/repos", self.api_base);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("per_page", REPOS_PER_PAGE.to_string()),
                ("sort", "updated".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let repos: Vec<Repo> = serde_json::from_str(&body)
            .map_err(|e| UpstreamError::Malformed(format!("GitHub repos response: {e}")))?;

        debug!("Fetched {} repos for {username}", repos.len());
        Ok(repos)
    }
}
