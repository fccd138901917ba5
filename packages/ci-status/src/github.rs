//! Client for the GitHub combined commit status API.

use bon::Builder;
use reqwest::{
    Client,
    header::{ACCEPT, HeaderMap, HeaderValue},
};
use serde::Deserialize;
use tap::TapFallible;

use crate::{git::CommitRef, state::State};

/// The public GitHub API.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Sent as the `User-Agent` header, which GitHub requires on every request.
pub const DEFAULT_USER_AGENT: &str = "ci-status";

/// Settings for constructing a [`GitHub`] client.
#[derive(Debug, Clone, Builder)]
pub struct ClientConfig {
    /// Base URL of the API, without a trailing slash.
    #[builder(into, default = DEFAULT_API_URL)]
    pub api_url: String,

    /// The `User-Agent` header value.
    #[builder(into, default = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

/// The combined status of a commit: an overall state, plus each check that
/// contributed to it in the order GitHub reported them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CombinedStatus {
    /// The overall state as computed by GitHub.
    pub state: State,

    /// The individual checks.
    #[serde(default)]
    pub statuses: Vec<CheckStatus>,
}

/// A single check reported for a commit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckStatus {
    /// The state of the check.
    pub state: State,

    /// Short human readable description, if the check provided one.
    #[serde(default)]
    pub description: Option<String>,

    /// The name of the check, e.g. `ci/circleci`.
    #[serde(default)]
    pub context: String,
}

impl CheckStatus {
    /// The text displayed for this check: its description, falling back to its
    /// context name when no description was reported.
    pub fn label(&self) -> &str {
        self.description
            .as_deref()
            .filter(|description| !description.is_empty())
            .unwrap_or(&self.context)
    }
}

/// A GitHub API client.
///
/// Constructed explicitly from a [`ClientConfig`] so that callers (and tests)
/// choose where requests go.
#[derive(Debug, Clone)]
pub struct GitHub {
    api_url: String,
    http: Client,
}

impl GitHub {
    /// Build a client from the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );

        let http = Client::builder()
            .user_agent(config.user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            api_url: config.api_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// The base URL requests are sent to.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Get the combined status for a commit.
    ///
    /// Any failure (network, authorization, unknown repository, malformed
    /// payload) is reported as the same error type; callers are not expected
    /// to tell them apart.
    #[tracing::instrument(skip(self), fields(api_url = %self.api_url))]
    pub async fn combined_status(&self, commit: &CommitRef) -> Result<CombinedStatus, reqwest::Error> {
        let url = format!(
            "{}/repos/{}/{}/commits/{}/status",
            self.api_url, commit.repository.owner, commit.repository.name, commit.sha
        );

        self.http
            .get(url)
            .query(&[("per_page", "100")])
            .send()
            .await?
            .error_for_status()?
            .json::<CombinedStatus>()
            .await
            .tap_ok(|status| {
                tracing::debug!(state = %status.state, checks = status.statuses.len(), "fetched combined status");
            })
    }
}
