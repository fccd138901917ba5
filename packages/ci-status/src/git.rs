//! Git state queries via shell commands.

use std::iter;
use std::path::Path;
use std::process::ExitStatus;

use derive_more::Display;
use thiserror::Error;
use tokio::process::Command;

/// Errors reading the commit or remote from the local checkout.
#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to execute `{invocation}`: {source}")]
    Spawn {
        invocation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{invocation}` exited with {status}: {stderr}")]
    Failed {
        invocation: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("could not parse output of `{invocation}` as UTF-8")]
    Utf8 { invocation: String },

    #[error("`{invocation}` printed nothing")]
    Empty { invocation: String },

    #[error("remote URL {0:?} does not name an owner and repository")]
    RemoteUrl(String),
}

/// A repository hosted on GitHub.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{owner}/{name}")]
pub struct Repository {
    /// The user or organization that owns the repository.
    pub owner: String,

    /// The name of the repository.
    pub name: String,
}

/// The commit to check and the repository it lives in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRef {
    /// The full commit hash.
    pub sha: String,

    /// The repository named by the remote.
    pub repository: Repository,
}

impl CommitRef {
    /// The abbreviated hash shown in progress output.
    pub fn short_sha(&self) -> &str {
        short_sha(&self.sha)
    }
}

/// The first 10 characters of `sha`, or all of it if it is shorter.
pub fn short_sha(sha: &str) -> &str {
    match sha.char_indices().nth(10) {
        Some((end, _)) => &sha[..end],
        None => sha,
    }
}

/// Read the commit and the repository named by `remote` in the checkout at `cwd`.
///
/// The commit is resolved first; if that fails the remote is never read.
#[tracing::instrument]
pub async fn read_context(cwd: &Path, rev: &str, remote: &str) -> Result<CommitRef, GitError> {
    let sha = head_commit(cwd, rev).await?;
    let url = remote_url(cwd, remote).await?;
    let repository = parse_remote_url(&url)?;
    tracing::debug!(%sha, %url, %repository, "read local context");
    Ok(CommitRef { sha, repository })
}

/// Get the full hash of the commit named by `rev` (usually `HEAD`).
///
/// Tags are peeled, so an annotated tag yields the commit it points at rather
/// than the tag object.
#[tracing::instrument]
pub async fn head_commit(cwd: &Path, rev: &str) -> Result<String, GitError> {
    let commit = format!("{rev}^{{commit}}");
    run(cwd, &["rev-parse", "--verify", &commit]).await
}

/// Get the URL configured for `remote` (usually `origin`).
#[tracing::instrument]
pub async fn remote_url(cwd: &Path, remote: &str) -> Result<String, GitError> {
    let key = format!("remote.{remote}.url");
    run(cwd, &["config", "--get", &key]).await
}

/// Extract the owner and repository name from a remote URL.
///
/// GitHub remotes come in many shapes, so rather than parse the URL this takes
/// the last two path segments. Handles both `https://host/owner/repo.git` and
/// `git@host:owner/repo.git`; the host is never inspected.
pub fn parse_remote_url(url: &str) -> Result<Repository, GitError> {
    let trimmed = url.trim();
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);

    let mut segments = trimmed.rsplit('/');
    let (Some(name), Some(owner)) = (segments.next(), segments.next()) else {
        return Err(GitError::RemoteUrl(url.to_string()));
    };

    let name = name.strip_suffix(".git").unwrap_or(name);
    let owner = owner.strip_suffix(".git").unwrap_or(owner);
    let owner = match owner.rsplit_once(':') {
        Some((_, owner)) => owner,
        None => owner,
    };

    if owner.is_empty() || name.is_empty() {
        return Err(GitError::RemoteUrl(url.to_string()));
    }

    Ok(Repository {
        owner: owner.to_string(),
        name: name.to_string(),
    })
}

async fn run(cwd: &Path, argv: &[&str]) -> Result<String, GitError> {
    let invocation = iter::once("git")
        .chain(argv.iter().copied())
        .collect::<Vec<_>>()
        .join(" ");

    let output = Command::new("git")
        .args(argv)
        .current_dir(cwd)
        .output()
        .await
        .map_err(|source| GitError::Spawn {
            invocation: invocation.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(GitError::Failed {
            invocation,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let stdout = String::from_utf8(output.stdout).map_err(|_| GitError::Utf8 {
        invocation: invocation.clone(),
    })?;
    tracing::debug!(%invocation, %stdout, "git output");

    let value = stdout.trim();
    if value.is_empty() {
        return Err(GitError::Empty { invocation });
    }

    Ok(value.to_string())
}
