//! Errors that stop ci-status before it can resolve a commit's status.

use thiserror::Error;

use crate::git::GitError;

/// A failure gathering the inputs for resolution.
///
/// Neither variant is retried: either one ends the run.
#[derive(Debug, Error)]
pub enum Error {
    /// The commit or remote could not be read from the local checkout.
    #[error("read local checkout: {0}")]
    LocalEnvironment(#[from] GitError),

    /// The combined status could not be fetched from GitHub, for any reason.
    #[error("fetch status from GitHub: {0}")]
    Remote(#[from] reqwest::Error),
}
