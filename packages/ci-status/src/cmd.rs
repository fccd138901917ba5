//! Report the CI status of the checked out commit.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use color_eyre::eyre::{Context, Result};
use tracing::instrument;

use ci_status::{
    Error,
    git::{self, CommitRef},
    github::{ClientConfig, DEFAULT_API_URL, GitHub},
    outcome::{self, DEFAULT_REQUIRED_CHECKS, Policy},
    state::Symbol,
};

#[derive(Args, Clone, Debug)]
pub struct Config {
    /// Fewest individual checks that must have reported for a successful
    /// status to count as passing.
    #[arg(
        long,
        alias = "required-tests",
        env = "CI_STATUS_REQUIRED_CHECKS",
        default_value_t = DEFAULT_REQUIRED_CHECKS
    )]
    pub required_checks: usize,

    /// Base URL of the GitHub API (set this for GitHub Enterprise).
    #[arg(long, env = "CI_STATUS_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Path to the git checkout.
    #[arg(short = 'C', long, default_value = ".")]
    pub repo_dir: PathBuf,

    /// Remote whose URL names the GitHub repository.
    #[arg(long, default_value = "origin")]
    pub remote: String,

    /// Revision whose status is checked.
    #[arg(long, default_value = "HEAD")]
    pub rev: String,
}

#[instrument]
pub async fn main(config: Config) -> Result<ExitCode> {
    let policy = Policy {
        required_checks: config.required_checks,
    };

    let (github, commit) = match connect(&config).await {
        Ok(connected) => connected,
        Err(error) => return Ok(abort(error)),
    };

    writeln!(io::stdout(), "Checking {}:{}\n", commit.repository, commit.short_sha())
        .context("print progress")?;

    let status = match github.combined_status(&commit).await {
        Ok(status) => status,
        Err(error) => return Ok(abort(error.into())),
    };

    let report = outcome::resolve(&status, &policy);
    report
        .write(&mut io::stdout().lock(), &mut io::stderr().lock())
        .context("print report")?;

    Ok(ExitCode::from(report.outcome.exit_code()))
}

/// Read the local checkout and build the client that will ask about it.
///
/// GitHub is only contacted once the commit and repository are known.
async fn connect(config: &Config) -> Result<(GitHub, CommitRef), Error> {
    let commit = git::read_context(&config.repo_dir, &config.rev, &config.remote).await?;
    let github = GitHub::new(ClientConfig::builder().api_url(&config.api_url).build())?;
    Ok((github, commit))
}

/// Report a failure to get the combined status.
fn abort(error: Error) -> ExitCode {
    tracing::debug!(?error, "could not get combined status");
    eprintln!("{}", Symbol::Warning.line(error.to_string()));
    ExitCode::FAILURE
}
