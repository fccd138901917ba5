//! ci-status gates automation on the CI status of the current commit.

use std::process::ExitCode;

use clap::Parser;
use color_eyre::{Result, Section};
use tracing::level_filters::LevelFilter;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod cmd;

/// Report the GitHub CI status of the current commit.
///
/// Exit codes: 0 passed, 1 could not get the status (or it was unrecognized),
/// 2 failed, 3 pending, 4 fewer checks ran than required.
#[derive(Parser)]
#[command(author, version = env!("CI_STATUS_VERSION"), about, long_about)]
struct Cli {
    #[command(flatten)]
    config: cmd::Config,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    // clap exits 2 on usage errors, but 2 means "CI failed" to our callers.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) if error.use_stderr() => {
            error.print()?;
            return Ok(ExitCode::FAILURE);
        }
        Err(error) => error.exit(),
    };

    // The report is the interface of this binary: scripts gate on its exit
    // code and people read its output. Logging is off unless requested with
    // `CI_STATUS_LOG` directives, and always goes to stderr.
    //
    // Examples:
    // - `CI_STATUS_LOG=debug` to see each git call and the decoded status
    // - `CI_STATUS_LOG=ci_status::github=trace` to trace only the API client
    tracing_subscriber::registry()
        .with(ErrorLayer::default())
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_level(true)
                .with_file(true)
                .with_line_number(true)
                .with_target(true)
                .pretty(),
        )
        .with(
            EnvFilter::builder()
                .with_env_var("CI_STATUS_LOG")
                .with_default_directive(LevelFilter::ERROR.into())
                .from_env_lossy(),
        )
        .init();

    cmd::main(cli.config)
        .await
        .suggestion("Set `CI_STATUS_LOG=debug` to see each step ci-status takes.")
}
