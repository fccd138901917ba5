//! Turns a commit's combined status into a printed report and an exit code.
//!
//! Resolution is pure: [`resolve`] builds a [`Report`] describing every line to
//! print and the final [`Outcome`], and [`Report::write`] prints it. The
//! combined state reported by GitHub is trusted as-is for branching; the only
//! thing computed locally is the number of checks, which is compared against
//! [`Policy::required_checks`]. GitHub reports `success` for a commit with no
//! checks at all (for example before CI has started), so a minimum count is the
//! only way to tell "passed" apart from "nothing ran yet".

use std::io::{self, Write};

use crate::{
    github::CombinedStatus,
    state::{State, Symbol},
};

/// The minimum number of checks when none is configured.
pub const DEFAULT_REQUIRED_CHECKS: usize = 1;

/// Policy applied when resolving a successful combined status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    /// The fewest individual checks that must have reported for a successful
    /// combined status to count as passing.
    pub required_checks: usize,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            required_checks: DEFAULT_REQUIRED_CHECKS,
        }
    }
}

/// The final decision about a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every check passed and enough of them ran.
    Passed,

    /// GitHub reported that CI errored.
    Errored,

    /// GitHub reported that CI failed.
    Failed,

    /// CI has not finished.
    Pending,

    /// GitHub reported success, but fewer checks ran than the policy requires.
    InsufficientChecks { actual: usize, required: usize },

    /// A check, or the combined status, was in a state we don't recognize.
    UnknownState(String),
}

impl Outcome {
    /// The process exit code for this outcome.
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Passed => 0,
            Outcome::Errored => 1,
            Outcome::Failed => 2,
            Outcome::Pending => 3,
            Outcome::InsufficientChecks { .. } => 4,
            Outcome::UnknownState(_) => 1,
        }
    }

    /// The summary line printed for this outcome.
    pub fn line(&self) -> Line {
        match self {
            Outcome::Passed => Line::stdout(Symbol::Success.highlight("CI tests passed")),
            Outcome::Errored => Line::stderr(Symbol::Warning.highlight("CI tests errored")),
            Outcome::Failed => Line::stderr(Symbol::Error.highlight("CI tests failed")),
            Outcome::Pending => Line::stderr(Symbol::Warning.highlight("CI still pending")),
            Outcome::InsufficientChecks { actual, required } => {
                Line::stderr(Symbol::Warning.highlight(format!(
                    "The required number of checks weren't run ({actual} vs {required})"
                )))
            }
            Outcome::UnknownState(state) => {
                Line::stderr(format!("Unknown status received from GitHub: {state}"))
            }
        }
    }
}

/// Where a line of the report is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// A single line of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub stream: Stream,
    pub text: String,
}

impl Line {
    fn stdout(text: impl Into<String>) -> Self {
        Self {
            stream: Stream::Stdout,
            text: text.into(),
        }
    }

    fn stderr(text: impl Into<String>) -> Self {
        Self {
            stream: Stream::Stderr,
            text: text.into(),
        }
    }
}

/// Everything to print for a commit, in order, and the resulting outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// One line per check that was displayed, followed by the summary line.
    pub lines: Vec<Line>,

    /// The final decision.
    pub outcome: Outcome,
}

impl Report {
    fn finish(mut lines: Vec<Line>, outcome: Outcome) -> Self {
        lines.push(outcome.line());
        Self { lines, outcome }
    }

    /// Print the report, sending each line to the stream it belongs on.
    pub fn write(&self, stdout: &mut impl Write, stderr: &mut impl Write) -> io::Result<()> {
        for line in &self.lines {
            match line.stream {
                Stream::Stdout => writeln!(stdout, "{}", line.text)?,
                Stream::Stderr => writeln!(stderr, "{}", line.text)?,
            }
        }
        stdout.flush()?;
        stderr.flush()
    }
}

/// Resolve the combined status of a commit against `policy`.
///
/// Checks are listed in the order GitHub reported them. A check in an
/// unrecognized state stops resolution on the spot: nothing after it is
/// listed and the combined state is never consulted, since a state we can't
/// classify means none of the decisions below can be trusted.
#[tracing::instrument(skip(status), fields(state = %status.state, checks = status.statuses.len()))]
pub fn resolve(status: &CombinedStatus, policy: &Policy) -> Report {
    let mut lines = Vec::with_capacity(status.statuses.len() + 1);

    for check in &status.statuses {
        match check.state.symbol() {
            Some(symbol) => lines.push(Line::stdout(symbol.line(check.label()))),
            None => {
                tracing::debug!(context = %check.context, state = %check.state, "unrecognized check state");
                return Report::finish(lines, Outcome::UnknownState(check.state.to_string()));
            }
        }
    }

    let outcome = match &status.state {
        State::Error => Outcome::Errored,
        State::Failure => Outcome::Failed,
        State::Pending => Outcome::Pending,
        State::Success if status.statuses.len() < policy.required_checks => {
            Outcome::InsufficientChecks {
                actual: status.statuses.len(),
                required: policy.required_checks,
            }
        }
        State::Success => Outcome::Passed,
        State::Unknown(state) => Outcome::UnknownState(state.clone()),
    };

    Report::finish(lines, outcome)
}
