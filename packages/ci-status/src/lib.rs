//! Main library for ci-status, used by its CLI.

pub mod error;
pub mod git;
pub mod github;
pub mod outcome;
pub mod state;

pub use error::Error;
