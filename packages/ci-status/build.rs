//! Build script for ci-status that generates version information.
//!
//! Uses `git describe --always --tags --dirty=-dirty` as the version string.
//! Source trees that are not git checkouts (e.g. a published crate) fall back
//! to the package version.

use std::env;
use std::iter;
use std::process::Command;

fn main() {
    let version = git_describe().unwrap_or_else(|error| {
        println!("cargo:warning=using package version: {error}");
        env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| String::from("unknown"))
    });

    println!("cargo:rustc-env=CI_STATUS_VERSION={version}");
}

fn run(prog: &str, argv: &[&str]) -> Result<String, String> {
    let invocation = iter::once(prog)
        .chain(argv.iter().copied())
        .collect::<Vec<_>>()
        .join(" ");

    let output = Command::new(prog)
        .args(argv)
        .output()
        .map_err(|e| format!("failed to execute `{invocation}`: {e}"))?;
    if !output.status.success() {
        return Err(format!("`{invocation}` exited with non-zero status"));
    }

    let output = String::from_utf8(output.stdout)
        .map_err(|e| format!("could not parse output of `{invocation}` as UTF-8: {e}"))?;
    Ok(output.trim_end().to_string())
}

fn git_describe() -> Result<String, String> {
    run("git", &["describe", "--always", "--tags", "--dirty=-dirty"])
}
