//! Integration tests for the ci-status binary.
//!
//! Each test builds a throwaway git checkout, points ci-status at a fake GitHub
//! API, and checks the exit code and output of the real binary.


use std::process::{Command, Stdio};

use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use xshell::{Shell, cmd};

/// Remote URL used by checkouts that have one.
pub const REMOTE_URL: &str = "git@example.com:acme/widgets.git";

/// A git checkout in a temporary directory with a single commit.
pub struct Checkout {
    _dir: TempDir,
    sh: Shell,

    /// The full hash of the commit.
    pub sha: String,
}

impl Checkout {
    /// Create a checkout with no remote configured.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let sh = Shell::new().expect("create shell");
        sh.change_dir(dir.path());

        cmd!(sh, "git init --quiet").run().expect("git init");
        cmd!(sh, "git config user.name test-user").run().expect("set user.name");
        cmd!(sh, "git config user.email test@example.com")
            .run()
            .expect("set user.email");
        cmd!(sh, "git commit --quiet --allow-empty -m initial")
            .run()
            .expect("git commit");

        let sha = cmd!(sh, "git rev-parse HEAD").read().expect("rev-parse HEAD");
        Self {
            _dir: dir,
            sh,
            sha,
        }
    }

    /// Create a checkout whose `origin` is [`REMOTE_URL`].
    pub fn with_origin() -> Self {
        let checkout = Self::new();
        let sh = &checkout.sh;
        cmd!(sh, "git remote add origin {REMOTE_URL}")
            .run()
            .expect("add remote");
        checkout
    }

    /// The API path GitHub serves this commit's combined status from.
    pub fn status_path(&self) -> String {
        format!("/repos/acme/widgets/commits/{}/status", self.sha)
    }

    /// Run ci-status in this checkout against `api_url` and return
    /// (exit_code, stdout, stderr).
    pub fn run(&self, api_url: &str, args: &[&str]) -> (i32, String, String) {
        let sh = &self.sh;
        let bin = env!("CARGO_BIN_EXE_ci-status");
        let output = cmd!(sh, "{bin} {args...}")
            .env("CI_STATUS_API_URL", api_url)
            .env_remove("CI_STATUS_REQUIRED_CHECKS")
            .env_remove("CI_STATUS_LOG")
            .ignore_status()
            .output()
            .expect("failed to run ci-status");

        let exit_code = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        (exit_code, stdout, stderr)
    }

    /// Run ci-status in this checkout with its stdout already closed and
    /// return (exit_code, stderr).
    pub fn run_with_closed_stdout(&self, api_url: &str) -> (i32, String) {
        let mut child = Command::new(env!("CARGO_BIN_EXE_ci-status"))
            .current_dir(self.sh.current_dir())
            .env("CI_STATUS_API_URL", api_url)
            .env_remove("CI_STATUS_REQUIRED_CHECKS")
            .env_remove("CI_STATUS_LOG")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to spawn ci-status");
        drop(child.stdout.take());

        let output = child.wait_with_output().expect("failed to wait for ci-status");
        let exit_code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        (exit_code, stderr)
    }
}

/// Build a combined status payload in the shape GitHub returns.
pub fn combined_status(state: &str, checks: &[(&str, &str)]) -> Value {
    let statuses = checks
        .iter()
        .enumerate()
        .map(|(n, (state, description))| {
            json!({
                "state": state,
                "description": description,
                "context": format!("ci/check-{n}"),
            })
        })
        .collect::<Vec<_>>();

    json!({
        "state": state,
        "total_count": statuses.len(),
        "statuses": statuses,
    })
}

/// Start a fake GitHub API that serves `body` as the combined status of the
/// checkout's commit, and expects to be asked exactly once.
pub async fn serve_status(checkout: &Checkout, body: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(checkout.status_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;
    server
}
