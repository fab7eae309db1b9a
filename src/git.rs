//! Typed git invocation.
//!
//! Commands are assembled from explicit argument vectors, never a shell
//! string. Any credential injected into a fetch URL is registered as a secret
//! and scrubbed from diagnostics before they leave this module.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use url::Url;

use crate::error::SnapshotError;

const REDACTED: &str = "***";

/// A single git process invocation.
#[derive(Clone, Debug)]
pub struct GitCommand {
    program: PathBuf,
    args: Vec<OsString>,
    secrets: Vec<String>,
}

/// Captured result of a git run that exited (successfully or not).
#[derive(Debug)]
pub struct GitOutput {
    pub success: bool,
    pub stderr: String,
}

impl GitCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            secrets: Vec::new(),
        }
    }

    /// `git clone --depth 1 --quiet -- <url> <dest>`: latest commit only.
    pub fn shallow_clone(program: impl Into<PathBuf>, url: &FetchUrl, dest: &Path) -> Self {
        let mut cmd = Self::new(program)
            .arg("clone")
            .arg("--depth")
            .arg("1")
            .arg("--quiet")
            .arg("--")
            .arg(url.as_str())
            .arg(dest);
        cmd.secrets.extend(url.secrets.iter().cloned());
        cmd
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Human-readable command line with secrets removed.
    pub fn display_redacted(&self) -> String {
        let mut out = self.program.display().to_string();
        for arg in &self.args {
            out.push(' ');
            out.push_str(&arg.to_string_lossy());
        }
        redact(&out, &self.secrets)
    }

    pub fn redact(&self, text: &str) -> String {
        redact(text, &self.secrets)
    }

    /// Run to completion, killing the child once `timeout` elapses.
    pub async fn run(&self, timeout: Duration) -> Result<GitOutput, SnapshotError> {
        let child = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| {
                SnapshotError::Unexpected(format!(
                    "failed to invoke {}: {}",
                    self.program.display(),
                    err
                ))
            })?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(res) => res.map_err(|err| {
                let msg = self.redact(&err.to_string());
                SnapshotError::Unexpected(format!("wait for git: {}", msg))
            })?,
            Err(_) => {
                return Err(SnapshotError::CloneTimeout {
                    secs: timeout.as_secs(),
                });
            }
        };

        Ok(GitOutput {
            success: output.status.success(),
            stderr: self.redact(String::from_utf8_lossy(&output.stderr).trim()),
        })
    }
}

/// A URL handed to git, with the credentials embedded in it tracked separately.
#[derive(Clone, Debug)]
pub struct FetchUrl {
    url: String,
    secrets: Vec<String>,
}

impl FetchUrl {
    /// Build the fetch URL, embedding `token` as userinfo for http(s) remotes.
    ///
    /// Tokens are ignored for other schemes (`file://`, ssh, scp-like paths);
    /// those authenticate through git's own configuration.
    pub fn new(repo_url: &str, token: Option<&str>) -> Result<Self, SnapshotError> {
        let repo_url = repo_url.trim();
        if repo_url.is_empty() {
            return Err(SnapshotError::MissingParam("repo_url"));
        }
        if repo_url.starts_with('-') {
            return Err(SnapshotError::InvalidKey(
                "repo_url cannot start with '-'".to_string(),
            ));
        }

        let token = token.map(str::trim).filter(|t| !t.is_empty());
        let Some(token) = token else {
            return Ok(Self {
                url: repo_url.to_string(),
                secrets: Vec::new(),
            });
        };

        let Ok(mut url) = Url::parse(repo_url) else {
            tracing::debug!("repo_url is not a URL; token ignored");
            return Ok(Self {
                url: repo_url.to_string(),
                secrets: vec![token.to_string()],
            });
        };
        if !matches!(url.scheme(), "http" | "https") {
            tracing::debug!(scheme = url.scheme(), "token ignored for non-http remote");
            return Ok(Self {
                url: repo_url.to_string(),
                secrets: vec![token.to_string()],
            });
        }

        url.set_username(token).map_err(|_| {
            SnapshotError::InvalidKey("repo_url cannot carry credentials".to_string())
        })?;
        let url = url.to_string();

        // The URL serializer percent-encodes userinfo, so scrub both spellings.
        let mut secrets = vec![token.to_string()];
        if let Some(encoded) = encoded_username(&url)
            && encoded != token
        {
            secrets.push(encoded);
        }

        Ok(Self { url, secrets })
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn redacted(&self) -> String {
        redact(&self.url, &self.secrets)
    }
}

fn encoded_username(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .map(|u| u.username().to_string())
        .filter(|u| !u.is_empty())
}

fn redact(text: &str, secrets: &[String]) -> String {
    let mut out = text.to_string();
    // Longest first so a secret that contains another is scrubbed whole.
    let mut secrets: Vec<&String> = secrets.iter().filter(|s| !s.is_empty()).collect();
    secrets.sort_by_key(|s| std::cmp::Reverse(s.len()));
    for secret in secrets {
        out = out.replace(secret.as_str(), REDACTED);
    }
    out
}

#[cfg(test)]
#[path = "tests/git/invocation_tests.rs"]
mod tests;
