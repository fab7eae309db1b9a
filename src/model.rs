use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;

const MAX_KEY_PART_LEN: usize = 100;

/// Identifies one snapshot: the (owner, repository) pair of the remote.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SnapshotKey {
    owner: String,
    repo: String,
}

impl SnapshotKey {
    pub fn new(owner: &str, repo: &str) -> Result<Self, SnapshotError> {
        if owner.is_empty() {
            return Err(SnapshotError::MissingParam("owner"));
        }
        if repo.is_empty() {
            return Err(SnapshotError::MissingParam("repo"));
        }
        // The owner leads the directory name, so it must not start with a dot
        // and land beside the store's own `.staging`/`.trash` dirs.
        if owner.starts_with('.') {
            return Err(SnapshotError::InvalidKey(
                "owner cannot start with '.'".to_string(),
            ));
        }
        validate_key_part("owner", owner)?;
        validate_key_part("repo", repo)?;
        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Storage directory name for this key: `<owner>_<repo>`.
    pub fn dir_name(&self) -> String {
        format!("{}_{}", self.owner, self.repo)
    }
}

impl std::fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

fn validate_key_part(field: &str, value: &str) -> Result<(), SnapshotError> {
    if value.len() > MAX_KEY_PART_LEN {
        return Err(SnapshotError::InvalidKey(format!(
            "{} must be at most {} chars",
            field, MAX_KEY_PART_LEN
        )));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(SnapshotError::InvalidKey(format!(
            "{} must be ascii alnum or '-', '_', '.'",
            field
        )));
    }
    Ok(())
}

/// A clone request as accepted from callers.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CloneRequest {
    #[serde(default)]
    pub repo_url: Option<String>,

    #[serde(default)]
    pub owner: Option<String>,

    #[serde(default)]
    pub repo: Option<String>,

    /// Opaque credential handed to git as URL userinfo.
    #[serde(default)]
    pub token: Option<String>,
}

/// One regular file found in a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    pub path: String,

    #[serde(rename = "type")]
    pub kind: FileKind,

    pub size: u64,
}

impl FileRecord {
    pub fn file(path: String, size: u64) -> Self {
        Self {
            path,
            kind: FileKind::File,
            size,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    File,
}

/// Per-path outcome of a batch read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BatchEntry {
    pub path: String,
    pub content: String,

    /// Set when the file held more bytes than the read budget allowed.
    pub truncated: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchEntry {
    pub fn ok(path: String, content: String, truncated: bool) -> Self {
        Self {
            path,
            content,
            truncated,
            error: None,
        }
    }

    pub fn failed(path: String, err: &SnapshotError) -> Self {
        Self {
            path,
            content: String::new(),
            truncated: false,
            error: Some(err.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "tests/model/key_tests.rs"]
mod tests;
