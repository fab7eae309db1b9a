use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SnapshotError;
use crate::git::{FetchUrl, GitCommand};
use crate::model::{CloneRequest, SnapshotKey};

use super::{SnapshotStore, random_suffix};

impl SnapshotStore {
    /// Materialize a fresh shallow checkout for the request's key.
    ///
    /// The checkout is staged next to the snapshots and renamed into place
    /// only after git succeeds; a failed clone leaves any previous snapshot
    /// untouched. Readers of the key are held off for the whole operation.
    ///
    /// Once validated, the clone runs on its own task: dropping the returned
    /// future does not interrupt it, so the key lock is never released
    /// halfway through the swap.
    pub async fn clone_snapshot(&self, request: &CloneRequest) -> Result<PathBuf, SnapshotError> {
        let repo_url = required(request.repo_url.as_deref(), "repo_url")?;
        let owner = required(request.owner.as_deref(), "owner")?;
        let repo = required(request.repo.as_deref(), "repo")?;
        let key = SnapshotKey::new(owner, repo)?;
        let url = FetchUrl::new(repo_url, request.token.as_deref())?;

        let store = self.clone();
        tokio::spawn(async move { store.replace_snapshot(key, url).await }).await?
    }

    async fn replace_snapshot(
        &self,
        key: SnapshotKey,
        url: FetchUrl,
    ) -> Result<PathBuf, SnapshotError> {
        let _guard = self.lock_exclusive(&key).await;

        let staging_root = self.staging_root();
        let staged = staging_root.join(format!("{}-{}", key.dir_name(), random_suffix()?));
        {
            let staging_root = staging_root.clone();
            tokio::task::spawn_blocking(move || {
                fs::create_dir_all(&staging_root)
                    .map_err(|e| SnapshotError::io_at("create", &staging_root, e))
            })
            .await??;
        }

        let cmd = GitCommand::shallow_clone(&self.git, &url, &staged);
        tracing::info!(key = %key, command = %cmd.display_redacted(), "cloning snapshot");

        let outcome = match cmd.run(self.clone_timeout).await {
            Ok(out) if out.success => Ok(()),
            Ok(out) => Err(SnapshotError::GitFailed { stderr: out.stderr }),
            Err(err) => Err(err),
        };
        if let Err(err) = outcome {
            tracing::warn!(key = %key, error = %err, "clone failed; keeping previous snapshot");
            let staged = staged.clone();
            tokio::task::spawn_blocking(move || discard(&staged)).await?;
            return Err(err);
        }

        let target = self.snapshot_dir(&key);
        let trash_root = self.trash_root();
        {
            let target = target.clone();
            tokio::task::spawn_blocking(move || swap_into_place(&staged, &target, &trash_root))
                .await??;
        }

        tracing::info!(key = %key, path = %target.display(), "snapshot ready");
        Ok(target)
    }
}

fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, SnapshotError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(SnapshotError::MissingParam(name)),
    }
}

/// Replace `target` with `staged`, retiring the old tree through `trash_root`.
pub(crate) fn swap_into_place(
    staged: &Path,
    target: &Path,
    trash_root: &Path,
) -> Result<(), SnapshotError> {
    let retired = if fs::symlink_metadata(target).is_ok() {
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let retired = trash_root.join(format!("{}-{}", name, random_suffix()?));
        let moved = fs::create_dir_all(trash_root).and_then(|_| fs::rename(target, &retired));
        if let Err(err) = moved {
            discard(staged);
            return Err(SnapshotError::io_at("retire previous snapshot", target, err));
        }
        Some(retired)
    } else {
        None
    };

    if let Err(err) = fs::rename(staged, target) {
        if let Some(retired) = &retired
            && let Err(restore) = fs::rename(retired, target)
        {
            tracing::warn!(
                path = %target.display(),
                error = %restore,
                "could not restore previous snapshot"
            );
        }
        discard(staged);
        return Err(SnapshotError::io_at("install snapshot", target, err));
    }

    if let Some(retired) = retired
        && let Err(err) = fs::remove_dir_all(&retired)
    {
        tracing::warn!(
            path = %retired.display(),
            error = %err,
            "could not remove retired snapshot; it will be swept on restart"
        );
    }
    Ok(())
}

fn discard(path: &Path) {
    if !path.exists() {
        return;
    }
    if let Err(err) = fs::remove_dir_all(path) {
        tracing::warn!(path = %path.display(), error = %err, "could not remove staged checkout");
    }
}

#[cfg(test)]
#[path = "../tests/store/clone_tests.rs"]
mod tests;
