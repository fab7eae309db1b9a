use std::path::Path;

use walkdir::WalkDir;

use crate::error::SnapshotError;
use crate::model::{FileRecord, SnapshotKey};

use super::{SnapshotStore, VCS_DIR};

impl SnapshotStore {
    /// Enumerate every regular file in the key's snapshot, `.git` excluded.
    pub async fn list_files(&self, key: &SnapshotKey) -> Result<Vec<FileRecord>, SnapshotError> {
        let _guard = self.lock_shared(key).await;
        let root = self.existing_dir(key)?;
        tokio::task::spawn_blocking(move || walk_files(&root)).await?
    }
}

pub(crate) fn walk_files(root: &Path) -> Result<Vec<FileRecord>, SnapshotError> {
    let mut out = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !(e.file_type().is_dir() && e.file_name() == VCS_DIR));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .and_then(|p| p.strip_prefix(root).ok())
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            SnapshotError::io(
                format!("walk {}", path),
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop")),
            )
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let rel = entry
            .path()
            .strip_prefix(root)
            .map_err(|_| SnapshotError::Unexpected("walk escaped snapshot root".to_string()))?;
        let rel = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let size = entry
            .metadata()
            .map_err(|e| {
                SnapshotError::io(
                    format!("stat {}", rel),
                    e.into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("metadata unavailable")),
                )
            })?
            .len();
        out.push(FileRecord::file(rel, size));
    }

    out.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(out)
}

#[cfg(test)]
#[path = "../tests/store/inventory_tests.rs"]
mod tests;
