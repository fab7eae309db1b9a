use std::fs;
use std::io::Read;
use std::path::Path;

use crate::error::SnapshotError;
use crate::model::{BatchEntry, SnapshotKey};

use super::{SnapshotStore, resolve};

/// Default raw-byte budget per file for batch reads.
pub const DEFAULT_MAX_SIZE: u64 = 8000;

impl SnapshotStore {
    /// Full contents of one file, lossily decoded.
    pub async fn read_file(
        &self,
        key: &SnapshotKey,
        relative: &str,
    ) -> Result<String, SnapshotError> {
        let _guard = self.lock_shared(key).await;
        let root = self.existing_dir(key)?;
        let relative = relative.to_string();
        tokio::task::spawn_blocking(move || {
            let path = resolve(&root, &relative)?;
            let bytes = fs::read(&path).map_err(|e| read_error("read", &relative, e))?;
            Ok(decode_text(&bytes))
        })
        .await?
    }

    /// Up to `max_size` bytes of each requested file.
    ///
    /// One entry per requested path, in request order. Per-path failures are
    /// recorded on the entry and never abort the rest of the batch; only a
    /// missing snapshot fails the whole call.
    pub async fn read_many(
        &self,
        key: &SnapshotKey,
        paths: Vec<String>,
        max_size: u64,
    ) -> Result<Vec<BatchEntry>, SnapshotError> {
        let _guard = self.lock_shared(key).await;
        let root = self.existing_dir(key)?;
        tokio::task::spawn_blocking(move || Ok(read_batch(&root, paths, max_size))).await?
    }
}

pub(crate) fn read_batch(root: &Path, paths: Vec<String>, max_size: u64) -> Vec<BatchEntry> {
    paths
        .into_iter()
        .map(|path| match read_bounded(root, &path, max_size) {
            Ok((content, truncated)) => BatchEntry::ok(path, content, truncated),
            Err(err) => {
                tracing::debug!(path = %path, error = %err, "batch entry failed");
                BatchEntry::failed(path, &err)
            }
        })
        .collect()
}

fn read_bounded(
    root: &Path,
    relative: &str,
    max_size: u64,
) -> Result<(String, bool), SnapshotError> {
    let path = resolve(root, relative)?;
    let file = fs::File::open(&path).map_err(|e| read_error("open", relative, e))?;

    // Read one byte past the budget to learn whether anything was cut off.
    let mut bytes = Vec::new();
    file.take(max_size.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(|e| read_error("read", relative, e))?;

    let budget = usize::try_from(max_size).unwrap_or(usize::MAX);
    let truncated = bytes.len() > budget;
    bytes.truncate(budget);
    Ok((decode_text(&bytes), truncated))
}

// Errors name the caller's path, never the location under the storage root.
fn read_error(action: &str, relative: &str, source: std::io::Error) -> SnapshotError {
    SnapshotError::io(format!("{} {}", action, relative), source)
}

/// Decode bytes as UTF-8, dropping invalid sequences.
///
/// The output is never longer than the input. A multi-byte character split
/// at the end of a truncated buffer is an invalid trailing sequence and is
/// dropped whole.
pub fn decode_text(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

#[cfg(test)]
#[path = "../tests/store/read_tests.rs"]
mod tests;
