use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use crate::error::SnapshotError;

use super::VCS_DIR;

/// Resolve a caller-supplied relative path against a snapshot root.
///
/// The result is the canonical path of a regular file contained in the
/// canonical root. Containment is decided by path components, so a sibling
/// such as `<root>-other/` never passes, and symlinks are followed before the
/// check. Paths reaching into the `.git` metadata directory are rejected like
/// any other escape.
pub fn resolve(root: &Path, relative: &str) -> Result<PathBuf, SnapshotError> {
    let escape = || SnapshotError::PathEscape {
        path: relative.to_string(),
    };

    let normalized = normalize_relative(relative).ok_or_else(escape)?;
    if touches_vcs_dir(&normalized) {
        return Err(escape());
    }

    let canonical_root = root
        .canonicalize()
        .map_err(|e| SnapshotError::io_at("canonicalize", root, e))?;

    let target = match canonical_root.join(&normalized).canonicalize() {
        Ok(p) => p,
        Err(err) => {
            return Err(match err.kind() {
                std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory => {
                    SnapshotError::FileNotFound {
                        path: relative.to_string(),
                    }
                }
                _ => SnapshotError::io(format!("resolve {}", relative), err),
            });
        }
    };

    let Ok(inside) = target.strip_prefix(&canonical_root) else {
        tracing::debug!(path = relative, "rejected path outside snapshot root");
        return Err(escape());
    };
    if touches_vcs_dir(inside) {
        return Err(escape());
    }

    let meta =
        std::fs::metadata(&target).map_err(|e| SnapshotError::io_at("stat", &target, e))?;
    if !meta.is_file() {
        return Err(SnapshotError::NotAFile {
            path: relative.to_string(),
        });
    }

    Ok(target)
}

/// Lexically fold `.` and `..`; `None` if the path is absolute or climbs
/// above its starting point.
fn normalize_relative(relative: &str) -> Option<PathBuf> {
    let mut parts: Vec<&OsStr> = Vec::new();
    for component in Path::new(relative).components() {
        match component {
            Component::Prefix(_) | Component::RootDir => return None,
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::Normal(name) => parts.push(name),
        }
    }
    Some(parts.iter().collect())
}

fn touches_vcs_dir(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c, Component::Normal(name) if name == VCS_DIR))
}

#[cfg(test)]
#[path = "../tests/store/resolve_tests.rs"]
mod tests;
