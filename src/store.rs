use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::{OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};

use crate::error::SnapshotError;
use crate::model::SnapshotKey;

mod clone;
mod inventory;
mod read;
mod resolve;

pub use self::read::{DEFAULT_MAX_SIZE, decode_text};
pub use self::resolve::resolve;

const STAGING_DIR: &str = ".staging";
const TRASH_DIR: &str = ".trash";
pub const VCS_DIR: &str = ".git";

#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub root: PathBuf,
    pub git: PathBuf,
    pub clone_timeout: Duration,
}

impl StoreConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            git: PathBuf::from("git"),
            clone_timeout: Duration::from_secs(300),
        }
    }
}

/// Owns the on-disk snapshot trees, one directory per key under `root`.
///
/// Every operation on a key runs under that key's lock: clones take it
/// exclusively, listing and reads share it.
#[derive(Clone, Debug)]
pub struct SnapshotStore {
    root: PathBuf,
    git: PathBuf,
    clone_timeout: Duration,
    locks: LockTable,
}

type LockTable = Arc<Mutex<HashMap<String, LockSlot>>>;

/// A key's lock plus the number of callers currently holding or awaiting it.
#[derive(Debug)]
struct LockSlot {
    lock: Arc<RwLock<()>>,
    users: usize,
}

/// Keeps a key's slot registered; the last lease to go removes the slot.
#[derive(Debug)]
struct LockLease {
    table: LockTable,
    name: String,
}

impl Drop for LockLease {
    fn drop(&mut self) {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = table.get_mut(&self.name) {
            slot.users = slot.users.saturating_sub(1);
            if slot.users == 0 {
                table.remove(&self.name);
            }
        }
    }
}

/// A held key lock. The guard is released before the lease is returned.
#[derive(Debug)]
pub(crate) struct KeyGuard<G> {
    _guard: G,
    _lease: LockLease,
}

impl SnapshotStore {
    /// Open (creating if needed) the storage root and sweep leftovers of
    /// interrupted clones.
    pub fn open(config: StoreConfig) -> Result<Self, SnapshotError> {
        fs::create_dir_all(&config.root)
            .map_err(|e| SnapshotError::io_at("create storage root", &config.root, e))?;
        let root = config
            .root
            .canonicalize()
            .map_err(|e| SnapshotError::io_at("canonicalize storage root", &config.root, e))?;

        for leftover in [root.join(STAGING_DIR), root.join(TRASH_DIR)] {
            if leftover.exists() {
                tracing::info!(path = %leftover.display(), "removing leftover clone data");
                fs::remove_dir_all(&leftover)
                    .map_err(|e| SnapshotError::io_at("remove", &leftover, e))?;
            }
        }

        Ok(Self {
            root,
            git: config.git,
            clone_timeout: config.clone_timeout,
            locks: LockTable::default(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn snapshot_dir(&self, key: &SnapshotKey) -> PathBuf {
        self.root.join(key.dir_name())
    }

    pub fn exists(&self, key: &SnapshotKey) -> bool {
        self.snapshot_dir(key).is_dir()
    }

    fn staging_root(&self) -> PathBuf {
        self.root.join(STAGING_DIR)
    }

    fn trash_root(&self) -> PathBuf {
        self.root.join(TRASH_DIR)
    }

    fn key_lock(&self, key: &SnapshotKey) -> (Arc<RwLock<()>>, LockLease) {
        let name = key.dir_name();
        let mut table = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        let slot = table.entry(name.clone()).or_insert_with(|| LockSlot {
            lock: Arc::new(RwLock::new(())),
            users: 0,
        });
        slot.users += 1;
        let lease = LockLease {
            table: Arc::clone(&self.locks),
            name,
        };
        (Arc::clone(&slot.lock), lease)
    }

    pub(crate) async fn lock_shared(
        &self,
        key: &SnapshotKey,
    ) -> KeyGuard<OwnedRwLockReadGuard<()>> {
        let (lock, lease) = self.key_lock(key);
        KeyGuard {
            _guard: lock.read_owned().await,
            _lease: lease,
        }
    }

    pub(crate) async fn lock_exclusive(
        &self,
        key: &SnapshotKey,
    ) -> KeyGuard<OwnedRwLockWriteGuard<()>> {
        let (lock, lease) = self.key_lock(key);
        KeyGuard {
            _guard: lock.write_owned().await,
            _lease: lease,
        }
    }

    #[cfg(test)]
    pub(crate) fn lock_slots(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// The key's root directory, or `SnapshotNotFound` when nothing is cloned.
    pub(crate) fn existing_dir(&self, key: &SnapshotKey) -> Result<PathBuf, SnapshotError> {
        let dir = self.snapshot_dir(key);
        if !dir.is_dir() {
            return Err(SnapshotError::SnapshotNotFound {
                key: key.to_string(),
            });
        }
        Ok(dir)
    }
}

pub(crate) fn random_suffix() -> Result<String, SnapshotError> {
    let mut bytes = [0u8; 8];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| SnapshotError::Unexpected(format!("getrandom: {:?}", e)))?;
    Ok(bytes.iter().map(|b| format!("{:02x}", b)).collect())
}

#[cfg(test)]
#[path = "tests/store/store_tests.rs"]
mod tests;
