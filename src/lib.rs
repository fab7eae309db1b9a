//! Ephemeral repository snapshots: shallow git checkouts kept on local disk and
//! served file by file to analysis callers.

pub mod error;
pub mod git;
pub mod model;
pub mod store;

pub use error::SnapshotError;
pub use model::{BatchEntry, CloneRequest, FileRecord, SnapshotKey};
pub use store::{SnapshotStore, StoreConfig};
