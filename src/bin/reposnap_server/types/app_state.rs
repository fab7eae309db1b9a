use super::*;

#[derive(Clone, Debug)]
pub(crate) struct AppState {
    pub(crate) store: SnapshotStore,

    // Byte budget per file for `/analyze` when the caller sends no `max_size`.
    pub(crate) default_max_size: u64,
}
