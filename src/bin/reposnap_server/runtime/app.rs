use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;

use reposnap::{SnapshotStore, StoreConfig};

use super::super::routes::app_router;
use super::super::types::AppState;
use super::Args;

pub(super) fn store_config(args: &Args) -> StoreConfig {
    let mut cfg = StoreConfig::new(&args.data_dir);
    cfg.git = args.git.clone();
    cfg.clone_timeout = Duration::from_secs(args.clone_timeout_secs);
    cfg
}

pub(super) fn build_state(args: &Args) -> Result<Arc<AppState>> {
    let store = SnapshotStore::open(store_config(args))
        .with_context(|| format!("open data dir {}", args.data_dir.display()))?;

    Ok(Arc::new(AppState {
        store,
        default_max_size: args.default_max_size,
    }))
}

pub(super) fn build_app_router(state: Arc<AppState>) -> Router {
    app_router(state)
}

#[cfg(test)]
#[path = "../../../tests/bin/reposnap_server/runtime/app_tests.rs"]
mod tests;
