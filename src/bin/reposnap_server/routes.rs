//! HTTP route registration for the snapshot server.

use super::*;

pub(super) fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/clone", post(clone_repo))
        .route("/files", get(list_files))
        .route("/file/*path", get(get_file))
        .route("/analyze", post(analyze_files))
        .fallback(fallback)
        .layer(middleware::from_fn(cors))
        .with_state(state)
}
