use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{Method, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use reposnap::{SnapshotError, SnapshotKey, SnapshotStore};

#[path = "reposnap_server/types/mod.rs"]
mod types;
use self::types::*;
#[path = "reposnap_server/http_error.rs"]
mod http_error;
use self::http_error::*;
#[path = "reposnap_server/validators.rs"]
mod validators;
use self::validators::*;
#[path = "reposnap_server/handlers_system.rs"]
mod handlers_system;
use self::handlers_system::*;
#[path = "reposnap_server/handlers_snapshots.rs"]
mod handlers_snapshots;
use self::handlers_snapshots::*;
#[path = "reposnap_server/routes.rs"]
mod routes;
#[path = "reposnap_server/runtime/mod.rs"]
mod runtime;

#[tokio::main]
async fn main() {
    if let Err(err) = runtime::run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
