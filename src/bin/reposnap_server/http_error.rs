use reposnap::error::ErrorKind;

use super::*;

pub(super) fn error_response(status: StatusCode, msg: &str) -> Response {
    (status, Json(serde_json::json!({"error": msg}))).into_response()
}

pub(super) fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "not found")
}

pub(super) fn json_rejection(rejection: JsonRejection) -> Response {
    error_response(StatusCode::BAD_REQUEST, &rejection.body_text())
}

pub(super) fn query_rejection(rejection: QueryRejection) -> Response {
    error_response(StatusCode::BAD_REQUEST, &rejection.body_text())
}

pub(super) fn path_rejection(rejection: PathRejection) -> Response {
    error_response(StatusCode::BAD_REQUEST, &rejection.body_text())
}

pub(super) fn status_for(err: &SnapshotError) -> StatusCode {
    match err.kind() {
        ErrorKind::Validation | ErrorKind::PathSecurity | ErrorKind::NotAFile => {
            StatusCode::BAD_REQUEST
        }
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::ExternalTool | ErrorKind::Timeout | ErrorKind::Unexpected => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub(super) fn snapshot_error(err: SnapshotError) -> Response {
    let status = status_for(&err);
    if status.is_server_error() {
        tracing::error!(error = %err, "request failed");
    } else {
        tracing::debug!(error = %err, status = status.as_u16(), "request rejected");
    }
    error_response(status, &err.to_string())
}

#[cfg(test)]
#[path = "../../tests/bin/reposnap_server/http_error_tests.rs"]
mod tests;
