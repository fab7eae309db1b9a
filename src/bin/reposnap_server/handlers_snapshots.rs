use super::*;

pub(super) async fn clone_repo(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<reposnap::CloneRequest>, JsonRejection>,
) -> Result<Json<CloneResponse>, Response> {
    let Json(payload) = payload.map_err(json_rejection)?;

    let path = state
        .store
        .clone_snapshot(&payload)
        .await
        .map_err(snapshot_error)?;

    Ok(Json(CloneResponse {
        status: "success",
        path: path.display().to_string(),
        message: "Repository cloned successfully".to_string(),
    }))
}

pub(super) async fn list_files(
    State(state): State<Arc<AppState>>,
    query: Result<Query<KeyQuery>, QueryRejection>,
) -> Result<Json<FileListResponse>, Response> {
    let Query(query) = query.map_err(query_rejection)?;
    let key = key_from_params(query.owner.as_deref(), query.repo.as_deref())
        .map_err(snapshot_error)?;
    let files = state.store.list_files(&key).await.map_err(snapshot_error)?;
    Ok(Json(FileListResponse { files }))
}

pub(super) async fn get_file(
    State(state): State<Arc<AppState>>,
    file_path: Result<Path<String>, PathRejection>,
    query: Result<Query<KeyQuery>, QueryRejection>,
) -> Result<Json<FileContentResponse>, Response> {
    let Path(file_path) = file_path.map_err(path_rejection)?;
    let Query(query) = query.map_err(query_rejection)?;
    let key = key_from_params(query.owner.as_deref(), query.repo.as_deref())
        .map_err(snapshot_error)?;
    validate_file_path(&file_path).map_err(snapshot_error)?;

    let content = state
        .store
        .read_file(&key, &file_path)
        .await
        .map_err(snapshot_error)?;

    Ok(Json(FileContentResponse {
        path: file_path,
        content,
    }))
}

pub(super) async fn analyze_files(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, Response> {
    let Json(payload) = payload.map_err(json_rejection)?;
    let key = key_from_params(payload.owner.as_deref(), payload.repo.as_deref())
        .map_err(snapshot_error)?;
    let max_size = payload.max_size.unwrap_or(state.default_max_size);

    tracing::debug!(key = %key, files = payload.file_paths.len(), max_size, "batch read");
    let files = state
        .store
        .read_many(&key, payload.file_paths, max_size)
        .await
        .map_err(snapshot_error)?;

    Ok(Json(AnalyzeResponse { files }))
}
