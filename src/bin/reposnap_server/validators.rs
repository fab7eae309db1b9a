use super::*;

pub(super) fn key_from_params(
    owner: Option<&str>,
    repo: Option<&str>,
) -> Result<SnapshotKey, SnapshotError> {
    let owner = owner.ok_or(SnapshotError::MissingParam("owner"))?;
    let repo = repo.ok_or(SnapshotError::MissingParam("repo"))?;
    SnapshotKey::new(owner, repo)
}

pub(super) fn validate_file_path(path: &str) -> Result<(), SnapshotError> {
    if path.is_empty() {
        return Err(SnapshotError::MissingParam("path"));
    }
    if path.contains('\0') {
        return Err(SnapshotError::PathEscape {
            path: path.replace('\0', "\\0"),
        });
    }
    Ok(())
}
