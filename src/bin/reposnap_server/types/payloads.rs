use reposnap::{BatchEntry, FileRecord};

#[derive(Debug, Default, serde::Deserialize)]
pub(crate) struct KeyQuery {
    #[serde(default)]
    pub(crate) owner: Option<String>,

    #[serde(default)]
    pub(crate) repo: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct AnalyzeRequest {
    #[serde(default)]
    pub(crate) owner: Option<String>,

    #[serde(default)]
    pub(crate) repo: Option<String>,

    #[serde(default)]
    pub(crate) file_paths: Vec<String>,

    #[serde(default)]
    pub(crate) max_size: Option<u64>,
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct CloneResponse {
    pub(crate) status: &'static str,
    pub(crate) path: String,
    pub(crate) message: String,
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct FileListResponse {
    pub(crate) files: Vec<FileRecord>,
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct FileContentResponse {
    pub(crate) path: String,
    pub(crate) content: String,
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct AnalyzeResponse {
    pub(crate) files: Vec<BatchEntry>,
}
