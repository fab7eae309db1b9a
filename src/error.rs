/// Failures surfaced by snapshot operations.
///
/// Each variant belongs to exactly one caller-visible kind (validation, not
/// found, path security, external tool, timeout, unexpected); the server maps
/// kinds to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("missing required parameter: {0}")]
    MissingParam(&'static str),

    #[error("{0}")]
    InvalidKey(String),

    #[error("repository not cloned: {key}")]
    SnapshotNotFound { key: String },

    #[error("file not found: {path}")]
    FileNotFound { path: String },

    #[error("invalid file path: {path}")]
    PathEscape { path: String },

    #[error("path is not a file: {path}")]
    NotAFile { path: String },

    #[error("git clone failed: {stderr}")]
    GitFailed { stderr: String },

    #[error("clone operation timed out after {secs}s")]
    CloneTimeout { secs: u64 },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Unexpected(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    PathSecurity,
    NotAFile,
    ExternalTool,
    Timeout,
    Unexpected,
}

impl SnapshotError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingParam(_) | Self::InvalidKey(_) => ErrorKind::Validation,
            Self::SnapshotNotFound { .. } | Self::FileNotFound { .. } => ErrorKind::NotFound,
            Self::PathEscape { .. } => ErrorKind::PathSecurity,
            Self::NotAFile { .. } => ErrorKind::NotAFile,
            Self::GitFailed { .. } => ErrorKind::ExternalTool,
            Self::CloneTimeout { .. } => ErrorKind::Timeout,
            Self::Io { .. } | Self::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn io_at(action: &str, path: &std::path::Path, source: std::io::Error) -> Self {
        Self::io(format!("{} {}", action, path.display()), source)
    }
}

impl From<tokio::task::JoinError> for SnapshotError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Unexpected(format!("background task failed: {}", err))
    }
}
