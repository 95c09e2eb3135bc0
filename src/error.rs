use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GroundworkError>;

#[derive(Error, Debug)]
pub enum GroundworkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Download failed: {url}")]
    DownloadError { url: String, status: Option<i32> },

    #[error("Not a valid archive: {}", path.display())]
    BadArchive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Unsupported archive format: {name}")]
    UnsupportedArchive { name: String },

    #[error("Archive URL has no file name: {url}")]
    InvalidUrl { url: String },

    #[error("Command failed: {command} (status {status:?})")]
    CommandFailed { command: String, status: Option<i32> },

    #[error("Required tool not found: {name}")]
    ToolNotFound { name: String },

    #[error("Manifest error: {message}")]
    ManifestError { message: String },

    #[error("Prompt error: {message}")]
    PromptError { message: String },

    #[error("Home directory not found")]
    HomeDirectoryNotFound,
}

impl GroundworkError {
    pub fn manifest_error<S: Into<String>>(message: S) -> Self {
        GroundworkError::ManifestError {
            message: message.into(),
        }
    }
}
