use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("data file not found: {}. Run 'formfill init' to create it", .0.display())]
    DataFileNotFound(PathBuf),

    #[error("template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    #[error("member not found: {id} (available: {available})")]
    MemberNotFound { id: String, available: String },

    #[error("data file already exists: {}. Use 'show' to view or 'update' to modify", .0.display())]
    DataFileExists(PathBuf),

    #[error("member already exists: {0}")]
    MemberExists(String),

    #[error("invalid field path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("invalid member id '{0}': must be alphanumeric with '_' or '-'")]
    InvalidMemberId(String),

    #[error("failed to parse {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid updates: {0}")]
    InvalidUpdates(String),

    #[error("home directory not found: set HOME or PDF_FORM_FILLER_DATA")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Machine-distinguishable failure class reported to the calling agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    InvalidPath,
    ParseError,
    IoError,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NotFound",
            ErrorKind::AlreadyExists => "AlreadyExists",
            ErrorKind::InvalidPath => "InvalidPath",
            ErrorKind::ParseError => "ParseError",
            ErrorKind::IoError => "IOError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::DataFileNotFound(_)
            | StoreError::TemplateNotFound(_)
            | StoreError::MemberNotFound { .. } => ErrorKind::NotFound,
            StoreError::DataFileExists(_) | StoreError::MemberExists(_) => {
                ErrorKind::AlreadyExists
            }
            StoreError::InvalidPath { .. } | StoreError::InvalidMemberId(_) => {
                ErrorKind::InvalidPath
            }
            StoreError::Parse { .. } | StoreError::InvalidUpdates(_) | StoreError::Json(_) => {
                ErrorKind::ParseError
            }
            StoreError::HomeNotFound | StoreError::Io(_) => ErrorKind::IoError,
        }
    }

    pub(crate) fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
