use std::{fmt, io};
use axum::{http::StatusCode, response::{IntoResponse, Response}};

/// Error type shared by the content loaders, renderers and handlers
#[derive(Debug)]
pub enum FolioError {
    Io(io::Error),
    Json(serde_json::Error),
    NotFound,
    InvalidPath,
    CategoryNotFound(String),
    TemplateError(String),
    ConfigError(String),
}

impl From<io::Error> for FolioError {
    fn from(err: io::Error) -> Self {
        FolioError::Io(err)
    }
}

impl From<serde_json::Error> for FolioError {
    fn from(err: serde_json::Error) -> Self {
        FolioError::Json(err)
    }
}

impl fmt::Display for FolioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FolioError::Io(e) => write!(f, "I/O error: {}", e),
            FolioError::Json(e) => write!(f, "JSON error: {}", e),
            FolioError::NotFound => write!(f, "Not found"),
            FolioError::InvalidPath => write!(f, "Invalid path"),
            FolioError::CategoryNotFound(id) => write!(f, "Category not found: {}", id),
            FolioError::TemplateError(e) => write!(f, "Template error: {}", e),
            FolioError::ConfigError(e) => write!(f, "Config error: {}", e),
        }
    }
}

impl std::error::Error for FolioError {}

impl FolioError {
    /// HTTP status the error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            FolioError::NotFound | FolioError::CategoryNotFound(_) => StatusCode::NOT_FOUND,
            FolioError::InvalidPath => StatusCode::BAD_REQUEST,
            FolioError::Io(e) if e.kind() == io::ErrorKind::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for FolioError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("Request failed: {}", self);
        }
        (status, self.to_string()).into_response()
    }
}
