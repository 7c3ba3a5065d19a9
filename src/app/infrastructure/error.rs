use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] minreq::Error),

    #[error("Tile server returned status {status} for {url}")]
    HttpStatus { status: i32, url: String },

    #[error("Image error: {0}")]
    Image(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

impl From<fltk::prelude::FltkError> for AppError {
    fn from(e: fltk::prelude::FltkError) -> Self {
        AppError::Image(e.to_string())
    }
}

/// Convenience type alias for Results with AppError
pub type Result<T> = std::result::Result<T, AppError>;
