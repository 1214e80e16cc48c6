use thiserror::Error;

/// A snapshot (rendered image + markup) could not be obtained for a URL.
#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("no snapshot available for {0}")]
    NotFound(String),

    #[error("failed to read snapshot for {url}: {source}")]
    Io {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode screenshot for {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: image::ImageError,
    },

    #[error("render failed for {url}: {message}")]
    Render { url: String, message: String },
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error("history store error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("settings error: {0}")]
    Settings(String),

    #[error("analysis worker failed: {0}")]
    Worker(String),
}

pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;
