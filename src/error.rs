use std::path::PathBuf;

/// Per-URL failures. Never fatal to a batch: the driver turns them into
/// blank output rows.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("not a {host} URL: {url}")]
    UnsupportedUrl { url: String, host: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: reqwest::StatusCode },

    #[error("HTTP client error: {0}")]
    Client(String),
}

/// Setup failures around the tabular input and output. These abort a run.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("input file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("column '{column}' not found. Available columns: {available}")]
    MissingColumn { column: String, available: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
