use thiserror::Error;

/// Fatal errors for a QC run.
///
/// Row-level data problems are never represented here; those are surfaced as
/// per-row remarks in the annotated table. This taxonomy covers the conditions
/// that abort a run (configuration, missing structural anchors) or abort the
/// loading of a single reference document.
#[derive(Debug, Error)]
pub enum QcError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("could not detect header row in {file} (scanned {scanned} rows)")]
    HeaderNotFound { file: String, scanned: usize },

    #[error("could not locate a monitoring period in the reference document")]
    PeriodNotFound,

    #[error("sheet not found: {0}")]
    SheetNotFound(String),

    #[error("workbook error: {0}")]
    Workbook(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, QcError>;
