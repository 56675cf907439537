use thiserror::Error;

/// Failures while reading prompt records or corpora from CSV.
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("column '{column}' not found (available: {})", .available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },
}

pub type Result<T> = std::result::Result<T, CorpusError>;
