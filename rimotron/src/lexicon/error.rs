//! Errors raised while reading or writing a persisted lexicon table.

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TableError {
    /// The table file could not be opened or created
    #[error("IO error for lexicon table {0}: {1}")]
    Io(String, #[source] std::io::Error),

    /// The table could not be read or written as tab-separated values
    #[error("Malformed lexicon table: {0}")]
    Csv(#[from] csv::Error),
}
