use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlignError {
    #[error("entity '{0}' not found among vote columns")]
    EntityNotFound(String),

    #[error("date column '{0}' not found in header")]
    MissingDateColumn(String),

    #[error("input has {found} columns, need at least {required} (metadata columns plus one entity)")]
    TooFewColumns { found: usize, required: usize },

    #[error("unrecognized date '{0}' (expected e.g. YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("failed to read vote data: {0}")]
    Csv(#[from] csv::Error),
}
