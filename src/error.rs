use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the prediction pipeline. Degenerate ratios and empty
/// candidate sets are values, not errors; only I/O-level problems end up here.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("required input is missing: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("malformed marker table {}: {source}", .path.display())]
    MalformedTable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
