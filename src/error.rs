use thiserror::Error;

pub type DashResult<T> = Result<T, DashError>;

/// Faults surfaced by the filter core and the table loader.
///
/// Scope and comparison errors are request contract violations and always
/// propagate to the caller. `NoMatchingData` and `UnknownVariable` propagate
/// from single-target queries but are folded into "empty contribution" by the
/// multi-site and multi-group assemblers.
#[derive(Error, Debug)]
pub enum DashError {
    #[error("Invalid scope: {what}")]
    InvalidScope { what: &'static str },

    #[error("A site is required for grouped comparisons")]
    MissingSite,

    #[error("Need at least two systems or two phases to compare")]
    InsufficientComparisonItems,

    #[error("No data found for the selected plots")]
    NoMatchingData,

    #[error("Variable {name:?} not found in table columns")]
    UnknownVariable { name: String },

    #[error("Malformed plot identifier {raw:?}: {what}")]
    MalformedIdentifier { raw: String, what: &'static str },

    #[error("Expected {expected} fields, got {got}")]
    RaggedRow { expected: usize, got: usize },

    #[error("Table has no {name:?} column")]
    MissingColumn { name: &'static str },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}
