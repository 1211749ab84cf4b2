use std::fmt;

/// Result type for fieldscope-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Catalog, statistics, or listing fetch failed. Surfaced as a
    /// blocking error state replacing the tab's content.
    Fetch(String),

    /// Apply, notes, save, load, or delete failed. Non-fatal: reported
    /// on the event stream and swallowed; no automatic retry.
    Mutation(String),

    /// Apply was attempted with an empty selection. A validation
    /// failure, rejected before any store call is issued.
    EmptySelection,

    /// Engine layer error (e.g., a name absent from the catalog)
    Engine(fieldscope_engine::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Fetch(msg) => write!(f, "Fetch failed: {}", msg),
            Error::Mutation(msg) => write!(f, "Mutation failed: {}", msg),
            Error::EmptySelection => write!(f, "Cannot apply an empty selection"),
            Error::Engine(err) => write!(f, "Engine error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Engine(err) => Some(err),
            Error::Fetch(_) | Error::Mutation(_) | Error::EmptySelection => None,
        }
    }
}

impl From<fieldscope_engine::Error> for Error {
    fn from(err: fieldscope_engine::Error) -> Self {
        Error::Engine(err)
    }
}
