use thiserror::Error;

/// Errors surfaced by the ranking core. None of them are swallowed internally.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RankError {
    /// The corpus is empty or every title and content field is empty.
    #[error("degenerate corpus ({documents} documents): average field lengths are undefined")]
    DegenerateCorpus { documents: usize },

    /// A parameter failed validation before any scoring started.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// A scoring worker failed; no partial result is returned.
    #[error("worker {worker} failed: {reason}")]
    WorkerFailure { worker: usize, reason: String },
}

impl RankError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        RankError::InvalidConfiguration { reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, RankError>;
