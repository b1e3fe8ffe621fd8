use std::backtrace::Backtrace;
pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    /// The caller handed us something unusable: an empty ciphertext, a zero
    /// solution cap, a malformed alphabet, or conflicting pinned mappings.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// An internal invariant was violated. Never produced by well-formed
    /// inputs against a well-formed dictionary.
    #[error("internal invariant violated: {0}")]
    Internal(String),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Inner: {inner}\n{backtrace}")]
    Inner {
        inner: Box<SolverError>,
        backtrace: Box<Backtrace>,
    },
}

impl Error {
    /// The underlying [`SolverError`], without the captured backtrace.
    pub fn solver_error(&self) -> &SolverError {
        match self {
            Error::Inner { inner, .. } => inner,
        }
    }
}

impl From<SolverError> for Error {
    fn from(inner: SolverError) -> Self {
        Error::Inner {
            inner: Box::new(inner),
            backtrace: Box::new(std::backtrace::Backtrace::capture()),
        }
    }
}
