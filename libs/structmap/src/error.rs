/// Error kind for conversion errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NilInput,
    NotARecord,
    InvalidOverrideSignature,
    EmptyKey,
    Config,
}

/// Conversion error — returned by every fallible operation of the crate.
///
/// Errors raised while converting a nested record are propagated verbatim,
/// so the kind seen by the caller is the kind of the innermost failure.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("input is a nil pointer")]
    NilInput,

    #[error("data is not a struct but {kind}")]
    NotARecord { kind: &'static str },

    #[error("wrong method {method}, {reason}")]
    InvalidOverrideSignature { method: String, reason: &'static str },

    #[error("field '{field}' has an empty key for tag '{tag}'")]
    EmptyKey { field: &'static str, tag: String },

    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NilInput => ErrorKind::NilInput,
            Error::NotARecord { .. } => ErrorKind::NotARecord,
            Error::InvalidOverrideSignature { .. } => ErrorKind::InvalidOverrideSignature,
            Error::EmptyKey { .. } => ErrorKind::EmptyKey,
            Error::Config(_) => ErrorKind::Config,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
