//! Shared error type across kairos crates.

use thiserror::Error;

/// Stable error codes (used by logs and tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Tag name or value outside `[A-Za-z0-9._/-]+`.
    InvalidTag,
    /// Client used in the wrong connection state.
    State,
    /// Socket or file I/O failure.
    Io,
    /// Malformed or out-of-range configuration.
    Config,
    /// Conflicting instrument registration.
    Registry,
}

impl ErrorCode {
    /// String representation used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidTag => "INVALID_TAG",
            ErrorCode::State => "STATE",
            ErrorCode::Io => "IO",
            ErrorCode::Config => "CONFIG",
            ErrorCode::Registry => "REGISTRY",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, KairosError>;

/// Unified error type used by core and reporter.
#[derive(Debug, Error)]
pub enum KairosError {
    #[error("\"{0}\" is not a valid tag name or value; it can only contain alphanumeric characters, period, slash, dash and underscore")]
    InvalidTag(String),
    #[error("already connected")]
    AlreadyConnected,
    #[error("not connected")]
    NotConnected,
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("config: {0}")]
    Config(String),
    #[error("no host configured")]
    NoHostConfigured,
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("registry: {0}")]
    Registry(String),
}

impl KairosError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            KairosError::InvalidTag(_) => ErrorCode::InvalidTag,
            KairosError::AlreadyConnected | KairosError::NotConnected => ErrorCode::State,
            KairosError::Io(_) => ErrorCode::Io,
            KairosError::Config(_)
            | KairosError::NoHostConfigured
            | KairosError::UnsupportedVersion => ErrorCode::Config,
            KairosError::Registry(_) => ErrorCode::Registry,
        }
    }
}
