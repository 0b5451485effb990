use serde::{Deserialize, Serialize};

/// Coarse failure category surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Internal failures: lockout, parameter validation, unknown operation.
    Error,
    /// The transport or the upstream service failed.
    Server,
    /// The health gate rejected the call.
    EsiStatus,
    /// The caller's token lacks the operation's scope.
    ScopeMissing,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Error => "error",
            ErrorKind::Server => "server",
            ErrorKind::EsiStatus => "esi_status",
            ErrorKind::ScopeMissing => "scope_missing",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct CallError {
    pub kind: ErrorKind,
    pub message: String,
}

impl CallError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Error, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Server, message)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Parse(#[from] swagcall_core::ParseError),
    #[error("failed to read spec file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to fetch spec: {0}")]
    Fetch(#[from] CallError),
}
