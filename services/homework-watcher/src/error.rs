//! Error types for the homework watcher

use std::fmt;

/// Errors that can occur in the homework watcher
#[derive(Debug, thiserror::Error)]
pub enum WatcherError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("API request to {endpoint} with from_date={from_date} failed: {failure}")]
    ApiRequest {
        endpoint: String,
        from_date: i64,
        failure: RequestFailure,
    },

    #[error("Failed to decode API response from {endpoint} with from_date={from_date}: {cause}")]
    Decode {
        endpoint: String,
        from_date: i64,
        cause: String,
    },

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error("Unknown homework status: {0}")]
    UnknownStatus(String),

    #[error("Message delivery failed: {0}")]
    Delivery(String),
}

/// Why a request to the grading API did not produce a usable response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestFailure {
    /// Connection refused, timeout, DNS failure and the like
    Transport(String),
    /// The endpoint answered with something other than 200
    Status(u16),
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestFailure::Transport(cause) => write!(f, "{}", cause),
            RequestFailure::Status(code) => write!(f, "endpoint returned status {}", code),
        }
    }
}

/// The payload did not have the expected structure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("expected a JSON object, got {found}")]
    NotAnObject { found: &'static str },

    #[error("missing keys: {}", .keys.join(", "))]
    MissingKeys { keys: Vec<String> },

    #[error("field \"{field}\" should be {expected}, got {found}")]
    WrongType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Coarse classification used by the engine to decide how to react to a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Network,
    Shape,
    UnknownStatus,
    Delivery,
}

impl WatcherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WatcherError::MissingCredentials(_) | WatcherError::Config(_) => ErrorKind::Config,
            WatcherError::Http(_)
            | WatcherError::ApiRequest { .. }
            | WatcherError::Decode { .. } => ErrorKind::Network,
            WatcherError::Shape(_) => ErrorKind::Shape,
            WatcherError::UnknownStatus(_) => ErrorKind::UnknownStatus,
            WatcherError::Delivery(_) => ErrorKind::Delivery,
        }
    }
}

/// Name of a JSON value's type, for diagnostics
pub fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Result type alias for watcher operations
pub type Result<T> = std::result::Result<T, WatcherError>;
