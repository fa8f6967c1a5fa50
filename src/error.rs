// src/error.rs
//! Application error types with structured error handling.
//!
//! Each variant names the failure mode and the place it happened. Remote
//! failures always carry the endpoint and the raw response body so an
//! operator can correlate them with platform logs.

use std::fmt;
use thiserror::Error;

/// Open platform response codes as a typed vocabulary.
///
/// Zero is the only success value. A handful of codes are common enough
/// to name; everything else is kept verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeishuErrorCode {
    /// The envelope carried no `code` field at all
    Missing,
    /// App id or secret rejected by the token endpoint
    InvalidAppCredentials,
    /// Tenant access token expired or invalid
    InvalidAccessToken,
    /// The app lacks the scope for this endpoint
    Forbidden,
    /// Request frequency limit hit
    RateLimited,
    /// Any other non-zero code
    Other(i64),
}

impl FeishuErrorCode {
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            None => Self::Missing,
            Some(10003) | Some(10014) => Self::InvalidAppCredentials,
            Some(99991663) | Some(99991668) => Self::InvalidAccessToken,
            Some(99991672) | Some(1254302) => Self::Forbidden,
            Some(99991400) => Self::RateLimited,
            Some(other) => Self::Other(other),
        }
    }

    /// Whether re-authenticating could fix the call.
    pub fn is_token_problem(&self) -> bool {
        matches!(self, Self::InvalidAccessToken)
    }
}

impl fmt::Display for FeishuErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "missing_code"),
            Self::InvalidAppCredentials => write!(f, "invalid_app_credentials"),
            Self::InvalidAccessToken => write!(f, "invalid_access_token"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::RateLimited => write!(f, "rate_limited"),
            Self::Other(code) => write!(f, "{}", code),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Failed to obtain tenant access token: {body}")]
    Authentication { body: String },

    #[error("Connector is not authenticated; call authenticate() first")]
    NotAuthenticated,

    #[error("Node {node} wraps a {kind}, which holds no tables")]
    UnsupportedNodeKind { node: String, kind: String },

    #[error("No embedded table {table} found in the sheet behind node {node}")]
    Resolution { node: String, table: String },

    #[error("Remote API call to {endpoint} failed ({code}): {body}")]
    RemoteApi {
        endpoint: String,
        code: FeishuErrorCode,
        body: String,
    },

    #[error("{endpoint} reported more pages after page {pages_fetched} but returned no page token")]
    PaginationProtocol {
        endpoint: String,
        pages_fetched: u32,
    },

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Malformed response from {endpoint}: {message}")]
    MalformedResponse { endpoint: String, message: String },

    #[error("Table rendering failed: {0}")]
    Rendering(String),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error for {path}: {source}")]
    JsonParseError {
        path: std::path::PathBuf,
        source: serde_json::Error,
    },

    #[error("Scripted transport has no response left for {endpoint}")]
    ScriptExhausted { endpoint: String },

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error(transparent)]
    Validation(#[from] crate::types::ValidationError),
}

impl AppError {
    /// The response code carried by a remote failure, if any.
    pub fn remote_code(&self) -> Option<FeishuErrorCode> {
        match self {
            AppError::RemoteApi { code, .. } => Some(*code),
            _ => None,
        }
    }
}

// Allow converting from anyhow::Error, preserving the message
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError {
            message: err.to_string(),
            source: None,
        }
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;
