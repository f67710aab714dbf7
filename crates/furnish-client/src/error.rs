//! Error types for resource client calls

use std::fmt;
use thiserror::Error;

/// Result type alias for resource client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// The four calls a resource client makes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `GET /<resource>`
    List,
    /// `POST /<resource>`
    Create,
    /// `PUT /<resource>/{id}`
    Update,
    /// `DELETE /<resource>/{id}`
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::List => "list",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

/// Errors that can occur while talking to the backend
#[derive(Error, Debug)]
pub enum ClientError {
    /// The backend answered with a non-success status
    #[error("Failed to {operation} {resource}: server returned {status}")]
    Fetch {
        /// Resource path
        resource: String,
        /// Operation that failed
        operation: Operation,
        /// HTTP status code
        status: u16,
    },

    /// The response body was not the JSON we expected
    #[error("Failed to decode {operation} response for {resource}: {message}")]
    Decode {
        /// Resource path
        resource: String,
        /// Operation whose response failed to decode
        operation: Operation,
        /// Decoder message
        message: String,
    },

    /// The request never got a response
    #[error("Failed to {operation} {resource}: {source}")]
    Transport {
        /// Resource path
        resource: String,
        /// Operation that failed
        operation: Operation,
        /// Underlying HTTP client error
        #[source]
        source: reqwest::Error,
    },

    /// No credential is stored, so the request was not sent
    #[error("Not signed in: no credential available for {resource}")]
    MissingCredential {
        /// Resource path
        resource: String,
    },

    /// The configured base URL cannot address resources
    #[error("Invalid API URL '{url}': {message}")]
    InvalidUrl {
        /// Offending URL
        url: String,
        /// Parser message
        message: String,
    },

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Builder(#[source] reqwest::Error),
}

impl ClientError {
    /// Create a fetch error
    pub fn fetch(resource: impl Into<String>, operation: Operation, status: u16) -> Self {
        Self::Fetch {
            resource: resource.into(),
            operation,
            status,
        }
    }

    /// Create a decode error
    pub fn decode(
        resource: impl Into<String>,
        operation: Operation,
        message: impl fmt::Display,
    ) -> Self {
        Self::Decode {
            resource: resource.into(),
            operation,
            message: message.to_string(),
        }
    }

    /// HTTP status, if the backend answered
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Fetch { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether trying the same call again may succeed
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Fetch { status, .. } => *status >= 500 || *status == 408 || *status == 429,
            _ => false,
        }
    }

    /// Whether the backend rejected the credential
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Fetch { status: 401 | 403, .. })
    }
}

impl From<ClientError> for furnish_core::Error {
    fn from(err: ClientError) -> Self {
        Self::Client(err.to_string())
    }
}
