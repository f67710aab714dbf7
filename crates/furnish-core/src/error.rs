//! Error types for Furnish Admin

use std::{error::Error as StdError, fmt};

/// Main error type shared by the Furnish Admin crates
#[derive(Debug)]
pub enum Error {
    /// I/O error
    Io(std::io::Error),

    /// Configuration error
    Configuration {
        /// Error message
        message: String,
    },

    /// Validation error
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// Field name not declared by the resource schema
    UnknownField {
        /// Resource path the field was looked up on
        resource: String,
        /// Offending field name
        field: String,
    },

    /// Resource not present in the catalog
    UnknownResource {
        /// Requested path or label
        name: String,
    },

    /// Not found error
    NotFound {
        /// Resource that was not found
        resource: String,
    },

    /// A modal is already open on the page
    ModalBusy {
        /// Modal currently occupying the page
        open: String,
    },

    /// Operation invoked in a state that does not allow it
    InvalidState {
        /// Description of the violated precondition
        message: String,
    },

    /// Serialization error
    Serialization(serde_json::Error),

    /// Error reported by a resource client
    Client(String),

    /// Other error
    Other(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invalid state error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Configuration { message } => write!(f, "Configuration error: {message}"),
            Self::Validation { field, message } => {
                write!(f, "Validation error: {field} - {message}")
            }
            Self::UnknownField { resource, field } => {
                write!(f, "Unknown field '{field}' for resource {resource}")
            }
            Self::UnknownResource { name } => write!(f, "Unknown resource: {name}"),
            Self::NotFound { resource } => write!(f, "Resource not found: {resource}"),
            Self::ModalBusy { open } => write!(f, "Another dialog is already open: {open}"),
            Self::InvalidState { message } => write!(f, "Invalid state: {message}"),
            Self::Serialization(err) => write!(f, "Serialization error: {err}"),
            Self::Client(msg) => write!(f, "Client error: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::uninlined_format_args)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io;

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "token file missing");
        let app_error = Error::from(io_error);

        assert!(matches!(app_error, Error::Io(_)));
        assert!(format!("{}", app_error).contains("I/O error"));
        assert!(app_error.source().is_some());
    }

    #[test]
    fn test_validation_error() {
        let error = Error::validation("name", "is required");

        assert_eq!(format!("{}", error), "Validation error: name - is required");
        assert!(error.source().is_none());
    }

    #[test]
    fn test_unknown_field_error() {
        let error = Error::UnknownField {
            resource: "brands".to_string(),
            field: "colour".to_string(),
        };

        assert_eq!(
            format!("{}", error),
            "Unknown field 'colour' for resource brands"
        );
    }

    #[test]
    fn test_modal_busy_error() {
        let error = Error::ModalBusy {
            open: "delete confirmation".to_string(),
        };

        assert_eq!(
            format!("{}", error),
            "Another dialog is already open: delete confirmation"
        );
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{oops}").unwrap_err();
        let app_error = Error::from(json_error);

        assert!(matches!(app_error, Error::Serialization(_)));
        assert!(app_error.source().is_some());
    }

    #[test]
    fn test_all_error_display_variants() {
        let test_cases = vec![
            (
                Error::Configuration {
                    message: "bad url".to_string(),
                },
                "Configuration error: bad url",
            ),
            (
                Error::UnknownResource {
                    name: "sofas".to_string(),
                },
                "Unknown resource: sofas",
            ),
            (
                Error::NotFound {
                    resource: "brands/7".to_string(),
                },
                "Resource not found: brands/7",
            ),
            (
                Error::invalid_state("editor is closed"),
                "Invalid state: editor is closed",
            ),
            (
                Error::Client("status 500".to_string()),
                "Client error: status 500",
            ),
            (Error::Other("other error".to_string()), "other error"),
        ];

        for (error, expected) in test_cases {
            assert_eq!(format!("{}", error), expected);
        }
    }
}
