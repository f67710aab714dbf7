//! Core types and utilities for Furnish Admin
//!
//! Configuration, the shared error type, the record/draft data model, the
//! catalog of master-data resource schemas and the session context that
//! owns the bearer credential.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod schema;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use schema::{
    FieldDefault, FieldKind, FieldOption, FieldOptions, FieldSpec, OptionSource, ResourceSchema,
};
pub use session::{
    Credential, CredentialStore, FileCredentialStore, MemoryCredentialStore, SessionContext,
};
pub use types::{Draft, Identifiable, Record, RecordId};

/// Initialize the logging system
///
/// `RUST_LOG` overrides the configured level.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(logging: &config::LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    let installed = if logging.format == "json" {
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    installed.map_err(|e| Error::Other(format!("Failed to initialize logging: {e}")))
}
