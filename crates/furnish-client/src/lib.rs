//! REST resource client for Furnish Admin
//!
//! One [`ResourceClient`] per resource type. [`HttpResourceClient`] talks to
//! the backend at `<base>/<resource>` with the session's bearer credential;
//! [`MockResourceClient`] keeps records in memory for tests.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::significant_drop_tightening
)]

pub mod client;
pub mod error;
pub mod http;
pub mod mock;

pub use client::ResourceClient;
pub use error::{ClientError, ClientResult, Operation};
pub use http::{HttpResourceClient, build_http_client};
pub use mock::{Call, MockResourceClient};
