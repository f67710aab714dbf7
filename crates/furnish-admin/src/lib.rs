//! Furnish Admin: CRUD pages for furniture-store master data
//!
//! A [`TokenGate`] decides whether a page may render, a [`CrudPage`] drives
//! the list/add/edit/delete interaction for one resource, and
//! [`ConfirmDelete`] sits between a delete request and the delete call. The
//! `furnish-admin` binary drives the same controller from a terminal.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc
)]

pub mod cli;
pub mod dialog;
pub mod gate;
pub mod page;
pub mod state;
pub mod table;

pub use dialog::{ConfirmDelete, Prompt};
pub use gate::{GateDecision, TokenGate};
pub use page::{CrudPage, Modal, PageError, PageNotice, PageResult};
pub use state::AppState;
pub use table::render_table;
