//! Delete confirmation dialog

use furnish_client::{ClientResult, ResourceClient};
use furnish_core::{Identifiable, RecordId};
use tracing::info;

/// Title used when none is given
pub const DEFAULT_TITLE: &str = "Confirm Deletion";

/// Message used when none is given
pub const DEFAULT_MESSAGE: &str = "Are you sure you want to delete this item?";

/// What an open dialog shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Heading
    pub title: String,
    /// Question put to the user
    pub message: String,
    /// Item that will be deleted on confirm
    pub target: RecordId,
}

/// Confirmation step between a delete request and the delete call
///
/// Open exactly while a target is pending.
#[derive(Debug, Clone)]
pub struct ConfirmDelete {
    pending: Option<RecordId>,
    title: String,
    message: String,
}

impl Default for ConfirmDelete {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfirmDelete {
    /// Closed dialog with the default wording
    pub fn new() -> Self {
        Self::with_text(DEFAULT_TITLE, DEFAULT_MESSAGE)
    }

    /// Closed dialog with custom wording
    pub fn with_text(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            pending: None,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Closed dialog asking about one item of the given resource, e.g. "this vendor"
    pub fn for_resource(singular: &str) -> Self {
        Self::with_text(
            DEFAULT_TITLE,
            format!(
                "Are you sure you want to delete this {}?",
                singular.to_lowercase()
            ),
        )
    }

    /// Open the dialog for `id`
    pub const fn request(&mut self, id: RecordId) {
        self.pending = Some(id);
    }

    /// Target awaiting confirmation
    pub const fn pending(&self) -> Option<RecordId> {
        self.pending
    }

    /// Whether the dialog is showing
    pub const fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    /// Contents to show, or `None` when closed
    pub fn prompt(&self) -> Option<Prompt> {
        self.pending.map(|target| Prompt {
            title: self.title.clone(),
            message: self.message.clone(),
            target,
        })
    }

    /// Close without contacting the server
    pub const fn cancel(&mut self) {
        self.pending = None;
    }

    /// Delete the pending item, drop it from `items`, then close
    ///
    /// Returns the deleted id, or `None` if the dialog was closed. On failure
    /// the dialog stays open and `items` is untouched.
    pub async fn confirm<C, T>(&mut self, client: &C, items: &mut Vec<T>) -> ClientResult<Option<RecordId>>
    where
        C: ResourceClient + ?Sized,
        T: Identifiable + Send,
    {
        let Some(id) = self.pending else {
            return Ok(None);
        };

        client.delete(id).await?;

        items.retain(|item| item.id() != id);
        self.pending = None;

        info!(resource = client.resource(), %id, "Delete confirmed");
        Ok(Some(id))
    }
}
