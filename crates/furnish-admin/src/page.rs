//! Generic CRUD page controller
//!
//! One [`CrudPage`] drives the list/add/edit/delete interaction for any
//! resource. The page owns the collection, the form draft and the delete
//! dialog; all network access goes through its [`ResourceClient`].
//!
//! At most one modal (add editor, edit editor, delete dialog) is open at a
//! time. Mutating operations take `&mut self`, so two of them cannot overlap
//! on one page.

use crate::dialog::{ConfirmDelete, Prompt};
use crate::gate::{GateDecision, TokenGate};
use furnish_client::{ClientError, Operation, ResourceClient};
use furnish_core::{Draft, Error, FieldOption, FieldOptions, Record, RecordId, ResourceSchema};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors returned by page operations
#[derive(Error, Debug)]
pub enum PageError {
    /// State, schema or validation error
    #[error(transparent)]
    Core(#[from] Error),

    /// Backend call failed
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Writing output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PageError {
    /// Whether the same call may succeed if tried again
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Client(err) => err.is_retryable(),
            Self::Core(_) | Self::Io(_) => false,
        }
    }
}

/// Result type for page operations
pub type PageResult<T> = Result<T, PageError>;

/// Inline error shown on the page after a failed operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageNotice {
    /// Operation that failed
    pub operation: Operation,
    /// User-facing description
    pub message: String,
    /// Whether offering a retry makes sense
    pub retryable: bool,
}

impl PageNotice {
    fn from_error(operation: Operation, err: &PageError) -> Self {
        Self {
            operation,
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

impl fmt::Display for PageNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if self.retryable {
            write!(f, " (retry possible)")?;
        }
        Ok(())
    }
}

/// The modal currently occupying a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    /// Editor in add mode
    Add,
    /// Editor in edit mode for a record
    Edit(RecordId),
    /// Delete confirmation for a record
    Delete(RecordId),
}

impl fmt::Display for Modal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "add editor"),
            Self::Edit(id) => write!(f, "edit editor for {id}"),
            Self::Delete(id) => write!(f, "delete confirmation for {id}"),
        }
    }
}

/// List/add/edit/delete controller for one resource
#[derive(Debug)]
pub struct CrudPage<C> {
    schema: &'static ResourceSchema,
    client: C,
    collection: Vec<Record>,
    draft: Draft,
    editing_id: Option<RecordId>,
    editor_open: bool,
    dialog: ConfirmDelete,
    loading: bool,
    notice: Option<PageNotice>,
    option_clients: Vec<C>,
    options: FieldOptions,
}

impl<C: ResourceClient> CrudPage<C> {
    /// Page for `schema` backed by `client`; nothing is loaded yet
    pub fn new(schema: &'static ResourceSchema, client: C) -> Self {
        Self {
            schema,
            client,
            collection: Vec::new(),
            draft: schema.default_draft(),
            editing_id: None,
            editor_open: false,
            dialog: ConfirmDelete::for_resource(schema.singular),
            loading: false,
            notice: None,
            option_clients: Vec::new(),
            options: FieldOptions::new(),
        }
    }

    /// Register the client for a resource that fills this page's select boxes
    pub fn with_option_client(mut self, client: C) -> Self {
        self.option_clients.push(client);
        self
    }

    /// Run the gate, then load if allowed
    ///
    /// A redirect is returned untouched and nothing is loaded.
    pub async fn activate(&mut self, gate: &TokenGate) -> GateDecision {
        let decision = gate.check();
        if decision.is_allowed() {
            self.load().await;
        } else {
            debug!(resource = self.schema.path, "Activation blocked by gate");
        }
        decision
    }

    /// Fetch the collection and the select-box options
    ///
    /// A failure empties the collection and leaves a retryable notice. An
    /// option list that fails to load is left empty and unchecked.
    pub async fn load(&mut self) {
        self.loading = true;
        let result = self.client.list().await;
        self.load_options().await;
        self.loading = false;

        match result {
            Ok(records) => {
                debug!(resource = self.schema.path, count = records.len(), "Loaded");
                self.collection = records;
                self.clear_notice_for(&[Operation::List]);
                self.refresh_own_options();
            }
            Err(err) => {
                warn!(resource = self.schema.path, error = %err, "Load failed");
                self.collection.clear();
                self.notice = Some(PageNotice::from_error(Operation::List, &PageError::from(err)));
                let schema = self.schema;
                for (field, source) in schema.option_fields() {
                    if source.path == schema.path {
                        self.options.remove(field.name);
                    }
                }
            }
        }
    }

    async fn load_options(&mut self) {
        let schema = self.schema;
        for (field, source) in schema.option_fields() {
            if source.path == schema.path {
                continue;
            }
            let Some(client) = self
                .option_clients
                .iter()
                .find(|client| client.resource() == source.path)
            else {
                debug!(resource = schema.path, field = field.name, "No option client");
                continue;
            };

            match client.list().await {
                Ok(records) => {
                    let options = records
                        .iter()
                        .map(|record| FieldOption::from_record(record, source.label))
                        .collect();
                    self.options.set(field.name, options);
                }
                Err(err) => {
                    warn!(
                        resource = schema.path,
                        field = field.name,
                        error = %err,
                        "Options unavailable"
                    );
                    self.options.remove(field.name);
                }
            }
        }
    }

    /// Open the editor with a fresh draft
    pub fn open_add(&mut self) -> PageResult<()> {
        self.ensure_idle()?;
        self.draft = self.schema.default_draft();
        self.editing_id = None;
        self.editor_open = true;
        Ok(())
    }

    /// Open the editor on a copy of record `id`
    pub fn open_edit(&mut self, id: RecordId) -> PageResult<()> {
        self.ensure_idle()?;
        let draft = self
            .find(id)
            .map(|record| self.schema.draft_from(record))
            .ok_or_else(|| self.not_found(id))?;
        self.draft = draft;
        self.editing_id = Some(id);
        self.editor_open = true;
        Ok(())
    }

    /// Set one draft field from raw form input
    ///
    /// Ids for a field with loaded options must name one of them.
    pub fn change_field(&mut self, name: &str, raw: &str) -> PageResult<()> {
        self.ensure_editor()?;
        let field = self.schema.field(name)?;
        let value = field.coerce(raw)?;
        self.options.check(field, &value)?;
        self.draft.insert(name, value)?;
        Ok(())
    }

    /// Set one draft field to an already-typed value
    pub fn set_field(&mut self, name: &str, value: Value) -> PageResult<()> {
        self.ensure_editor()?;
        let field = self.schema.field(name)?;
        field.check(&value)?;
        self.options.check(field, &value)?;
        self.draft.insert(name, value)?;
        Ok(())
    }

    /// Create or update from the draft
    ///
    /// On success the editor closes and the collection is updated. On
    /// failure the editor stays open with the draft intact; calling
    /// `submit` again retries.
    pub async fn submit(&mut self) -> PageResult<Record> {
        self.ensure_editor()?;
        let operation = if self.editing_id.is_some() {
            Operation::Update
        } else {
            Operation::Create
        };

        match self.send_draft().await {
            Ok(record) => {
                match self.editing_id {
                    Some(id) => {
                        if let Some(slot) = self.collection.iter_mut().find(|r| r.id == id) {
                            *slot = record.clone();
                        }
                    }
                    None => self.collection.push(record.clone()),
                }
                info!(resource = self.schema.path, %operation, id = %record.id, "Saved");
                self.refresh_own_options();
                self.close_editor();
                self.clear_notice_for(&[Operation::Create, Operation::Update]);
                Ok(record)
            }
            Err(err) => {
                warn!(resource = self.schema.path, %operation, error = %err, "Save failed");
                self.notice = Some(PageNotice::from_error(operation, &err));
                Err(err)
            }
        }
    }

    /// Open the delete confirmation for record `id`
    pub fn request_delete(&mut self, id: RecordId) -> PageResult<()> {
        self.ensure_idle()?;
        if self.find(id).is_none() {
            return Err(self.not_found(id));
        }
        self.dialog.request(id);
        Ok(())
    }

    /// Delete the pending record
    ///
    /// On failure the dialog stays open and the collection is unchanged.
    pub async fn confirm_delete(&mut self) -> PageResult<RecordId> {
        if !self.dialog.is_open() {
            return Err(Error::invalid_state("no delete is pending").into());
        }

        match self.dialog.confirm(&self.client, &mut self.collection).await {
            Ok(Some(id)) => {
                self.clear_notice_for(&[Operation::Delete]);
                self.refresh_own_options();
                Ok(id)
            }
            Ok(None) => Err(Error::invalid_state("no delete is pending").into()),
            Err(err) => {
                let err = PageError::from(err);
                warn!(resource = self.schema.path, error = %err, "Delete failed");
                self.notice = Some(PageNotice::from_error(Operation::Delete, &err));
                Err(err)
            }
        }
    }

    /// Close the editor and discard the draft
    pub fn cancel(&mut self) {
        self.close_editor();
        self.clear_notice_for(&[Operation::Create, Operation::Update]);
    }

    /// Close the delete confirmation without deleting
    pub fn cancel_delete(&mut self) {
        self.dialog.cancel();
        self.clear_notice_for(&[Operation::Delete]);
    }

    /// Repeat the operation named by the current notice
    ///
    /// Returns `Ok(false)` when there is nothing to retry.
    pub async fn retry(&mut self) -> PageResult<bool> {
        let Some(operation) = self
            .notice
            .as_ref()
            .filter(|notice| notice.retryable)
            .map(|notice| notice.operation)
        else {
            return Ok(false);
        };

        match operation {
            Operation::List => self.load().await,
            Operation::Create | Operation::Update => {
                self.submit().await?;
            }
            Operation::Delete => {
                self.confirm_delete().await?;
            }
        }
        Ok(true)
    }

    /// Resource this page manages
    pub const fn schema(&self) -> &'static ResourceSchema {
        self.schema
    }

    /// Client the page talks through
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Loaded records, in server order
    pub fn collection(&self) -> &[Record] {
        &self.collection
    }

    /// Current form draft
    pub const fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Record being edited, `None` in add mode
    pub const fn editing_id(&self) -> Option<RecordId> {
        self.editing_id
    }

    /// Whether the add/edit editor is open
    pub const fn is_editor_open(&self) -> bool {
        self.editor_open
    }

    /// Record awaiting delete confirmation
    pub const fn pending_delete(&self) -> Option<RecordId> {
        self.dialog.pending()
    }

    /// Delete confirmation contents, when open
    pub fn delete_prompt(&self) -> Option<Prompt> {
        self.dialog.prompt()
    }

    /// Loaded select-box options
    pub const fn options(&self) -> &FieldOptions {
        &self.options
    }

    /// Last inline error
    pub const fn notice(&self) -> Option<&PageNotice> {
        self.notice.as_ref()
    }

    /// Whether a load is in flight
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Record with identifier `id`
    pub fn find(&self, id: RecordId) -> Option<&Record> {
        self.collection.iter().find(|record| record.id == id)
    }

    /// Modal currently open, if any
    pub const fn open_modal(&self) -> Option<Modal> {
        if self.editor_open {
            return Some(match self.editing_id {
                Some(id) => Modal::Edit(id),
                None => Modal::Add,
            });
        }
        match self.dialog.pending() {
            Some(id) => Some(Modal::Delete(id)),
            None => None,
        }
    }

    async fn send_draft(&self) -> PageResult<Record> {
        self.schema.validate(&self.draft)?;
        let record = match self.editing_id {
            Some(id) => self.client.update(id, &self.draft).await?,
            None => self.client.create(&self.draft).await?,
        };
        Ok(record)
    }

    fn refresh_own_options(&mut self) {
        let schema = self.schema;
        for (field, source) in schema.option_fields() {
            if source.path == schema.path {
                let options = self
                    .collection
                    .iter()
                    .map(|record| FieldOption::from_record(record, source.label))
                    .collect();
                self.options.set(field.name, options);
            }
        }
    }

    fn ensure_idle(&self) -> PageResult<()> {
        match self.open_modal() {
            Some(modal) => Err(Error::ModalBusy {
                open: modal.to_string(),
            }
            .into()),
            None => Ok(()),
        }
    }

    fn ensure_editor(&self) -> PageResult<()> {
        if self.editor_open {
            Ok(())
        } else {
            Err(Error::invalid_state("no editor is open").into())
        }
    }

    fn close_editor(&mut self) {
        self.editor_open = false;
        self.editing_id = None;
        self.draft = self.schema.default_draft();
    }

    fn clear_notice_for(&mut self, operations: &[Operation]) {
        if self
            .notice
            .as_ref()
            .is_some_and(|notice| operations.contains(&notice.operation))
        {
            self.notice = None;
        }
    }

    fn not_found(&self, id: RecordId) -> PageError {
        Error::NotFound {
            resource: format!("{} {id}", self.schema.singular),
        }
        .into()
    }
}
