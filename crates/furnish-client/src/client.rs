//! The resource client trait

use crate::error::ClientResult;
use async_trait::async_trait;
use furnish_core::{Draft, Record, RecordId};

/// List/create/update/delete against one resource's REST endpoint
///
/// One instance serves exactly one resource type. Implementations return
/// every failure as an error; callers decide how to surface it.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// Resource path segment this client addresses
    fn resource(&self) -> &str;

    /// Fetch the full collection, bypassing any HTTP cache
    async fn list(&self) -> ClientResult<Vec<Record>>;

    /// Create a record; the response carries the new identifier
    async fn create(&self, draft: &Draft) -> ClientResult<Record>;

    /// Replace the fields of record `id`
    async fn update(&self, id: RecordId, draft: &Draft) -> ClientResult<Record>;

    /// Remove record `id`
    async fn delete(&self, id: RecordId) -> ClientResult<()>;
}
