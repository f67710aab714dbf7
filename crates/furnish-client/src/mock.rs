//! In-memory resource client for testing

use crate::client::ResourceClient;
use crate::error::{ClientError, ClientResult, Operation};
use async_trait::async_trait;
use furnish_core::{Draft, Record, RecordId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::time::{Duration, sleep};

/// A call received by [`MockResourceClient`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    /// `list()`
    List,
    /// `create(draft)`
    Create(Draft),
    /// `update(id, draft)`
    Update(RecordId, Draft),
    /// `delete(id)`
    Delete(RecordId),
}

#[derive(Debug, Default)]
struct MockState {
    records: Vec<Record>,
    next_id: i64,
    calls: Vec<Call>,
    failures: HashMap<Operation, u16>,
}

/// Mock resource client backed by a vector of records
///
/// Clones share state, so a test can keep a handle while the page owns another.
#[derive(Debug, Clone)]
pub struct MockResourceClient {
    resource: String,
    delay_ms: u64,
    state: Arc<Mutex<MockState>>,
}

impl MockResourceClient {
    /// Create an empty mock for `resource`
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            delay_ms: 0,
            state: Arc::new(Mutex::new(MockState {
                next_id: 1,
                ..MockState::default()
            })),
        }
    }

    /// Seed the backing collection; new ids continue after the highest seeded id
    pub fn with_records(self, records: Vec<Record>) -> Self {
        {
            let mut state = self.state.lock();
            state.next_id = records.iter().map(|r| r.id.get()).max().unwrap_or(0) + 1;
            state.records = records;
        }
        self
    }

    /// Answer every `operation` with `status`
    pub fn with_failure(self, operation: Operation, status: u16) -> Self {
        self.fail(operation, status);
        self
    }

    /// Simulate network latency
    pub const fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Start failing `operation` with `status`
    pub fn fail(&self, operation: Operation, status: u16) {
        self.state.lock().failures.insert(operation, status);
    }

    /// Let `operation` succeed again
    pub fn recover(&self, operation: Operation) {
        self.state.lock().failures.remove(&operation);
    }

    /// Current backing collection
    pub fn records(&self) -> Vec<Record> {
        self.state.lock().records.clone()
    }

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    /// Number of calls received for `operation`
    pub fn call_count(&self, operation: Operation) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| call.operation() == operation)
            .count()
    }

    async fn begin(&self, call: Call) -> ClientResult<()> {
        if self.delay_ms > 0 {
            sleep(Duration::from_millis(self.delay_ms)).await;
        }

        let operation = call.operation();
        let mut state = self.state.lock();
        state.calls.push(call);

        match state.failures.get(&operation) {
            Some(&status) => Err(ClientError::fetch(&self.resource, operation, status)),
            None => Ok(()),
        }
    }
}

impl Call {
    /// Operation this call belongs to
    pub const fn operation(&self) -> Operation {
        match self {
            Self::List => Operation::List,
            Self::Create(_) => Operation::Create,
            Self::Update(..) => Operation::Update,
            Self::Delete(_) => Operation::Delete,
        }
    }
}

#[async_trait]
impl ResourceClient for MockResourceClient {
    fn resource(&self) -> &str {
        &self.resource
    }

    async fn list(&self) -> ClientResult<Vec<Record>> {
        self.begin(Call::List).await?;
        Ok(self.records())
    }

    async fn create(&self, draft: &Draft) -> ClientResult<Record> {
        self.begin(Call::Create(draft.clone())).await?;

        let mut state = self.state.lock();
        let record = Record::new(state.next_id, draft.as_map().clone());
        state.next_id += 1;
        state.records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: RecordId, draft: &Draft) -> ClientResult<Record> {
        self.begin(Call::Update(id, draft.clone())).await?;

        let mut state = self.state.lock();
        let record = state
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ClientError::fetch(&self.resource, Operation::Update, 404))?;

        for (field, value) in draft.iter() {
            record.fields.insert(field.clone(), value.clone());
        }
        Ok(record.clone())
    }

    async fn delete(&self, id: RecordId) -> ClientResult<()> {
        self.begin(Call::Delete(id)).await?;

        let mut state = self.state.lock();
        let before = state.records.len();
        state.records.retain(|r| r.id != id);

        if state.records.len() == before {
            return Err(ClientError::fetch(&self.resource, Operation::Delete, 404));
        }
        Ok(())
    }
}
