//! HTTP implementation of [`ResourceClient`]

use crate::client::ResourceClient;
use crate::error::{ClientError, ClientResult, Operation};
use async_trait::async_trait;
use furnish_core::config::ApiConfig;
use furnish_core::{Credential, Draft, Record, RecordId, SessionContext};
use reqwest::header::{AUTHORIZATION, CACHE_CONTROL, PRAGMA};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Build the shared HTTP client from API configuration
///
/// # Errors
///
/// Returns [`ClientError::Builder`] if the TLS backend cannot be initialised.
pub fn build_http_client(api: &ApiConfig) -> ClientResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(api.timeout_secs))
        .connect_timeout(Duration::from_secs(api.timeout_secs.min(10)))
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .map_err(ClientError::Builder)
}

/// REST client for one resource at `<base>/<resource>`
#[derive(Debug, Clone)]
pub struct HttpResourceClient {
    client: Client,
    collection_url: String,
    resource: String,
    session: SessionContext,
}

impl HttpResourceClient {
    /// Create a client for `resource` under `base_url`
    ///
    /// The session is consulted on every call, never cached.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if `base_url` is not an absolute http(s) URL.
    pub fn new(
        client: Client,
        base_url: &str,
        resource: impl Into<String>,
        session: SessionContext,
    ) -> ClientResult<Self> {
        let parsed = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;

        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl {
                url: base_url.to_string(),
                message: "expected an http(s) base URL".to_string(),
            });
        }

        let resource = resource.into();
        let collection_url = format!("{}/{}", base_url.trim_end_matches('/'), resource);

        Ok(Self {
            client,
            collection_url,
            resource,
            session,
        })
    }

    /// Create a client with its own HTTP client built from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the base URL is invalid.
    pub fn from_config(
        api: &ApiConfig,
        resource: impl Into<String>,
        session: SessionContext,
    ) -> ClientResult<Self> {
        Self::new(build_http_client(api)?, &api.base_url, resource, session)
    }

    /// `<base>/<resource>`
    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    /// `<base>/<resource>/<id>`
    pub fn item_url(&self, id: RecordId) -> String {
        format!("{}/{id}", self.collection_url)
    }

    fn credential(&self) -> ClientResult<Credential> {
        self.session
            .credential()
            .ok_or_else(|| ClientError::MissingCredential {
                resource: self.resource.clone(),
            })
    }

    async fn send(&self, operation: Operation, request: RequestBuilder) -> ClientResult<Response> {
        let credential = self.credential()?;
        let request = request.header(AUTHORIZATION, credential.bearer());

        let response = request
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                resource: self.resource.clone(),
                operation,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                resource = %self.resource,
                %operation,
                status = status.as_u16(),
                "Backend rejected request"
            );
            return Err(ClientError::fetch(&self.resource, operation, status.as_u16()));
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        operation: Operation,
        response: Response,
    ) -> ClientResult<T> {
        let body = response
            .bytes()
            .await
            .map_err(|source| ClientError::Transport {
                resource: self.resource.clone(),
                operation,
                source,
            })?;

        serde_json::from_slice(&body)
            .map_err(|e| ClientError::decode(&self.resource, operation, e))
    }
}

#[async_trait]
impl ResourceClient for HttpResourceClient {
    fn resource(&self) -> &str {
        &self.resource
    }

    async fn list(&self) -> ClientResult<Vec<Record>> {
        debug!(url = %self.collection_url, "GET");
        let request = self
            .client
            .get(&self.collection_url)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache");

        let response = self.send(Operation::List, request).await?;
        let records: Vec<Record> = self.decode(Operation::List, response).await?;

        debug!(resource = %self.resource, count = records.len(), "Listed records");
        Ok(records)
    }

    async fn create(&self, draft: &Draft) -> ClientResult<Record> {
        debug!(url = %self.collection_url, "POST");
        let request = self.client.post(&self.collection_url).json(draft);

        let response = self.send(Operation::Create, request).await?;
        let record: Record = self.decode(Operation::Create, response).await?;

        info!(resource = %self.resource, id = %record.id, "Created record");
        Ok(record)
    }

    async fn update(&self, id: RecordId, draft: &Draft) -> ClientResult<Record> {
        let url = self.item_url(id);
        debug!(url = %url, "PUT");
        let request = self.client.put(&url).json(draft);

        let response = self.send(Operation::Update, request).await?;
        let record: Record = self.decode(Operation::Update, response).await?;

        info!(resource = %self.resource, %id, "Updated record");
        Ok(record)
    }

    async fn delete(&self, id: RecordId) -> ClientResult<()> {
        let url = self.item_url(id);
        debug!(url = %url, "DELETE");
        let request = self.client.delete(&url);

        self.send(Operation::Delete, request).await?;

        info!(resource = %self.resource, %id, "Deleted record");
        Ok(())
    }
}
