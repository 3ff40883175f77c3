//! REST client for the hosted BaaS metadata store.
//!
//! Wraps the store's collection endpoints using [`reqwest`]:
//!
//! ```text
//! GET   {base}/collections/movies/records?ids=a,b     movie snapshots
//! PATCH {base}/collections/movies/records/{id}        single-field update
//! GET   {base}/collections/{collection}/records       master-data list
//! POST  {base}/collections/{collection}/records       create master-data value
//! GET   {base}/collections/templates/records          template groups
//! ```
//!
//! Reads go through [`with_retry`]; writes are attempted once.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use cinedex_core::assignment::FieldPatch;
use cinedex_core::selector::FieldSelector;
use cinedex_core::store::{
    MasterDataItem, MasterDataSource, StoreError, TargetSource, TargetWriter, TemplateRegistry,
    WriteError,
};
use cinedex_core::target::Target;
use cinedex_core::template::TemplateGroup;
use cinedex_core::types::TargetId;

use crate::retry::{with_retry, RetryPolicy};

const MOVIES_COLLECTION: &str = "movies";
const TEMPLATES_COLLECTION: &str = "templates";

/// Errors from the BaaS REST layer.
#[derive(Debug, thiserror::Error)]
pub enum BaasError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The store returned a non-2xx status code.
    #[error("BaaS API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl BaasError {
    /// Transport failures and 5xx/429 responses are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(e) => !e.is_decode() && !e.is_builder(),
            Self::ApiError { status, .. } => *status >= 500 || *status == 429,
        }
    }
}

impl From<BaasError> for StoreError {
    fn from(err: BaasError) -> Self {
        match err {
            BaasError::Request(e) if e.is_decode() => StoreError::Decode(e.to_string()),
            BaasError::Request(e) => StoreError::Transport(e.to_string()),
            BaasError::ApiError { status, body } => StoreError::Rejected { status, body },
        }
    }
}

/// Map a read failure, turning a 404 on `collection` into
/// [`StoreError::NotFound`].
fn read_error(err: BaasError, collection: &str) -> StoreError {
    match err {
        BaasError::ApiError { status: 404, .. } => StoreError::NotFound {
            entity: "Collection",
            id: collection.to_string(),
        },
        other => other.into(),
    }
}

/// `{ "data": T }` envelope returned by every collection endpoint.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// HTTP client for a single BaaS project.
pub struct BaasClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    retry: RetryPolicy,
}

impl BaasClient {
    /// Create a new client.
    ///
    /// * `base_url` - Base HTTP URL without trailing slash, e.g. `https://baas.example/api`.
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        retry: RetryPolicy,
    ) -> Result<Self, BaasError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            base_url,
            api_key,
            retry,
        })
    }

    fn records_url(&self, collection: &str) -> String {
        format!("{}/collections/{collection}/records", self.base_url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// GET a collection URL with retry and decode its `data` field.
    async fn get_data<T: DeserializeOwned>(
        &self,
        operation: &str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, BaasError> {
        with_retry(&self.retry, operation, BaasError::is_retryable, |timeout| {
            let request = self.authorize(self.client.get(url).query(query).timeout(timeout));
            async move {
                let response = Self::ensure_success(request.send().await?).await?;
                Ok::<_, BaasError>(response.json::<Envelope<T>>().await?.data)
            }
        })
        .await
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`BaasError::ApiError`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, BaasError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(BaasError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl TargetSource for BaasClient {
    async fn get_targets_by_ids(&self, ids: &[TargetId]) -> Result<Vec<Target>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let joined = ids.iter().map(TargetId::as_str).collect::<Vec<_>>().join(",");
        let url = self.records_url(MOVIES_COLLECTION);
        let targets: Vec<Target> = self
            .get_data("get_targets_by_ids", &url, &[("ids", joined)])
            .await
            .map_err(|e| read_error(e, MOVIES_COLLECTION))?;
        tracing::debug!(requested = ids.len(), found = targets.len(), "Fetched targets");
        Ok(targets)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let request = self.authorize(
            self.client
                .get(self.records_url(TEMPLATES_COLLECTION))
                .timeout(self.retry.initial_timeout),
        );
        let result: Result<(), BaasError> = async {
            Self::ensure_success(request.send().await?).await?;
            Ok::<_, BaasError>(())
        }
        .await;
        Ok(result?)
    }
}

#[async_trait]
impl TargetWriter for BaasClient {
    async fn update_target_field(
        &self,
        target_id: &TargetId,
        patch: &FieldPatch,
    ) -> Result<(), WriteError> {
        let url = format!("{}/{}", self.records_url(MOVIES_COLLECTION), target_id);
        let request = self.authorize(
            self.client
                .patch(url)
                .json(&patch.to_json())
                .timeout(self.retry.initial_timeout),
        );
        let result: Result<(), BaasError> = async {
            Self::ensure_success(request.send().await?).await?;
            Ok::<_, BaasError>(())
        }
        .await;
        result.map_err(|e| WriteError::from(StoreError::from(e)))
    }
}

#[async_trait]
impl MasterDataSource for BaasClient {
    async fn list_values(
        &self,
        selector: FieldSelector,
    ) -> Result<Vec<MasterDataItem>, StoreError> {
        let collection = selector.collection();
        let url = self.records_url(collection);
        self.get_data("list_values", &url, &[])
            .await
            .map_err(|e| read_error(e, collection))
    }

    async fn create_value(
        &self,
        selector: FieldSelector,
        name: &str,
    ) -> Result<MasterDataItem, StoreError> {
        let request = self.authorize(
            self.client
                .post(self.records_url(selector.collection()))
                .json(&serde_json::json!({ "name": name }))
                .timeout(self.retry.initial_timeout),
        );
        let result: Result<MasterDataItem, BaasError> = async {
            let response = Self::ensure_success(request.send().await?).await?;
            Ok::<_, BaasError>(response.json::<Envelope<MasterDataItem>>().await?.data)
        }
        .await;
        let item = result?;
        tracing::info!(
            selector = selector.as_str(),
            id = %item.id,
            name = %item.name,
            "Master-data value created"
        );
        Ok(item)
    }
}

#[async_trait]
impl TemplateRegistry for BaasClient {
    async fn fetch_template_groups(&self) -> Result<Vec<TemplateGroup>, StoreError> {
        let url = self.records_url(TEMPLATES_COLLECTION);
        self.get_data("fetch_template_groups", &url, &[])
            .await
            .map_err(|e| read_error(e, TEMPLATES_COLLECTION))
    }
}
