//! Remote record source and its HTTP implementation.

use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::models::Record;
use crate::util::{compact_text, is_http_url, normalize_text_option};

/// Endpoint serving the full record set when none is configured.
pub const DEFAULT_ENDPOINT_URL: &str = "https://hiring.fetch.com/hiring.json";

/// Request timeout used when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Invalid remote configuration: {0}")]
    InvalidConfiguration(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Remote returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Invalid record payload: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Stateless fetch of the full record set.
///
/// Implementations must be shareable across tasks: the sync repository runs
/// fetches on spawned tasks.
pub trait RemoteSource: Send + Sync + 'static {
    fn fetch_all(&self) -> impl Future<Output = RemoteResult<Vec<Record>>> + Send;
}

/// Plain HTTP GET against one JSON endpoint. No pagination, no auth.
#[derive(Clone, Debug)]
pub struct HttpRemoteSource {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpRemoteSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> RemoteResult<Self> {
        let endpoint = normalize_endpoint(endpoint.into())?;
        Ok(Self {
            endpoint,
            client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }
}

impl RemoteSource for HttpRemoteSource {
    async fn fetch_all(&self) -> RemoteResult<Vec<Record>> {
        tracing::debug!("Fetching records from {}", self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let body = response.text().await?;
        decode_records(&body)
    }
}

/// Wire shape of one element of the payload array. Unknown keys are ignored.
#[derive(Debug, Deserialize)]
struct ApiListItem {
    id: i64,
    #[serde(rename = "listId")]
    list_id: i64,
    #[serde(default)]
    name: Option<String>,
}

impl From<ApiListItem> for Record {
    fn from(item: ApiListItem) -> Self {
        Self::new(item.id, item.list_id, item.name)
    }
}

/// Decode a JSON array payload into records, preserving wire order.
pub fn decode_records(body: &str) -> RemoteResult<Vec<Record>> {
    let items: Vec<ApiListItem> = serde_json::from_str(body)?;
    Ok(items.into_iter().map(Record::from).collect())
}

fn status_error(status: StatusCode, body: &str) -> RemoteError {
    let body = compact_text(body);
    RemoteError::Status {
        status: status.as_u16(),
        body: if body.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("no response body")
                .to_string()
        } else {
            body
        },
    }
}

fn normalize_endpoint(raw: String) -> RemoteResult<String> {
    let endpoint = normalize_text_option(Some(raw)).ok_or_else(|| {
        RemoteError::InvalidConfiguration("endpoint must not be empty".to_string())
    })?;
    if is_http_url(&endpoint) {
        Ok(endpoint)
    } else {
        Err(RemoteError::InvalidConfiguration(
            "endpoint must include http:// or https://".to_string(),
        ))
    }
}
