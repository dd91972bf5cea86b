//! Remote quote source contract and HTTP implementation.
//!
//! # Responsibility
//! - Fetch one page of remote items and map them to `Server` quotes.
//! - Push the full local collection as a single document.
//!
//! # Invariants
//! - Implementations report failures as `RemoteError`; the sync engine owns
//!   the fallback policy.

use crate::config::SyncConfig;
use crate::model::quote::Quote;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category assigned to every fetched quote.
pub const SERVER_CATEGORY: &str = "Server";
/// Push title used when the pushed list is empty.
pub const EMPTY_PUSH_TITLE: &str = "Quote sync";

pub type RemoteResult<T> = Result<T, RemoteError>;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to encode push body: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Acknowledgment returned by a push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushAck {
    /// Identifier assigned by the remote, when it returned one.
    pub remote_id: Option<u64>,
    /// `true` when the push failed and this ack was synthesized locally.
    pub simulated: bool,
    pub message: String,
}

impl PushAck {
    pub fn simulated() -> Self {
        Self {
            remote_id: None,
            simulated: true,
            message: "Quotes posted (simulated)".to_string(),
        }
    }
}

/// Document written to the push endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushDocument {
    pub title: String,
    /// JSON-encoded quote list.
    pub body: String,
    #[serde(rename = "userId")]
    pub user_id: u64,
}

impl PushDocument {
    pub fn new(quotes: &[Quote], user_id: u64) -> RemoteResult<Self> {
        let title = quotes
            .first()
            .map(|quote| quote.text.clone())
            .unwrap_or_else(|| EMPTY_PUSH_TITLE.to_string());
        Ok(Self {
            title,
            body: serde_json::to_string(quotes)?,
            user_id,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RemotePost {
    title: String,
}

#[derive(Debug, Deserialize)]
struct PushResponse {
    id: Option<u64>,
}

/// Remote side of synchronization.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    async fn fetch_quotes(&self) -> RemoteResult<Vec<Quote>>;
    async fn push_quotes(&self, quotes: &[Quote]) -> RemoteResult<PushAck>;
}

/// `RemoteSource` over a JSON posts API.
pub struct HttpRemoteSource {
    client: reqwest::Client,
    base_url: String,
    fetch_limit: u32,
    owner_id: u64,
}

impl HttpRemoteSource {
    pub fn new(config: &SyncConfig) -> RemoteResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            fetch_limit: config.fetch_limit,
            owner_id: config.owner_id,
        })
    }

    fn posts_url(&self) -> String {
        format!("{}/posts", self.base_url)
    }
}

#[async_trait]
impl RemoteSource for HttpRemoteSource {
    async fn fetch_quotes(&self) -> RemoteResult<Vec<Quote>> {
        let posts: Vec<RemotePost> = self
            .client
            .get(self.posts_url())
            .query(&[("_limit", self.fetch_limit)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(posts
            .into_iter()
            .map(|post| Quote::unchecked(post.title, SERVER_CATEGORY))
            .collect())
    }

    async fn push_quotes(&self, quotes: &[Quote]) -> RemoteResult<PushAck> {
        let document = PushDocument::new(quotes, self.owner_id)?;
        let response: PushResponse = self
            .client
            .post(self.posts_url())
            .json(&document)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(PushAck {
            remote_id: response.id,
            simulated: false,
            message: format!("Pushed {} quote(s)", quotes.len()),
        })
    }
}
