//! Notification of completed swaps to the external order/fulfilment system.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_config::{ConfigError, FromEnv, env_optional, env_parse};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::models::{Item, ItemKind, ItemKindTag};

/// Transfer notice sent once per successful swap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "K: ItemKind")]
pub struct PostingOrder<K: ItemKind> {
    pub order_id: Uuid,
    pub kind: ItemKindTag,
    /// Snapshot after the swap: new owner, status `SWAPPED`
    pub item: Item<K>,
    pub requested_at: DateTime<Utc>,
}

impl<K: ItemKind> PostingOrder<K> {
    pub fn new(item: Item<K>) -> Self {
        Self {
            order_id: Uuid::now_v7(),
            kind: K::KIND,
            item,
            requested_at: Utc::now(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PostingError {
    #[error("Posting request failed: {0}")]
    Request(String),

    #[error("Posting service rejected the order with status {status}")]
    Rejected { status: u16 },
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostingService<K: ItemKind>: Send + Sync {
    async fn new_order(&self, order: PostingOrder<K>) -> Result<(), PostingError>;
}

/// Records the order in the log and always succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingPostingService;

#[async_trait]
impl<K: ItemKind> PostingService<K> for LoggingPostingService {
    async fn new_order(&self, order: PostingOrder<K>) -> Result<(), PostingError> {
        info!(
            order_id = %order.order_id,
            kind = %order.kind,
            item_id = %order.item.id,
            owner_id = ?order.item.owner_id,
            "Posting order recorded"
        );
        Ok(())
    }
}

/// POSTs each order as JSON to `{base_url}/orders`.
#[derive(Debug, Clone)]
pub struct HttpPostingService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpPostingService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, PostingError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PostingError::Request(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/orders", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl<K: ItemKind> PostingService<K> for HttpPostingService {
    #[instrument(skip(self, order), fields(order_id = %order.order_id, endpoint = %self.endpoint))]
    async fn new_order(&self, order: PostingOrder<K>) -> Result<(), PostingError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&order)
            .send()
            .await
            .map_err(|e| PostingError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PostingError::Rejected {
                status: status.as_u16(),
            });
        }

        info!(item_id = %order.item.id, "Posting order accepted");
        Ok(())
    }
}

/// Posting backend chosen at startup from [`PostingConfig`].
#[derive(Debug, Clone)]
pub enum PostingBackend {
    Logging(LoggingPostingService),
    Http(HttpPostingService),
}

impl PostingBackend {
    pub fn from_config(config: &PostingConfig) -> Result<Self, PostingError> {
        match &config.service_url {
            Some(url) => Ok(Self::Http(HttpPostingService::new(url, config.timeout())?)),
            None => Ok(Self::Logging(LoggingPostingService)),
        }
    }
}

#[async_trait]
impl<K: ItemKind> PostingService<K> for PostingBackend {
    async fn new_order(&self, order: PostingOrder<K>) -> Result<(), PostingError> {
        match self {
            PostingBackend::Logging(service) => service.new_order(order).await,
            PostingBackend::Http(service) => service.new_order(order).await,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingConfig {
    /// Base URL of the order service; `None` logs orders instead
    pub service_url: Option<String>,
    pub timeout_secs: u64,
}

impl PostingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for PostingConfig {
    fn default() -> Self {
        Self {
            service_url: None,
            timeout_secs: 5,
        }
    }
}

impl FromEnv for PostingConfig {
    /// - POSTING_SERVICE_URL: optional
    /// - POSTING_TIMEOUT_SECS: defaults to 5
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            service_url: env_optional("POSTING_SERVICE_URL"),
            timeout_secs: env_parse("POSTING_TIMEOUT_SECS", "5")?,
        })
    }
}
