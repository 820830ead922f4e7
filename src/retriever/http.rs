//! Archive Service HTTP Retriever
//!
//! Information Hiding:
//! - Endpoint layout and query encoding hidden
//! - Status code interpretation (404 = absent) internalized
//! - Service error bodies translated into transport errors

use super::{Retriever, StoreOptions};
use crate::config::ArchiverConfig;
use crate::core::message::Message;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct ServiceError {
    message: String,
}

/// Client for the remote archive service
#[derive(Clone)]
pub struct HttpRetriever {
    client: Client,
    endpoint: String,
}

impl HttpRetriever {
    pub fn new(endpoint: &str, timeout: Duration, connect_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ArchiverConfig) -> Result<Self> {
        Self::new(
            &config.endpoint,
            Duration::from_millis(config.timeout_ms),
            Duration::from_millis(config.connect_timeout_ms),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn ticket_url(&self, guild_id: u64, ticket_id: i32) -> String {
        format!("{}/?guild={}&id={}", self.endpoint, guild_id, ticket_id)
    }

    /// Turn a non-success response into an error carrying the service's message
    async fn service_error(response: Response) -> anyhow::Error {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ServiceError>(&body)
            .map(|e| e.message)
            .unwrap_or(body);

        tracing::warn!(
            "[HttpRetriever] Archive service returned {}: {}",
            status,
            message
        );
        anyhow::anyhow!("archive service error {}: {}", status, message)
    }

    /// Render messages to a viewable document via the service's encoder.
    /// The messages are sent unencrypted; nothing is stored.
    pub async fn render(&self, messages: &[Message], title: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .post(format!("{}/encode", self.endpoint))
            .query(&[("title", title)])
            .json(messages)
            .send()
            .await
            .context("Render request failed")?;

        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }

        let body = response
            .bytes()
            .await
            .context("Failed to read rendered transcript")?;
        tracing::debug!(
            "[HttpRetriever] Rendered {} messages into {} bytes",
            messages.len(),
            body.len()
        );
        Ok(body.to_vec())
    }
}

#[async_trait]
impl Retriever for HttpRetriever {
    async fn get_ticket(&self, guild_id: u64, ticket_id: i32) -> Result<Option<Vec<u8>>> {
        let response = self
            .client
            .get(self.ticket_url(guild_id, ticket_id))
            .send()
            .await
            .context("Archive request failed")?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                tracing::debug!(
                    "[HttpRetriever] No archive for guild {} ticket {}",
                    guild_id,
                    ticket_id
                );
                Ok(None)
            }
            status if status.is_success() => {
                let body = response
                    .bytes()
                    .await
                    .context("Failed to read archive body")?;
                tracing::debug!(
                    "[HttpRetriever] Fetched {} bytes for guild {} ticket {}",
                    body.len(),
                    guild_id,
                    ticket_id
                );
                Ok(Some(body.to_vec()))
            }
            _ => Err(Self::service_error(response).await),
        }
    }

    async fn store_ticket(
        &self,
        guild_id: u64,
        ticket_id: i32,
        data: Vec<u8>,
        options: StoreOptions,
    ) -> Result<()> {
        let mut url = self.ticket_url(guild_id, ticket_id);
        if options.premium {
            url.push_str("&premium");
        }

        let size = data.len();
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .body(data)
            .send()
            .await
            .context("Archive upload failed")?;

        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }

        tracing::debug!(
            "[HttpRetriever] Uploaded {} bytes for guild {} ticket {}",
            size,
            guild_id,
            ticket_id
        );
        Ok(())
    }
}
