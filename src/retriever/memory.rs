//! In-Memory Blob Retriever
//!
//! Information Hiding:
//! - HashMap storage structure hidden from users
//! - Thread-safe access via RwLock hidden behind async interface
//! - Suitable for testing and ephemeral archives

use super::{Retriever, StoreOptions};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

type TicketKey = (u64, i32);

/// In-memory retriever using HashMap
/// Data is lost when process terminates
#[derive(Clone, Default)]
pub struct InMemoryRetriever {
    blobs: Arc<RwLock<HashMap<TicketKey, Vec<u8>>>>,
}

impl InMemoryRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a raw blob directly, bypassing any encoding
    pub async fn insert_raw(&self, guild_id: u64, ticket_id: i32, data: Vec<u8>) {
        self.blobs.write().await.insert((guild_id, ticket_id), data);
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl Retriever for InMemoryRetriever {
    async fn get_ticket(&self, guild_id: u64, ticket_id: i32) -> Result<Option<Vec<u8>>> {
        let blobs = self.blobs.read().await;
        let blob = blobs.get(&(guild_id, ticket_id)).cloned();
        tracing::debug!(
            "[InMemoryRetriever] Fetched guild {} ticket {}: {}",
            guild_id,
            ticket_id,
            blob.as_ref()
                .map_or_else(|| "absent".to_string(), |b| format!("{} bytes", b.len()))
        );
        Ok(blob)
    }

    async fn store_ticket(
        &self,
        guild_id: u64,
        ticket_id: i32,
        data: Vec<u8>,
        _options: StoreOptions,
    ) -> Result<()> {
        tracing::debug!(
            "[InMemoryRetriever] Stored {} bytes for guild {} ticket {}",
            data.len(),
            guild_id,
            ticket_id
        );
        self.blobs.write().await.insert((guild_id, ticket_id), data);
        Ok(())
    }
}
