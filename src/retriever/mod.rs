//! Archive Storage Abstraction
//!
//! Information Hiding:
//! - Transport details (HTTP, disk, memory) hidden behind the Retriever trait
//! - Retrievers move opaque blobs only; they never see transcript encoding
//! - Each implementation encapsulates its own addressing and error reporting

use anyhow::Result;
use async_trait::async_trait;

pub mod filesystem;
pub mod http;
pub mod memory;

pub use filesystem::FileSystemRetriever;
pub use http::HttpRetriever;
pub use memory::InMemoryRetriever;

/// Per-store options understood by the archive service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreOptions {
    /// Store under the premium retention tier
    pub premium: bool,
}

impl StoreOptions {
    pub fn premium() -> Self {
        Self { premium: true }
    }
}

/// Trait defining the blob transport used by the archive client
/// Implementations can use different backends (remote service, file, memory)
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Fetch the stored blob for a ticket
    /// Returns `None` when the archive has no blob for this key
    async fn get_ticket(&self, guild_id: u64, ticket_id: i32) -> Result<Option<Vec<u8>>>;

    /// Store a blob for a ticket, replacing any previous one
    async fn store_ticket(
        &self,
        guild_id: u64,
        ticket_id: i32,
        data: Vec<u8>,
        options: StoreOptions,
    ) -> Result<()>;
}
