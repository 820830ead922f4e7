//! File System Blob Retriever
//!
//! Information Hiding:
//! - File layout hidden from users
//! - Directory structure management hidden behind interface
//! - Persistence mechanism independent of retriever trait users

use super::{Retriever, StoreOptions};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;

/// File system retriever - each ticket is one blob file
/// Files are stored as {base_path}/{guild_id}/{ticket_id}.bin
pub struct FileSystemRetriever {
    base_path: PathBuf,
}

impl FileSystemRetriever {
    pub async fn new(base_path: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_path)
            .await
            .context("Failed to create archive directory")?;

        Ok(Self { base_path })
    }

    fn guild_dir(&self, guild_id: u64) -> PathBuf {
        self.base_path.join(guild_id.to_string())
    }

    fn ticket_path(&self, guild_id: u64, ticket_id: i32) -> PathBuf {
        self.guild_dir(guild_id).join(format!("{}.bin", ticket_id))
    }
}

#[async_trait]
impl Retriever for FileSystemRetriever {
    async fn get_ticket(&self, guild_id: u64, ticket_id: i32) -> Result<Option<Vec<u8>>> {
        let path = self.ticket_path(guild_id, ticket_id);

        match fs::read(&path).await {
            Ok(data) => {
                tracing::debug!(
                    "[FileSystemRetriever] Read {} bytes from {:?}",
                    data.len(),
                    path
                );
                Ok(Some(data))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("[FileSystemRetriever] No blob at {:?}", path);
                Ok(None)
            }
            Err(e) => Err(e).context(format!("Failed to read ticket file: {:?}", path)),
        }
    }

    async fn store_ticket(
        &self,
        guild_id: u64,
        ticket_id: i32,
        data: Vec<u8>,
        _options: StoreOptions,
    ) -> Result<()> {
        fs::create_dir_all(self.guild_dir(guild_id))
            .await
            .context("Failed to create guild directory")?;

        let path = self.ticket_path(guild_id, ticket_id);
        fs::write(&path, &data)
            .await
            .context(format!("Failed to write ticket file: {:?}", path))?;

        tracing::debug!(
            "[FileSystemRetriever] Wrote {} bytes to {:?}",
            data.len(),
            path
        );
        Ok(())
    }
}
