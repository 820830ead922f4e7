//! Archive client facade
//!
//! Write path: Transcript -> serialize (v2) -> encrypt -> compress -> Retriever
//! Read path:  Retriever -> decompress -> decrypt -> detect version -> upgrade -> Transcript
//!
//! The client holds only its cipher and its retriever. Every call owns its
//! buffers and transcript, so calls may run concurrently without coordination.
//! Dropping a returned future cancels the in-flight retriever call.

use crate::config::Settings;
use crate::core::codec::{self, Cipher, DEFAULT_COMPRESSION_LEVEL};
use crate::core::message::Message;
use crate::error::{ArchiveError, ArchiveResult};
use crate::retriever::{HttpRetriever, Retriever, StoreOptions};
use crate::transcript::{self, v2, Resolvers, Transcript};
use std::sync::Arc;

#[derive(Clone)]
pub struct ArchiverClient {
    retriever: Arc<dyn Retriever>,
    cipher: Cipher,
    compression_level: i32,
}

impl ArchiverClient {
    pub fn new(retriever: Arc<dyn Retriever>, encryption_key: &[u8]) -> ArchiveResult<Self> {
        let cipher = Cipher::new(encryption_key).map_err(ArchiveError::InvalidKey)?;
        Ok(Self {
            retriever,
            cipher,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        })
    }

    /// Client talking to the remote archive service described by `settings`
    pub fn from_settings(settings: &Settings, encryption_key: &[u8]) -> anyhow::Result<Self> {
        let retriever = HttpRetriever::from_config(&settings.archiver)?;
        Ok(Self::new(Arc::new(retriever), encryption_key)?
            .with_compression_level(settings.encryption.compression_level))
    }

    pub fn with_compression_level(mut self, level: i32) -> Self {
        self.compression_level = level;
        self
    }

    /// Fetch and decode the transcript for a ticket
    pub async fn retrieve(&self, guild_id: u64, ticket_id: i32) -> ArchiveResult<Transcript> {
        let blob = self
            .retriever
            .get_ticket(guild_id, ticket_id)
            .await
            .map_err(ArchiveError::Transport)?
            .ok_or(ArchiveError::NotFound {
                guild_id,
                ticket_id,
            })?;

        tracing::debug!(
            "[ArchiverClient] Decoding {} byte blob for guild {} ticket {}",
            blob.len(),
            guild_id,
            ticket_id
        );
        let transcript = self.decode_blob(&blob)?;

        tracing::info!(
            "[ArchiverClient] Retrieved {} messages for guild {} ticket {}",
            transcript.messages.len(),
            guild_id,
            ticket_id
        );
        Ok(transcript)
    }

    /// Build a transcript from `messages`, enrich it with `resolvers` and store it
    pub async fn store(
        &self,
        guild_id: u64,
        ticket_id: i32,
        messages: Vec<Message>,
        resolvers: &Resolvers<'_>,
    ) -> ArchiveResult<()> {
        self.store_with_options(guild_id, ticket_id, messages, resolvers, StoreOptions::default())
            .await
    }

    pub async fn store_with_options(
        &self,
        guild_id: u64,
        ticket_id: i32,
        messages: Vec<Message>,
        resolvers: &Resolvers<'_>,
        options: StoreOptions,
    ) -> ArchiveResult<()> {
        let transcript = Transcript::new(messages, resolvers);
        let serialized = v2::serialize_v2(&transcript)?;
        let blob = self.seal(&serialized)?;

        self.put(guild_id, ticket_id, blob, options).await?;
        tracing::info!(
            "[ArchiverClient] Stored {} messages for guild {} ticket {}",
            transcript.messages.len(),
            guild_id,
            ticket_id
        );
        Ok(())
    }

    /// Store a transcript that is already serialized in the current schema,
    /// skipping message-level construction.
    pub async fn import_encoded_transcript(
        &self,
        guild_id: u64,
        ticket_id: i32,
        encoded: &[u8],
    ) -> ArchiveResult<()> {
        self.import_encoded_transcript_with_options(
            guild_id,
            ticket_id,
            encoded,
            StoreOptions::default(),
        )
        .await
    }

    pub async fn import_encoded_transcript_with_options(
        &self,
        guild_id: u64,
        ticket_id: i32,
        encoded: &[u8],
        options: StoreOptions,
    ) -> ArchiveResult<()> {
        let blob = self.seal(encoded)?;
        self.put(guild_id, ticket_id, blob, options).await?;
        tracing::info!(
            "[ArchiverClient] Imported {} byte transcript for guild {} ticket {}",
            encoded.len(),
            guild_id,
            ticket_id
        );
        Ok(())
    }

    /// Encrypt then compress a serialized transcript into a storable blob
    pub fn seal(&self, serialized: &[u8]) -> ArchiveResult<Vec<u8>> {
        let encrypted = self.cipher.encrypt(serialized).map_err(ArchiveError::Encode)?;
        let blob =
            codec::compress(&encrypted, self.compression_level).map_err(ArchiveError::Encode)?;
        tracing::debug!(
            "[ArchiverClient] Sealed {} bytes into {} byte blob",
            serialized.len(),
            blob.len()
        );
        Ok(blob)
    }

    /// Reverse of [`seal`](Self::seal), followed by version detection and upgrade
    pub fn decode_blob(&self, blob: &[u8]) -> ArchiveResult<Transcript> {
        let decompressed = codec::decompress(blob).map_err(ArchiveError::Decode)?;
        let decrypted = self.cipher.decrypt(&decompressed).map_err(ArchiveError::Decode)?;
        transcript::decode(&decrypted)
    }

    async fn put(
        &self,
        guild_id: u64,
        ticket_id: i32,
        blob: Vec<u8>,
        options: StoreOptions,
    ) -> ArchiveResult<()> {
        self.retriever
            .store_ticket(guild_id, ticket_id, blob, options)
            .await
            .map_err(ArchiveError::Transport)
    }
}
