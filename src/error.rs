//! Error taxonomy for archive operations

use crate::core::codec::CodecError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The archive service has no transcript for this ticket (expired or never stored)
    #[error("Transcript not found for guild {guild_id}, ticket {ticket_id}")]
    NotFound { guild_id: u64, ticket_id: i32 },

    /// Retriever call failed for any reason other than absence
    #[error("Transport failure: {0:#}")]
    Transport(anyhow::Error),

    /// Stored blob could not be decompressed or decrypted
    #[error("Failed to decode transcript blob: {0}")]
    Decode(CodecError),

    /// Decoded buffer is well-formed but of an unknown schema generation
    #[error("Unsupported transcript version: {marker}")]
    UnsupportedVersion { marker: String },

    /// Buffer matched a known version but failed structural parsing
    #[error("Malformed transcript: {0}")]
    SchemaParse(serde_json::Error),

    #[error("Failed to encode transcript blob: {0}")]
    Encode(CodecError),

    #[error("Failed to serialize transcript: {0}")]
    Serialize(serde_json::Error),

    #[error("Invalid encryption key: {0}")]
    InvalidKey(CodecError),
}

impl ArchiveError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ArchiveError::NotFound { .. })
    }
}

pub type ArchiveResult<T> = std::result::Result<T, ArchiveError>;
