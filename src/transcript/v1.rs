//! Legacy transcript format: a bare JSON array of messages.
//!
//! V1 never captured reference data, so migrated transcripts always carry
//! empty entity tables.

use super::{Entities, Transcript};
use crate::core::message::Message;
use crate::error::{ArchiveError, ArchiveResult};
use serde_json::Value;

pub(super) fn matches(value: &Value) -> bool {
    value.is_array()
}

pub(super) fn upgrade(value: Value) -> Result<Transcript, serde_json::Error> {
    let messages: Vec<Message> = serde_json::from_value(value)?;
    Ok(migrate_v1_to_v2(messages))
}

pub fn parse_v1(buffer: &[u8]) -> ArchiveResult<Vec<Message>> {
    serde_json::from_slice(buffer).map_err(ArchiveError::SchemaParse)
}

/// Lift legacy messages into the current schema. Message content is kept
/// as-is; reference tables are left empty.
pub fn migrate_v1_to_v2(messages: Vec<Message>) -> Transcript {
    tracing::debug!("[Transcript] Migrating {} v1 messages", messages.len());
    Transcript {
        entities: Entities::default(),
        messages,
    }
}
