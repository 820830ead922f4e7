//! Transcript schema - the canonical archived conversation and its versioned wire forms
//!
//! Information Hiding:
//! - Each schema generation lives in its own module behind a detector/decoder pair
//! - Callers only ever see the current `Transcript` shape
//! - Older generations are upgraded on read, never written

pub mod detect;
pub mod resolver;
pub mod v1;
pub mod v2;

use crate::core::message::{Message, Snowflake};
use crate::error::{ArchiveError, ArchiveResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub use detect::{detect_version, SchemaVersion, VersionTag};
pub use resolver::{MapResolver, NoopResolver, Resolver, Resolvers};

/// Schema generation written by this client
pub const CURRENT_VERSION: SchemaVersion = SchemaVersion::V2;

/// Resolved user summary stored in the reference table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserEntity {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelEntity {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleEntity {
    pub name: String,
    #[serde(default)]
    pub colour: u32,
}

/// Reference tables for IDs the producer chose to resolve.
/// Unresolved IDs are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entities {
    #[serde(default)]
    pub users: BTreeMap<Snowflake, UserEntity>,
    #[serde(default)]
    pub channels: BTreeMap<Snowflake, ChannelEntity>,
    #[serde(default)]
    pub roles: BTreeMap<Snowflake, RoleEntity>,
}

impl Entities {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.channels.is_empty() && self.roles.is_empty()
    }
}

/// An archived conversation: messages in chronological order plus
/// whatever reference data was resolved when it was stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    pub entities: Entities,
    pub messages: Vec<Message>,
}

/// One schema generation: how to recognise it and how to bring it up to
/// the current shape.
struct SchemaAdapter {
    version: SchemaVersion,
    matches: fn(&Value) -> bool,
    upgrade: fn(Value) -> Result<Transcript, serde_json::Error>,
}

/// Ordered oldest first; the first matching entry wins.
static SCHEMAS: &[SchemaAdapter] = &[
    SchemaAdapter {
        version: SchemaVersion::V1,
        matches: v1::matches,
        upgrade: v1::upgrade,
    },
    SchemaAdapter {
        version: SchemaVersion::V2,
        matches: v2::matches,
        upgrade: v2::upgrade,
    },
];

fn adapter_for(value: &Value) -> Option<&'static SchemaAdapter> {
    SCHEMAS.iter().find(|schema| (schema.matches)(value))
}

/// Decode a decrypted, decompressed buffer of any supported generation
/// into the current transcript shape.
pub fn decode(buffer: &[u8]) -> ArchiveResult<Transcript> {
    let value: Value = serde_json::from_slice(buffer).map_err(ArchiveError::SchemaParse)?;

    let Some(schema) = adapter_for(&value) else {
        return Err(ArchiveError::UnsupportedVersion {
            marker: detect::describe(&value),
        });
    };

    tracing::debug!("[Transcript] Decoding schema {:?}", schema.version);
    (schema.upgrade)(value).map_err(ArchiveError::SchemaParse)
}
