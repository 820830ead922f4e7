//! Current transcript format.
//!
//! Wire shape: `{"version": 2, "entities": {"users", "channels", "roles"}, "messages": [...]}`

use super::{Entities, Resolvers, SchemaVersion, Transcript};
use crate::core::message::{Message, Snowflake};
use crate::error::{ArchiveError, ArchiveResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

static USER_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<@!?(\d+)>").expect("valid user mention pattern"));
static CHANNEL_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<#(\d+)>").expect("valid channel mention pattern"));
static ROLE_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<@&(\d+)>").expect("valid role mention pattern"));

#[derive(Serialize)]
struct TranscriptWireRef<'a> {
    version: u32,
    entities: &'a Entities,
    messages: &'a [Message],
}

#[derive(Deserialize)]
struct TranscriptWire {
    version: u32,
    #[serde(default)]
    entities: Entities,
    messages: Vec<Message>,
}

pub(super) fn matches(value: &Value) -> bool {
    value.get("version").and_then(Value::as_u64) == Some(u64::from(SchemaVersion::V2.number()))
}

pub(super) fn upgrade(value: Value) -> Result<Transcript, serde_json::Error> {
    let wire: TranscriptWire = serde_json::from_value(value)?;
    Ok(Transcript {
        entities: wire.entities,
        messages: wire.messages,
    })
}

pub fn parse_v2(buffer: &[u8]) -> ArchiveResult<Transcript> {
    let value: Value = serde_json::from_slice(buffer).map_err(ArchiveError::SchemaParse)?;
    if !matches(&value) {
        return Err(ArchiveError::UnsupportedVersion {
            marker: super::detect::describe(&value),
        });
    }
    upgrade(value).map_err(ArchiveError::SchemaParse)
}

pub fn serialize_v2(transcript: &Transcript) -> ArchiveResult<Vec<u8>> {
    serde_json::to_vec(&TranscriptWireRef {
        version: SchemaVersion::V2.number(),
        entities: &transcript.entities,
        messages: &transcript.messages,
    })
    .map_err(ArchiveError::Serialize)
}

/// IDs referenced anywhere in a message list, grouped by kind
#[derive(Debug, Default, PartialEq)]
pub struct References {
    pub users: BTreeSet<Snowflake>,
    pub channels: BTreeSet<Snowflake>,
    pub roles: BTreeSet<Snowflake>,
}

fn scan(pattern: &Regex, content: &str, into: &mut BTreeSet<Snowflake>) {
    for caps in pattern.captures_iter(content) {
        // Digit runs too long for u64 are not real IDs
        if let Ok(id) = caps[1].parse() {
            into.insert(id);
        }
    }
}

impl References {
    pub fn collect(messages: &[Message]) -> Self {
        let mut refs = Self::default();
        for message in messages {
            refs.users.insert(message.author.id);
            refs.channels.insert(message.channel_id);
            refs.users.extend(message.mentions.iter().map(|user| user.id));
            refs.roles.extend(message.mention_roles.iter().copied());

            scan(&USER_MENTION, &message.content, &mut refs.users);
            scan(&CHANNEL_MENTION, &message.content, &mut refs.channels);
            scan(&ROLE_MENTION, &message.content, &mut refs.roles);
        }
        refs
    }
}

impl Entities {
    /// Resolve every referenced ID once, keeping only successful lookups
    pub fn resolve(refs: &References, resolvers: &Resolvers<'_>) -> Self {
        Self {
            users: refs
                .users
                .iter()
                .filter_map(|&id| resolvers.users.resolve(id).map(|user| (id, user)))
                .collect(),
            channels: refs
                .channels
                .iter()
                .filter_map(|&id| resolvers.channels.resolve(id).map(|channel| (id, channel)))
                .collect(),
            roles: refs
                .roles
                .iter()
                .filter_map(|&id| resolvers.roles.resolve(id).map(|role| (id, role)))
                .collect(),
        }
    }
}

impl Transcript {
    /// Build a transcript from raw messages, populating reference tables
    /// from whatever the resolvers can supply.
    pub fn new(messages: Vec<Message>, resolvers: &Resolvers<'_>) -> Self {
        let refs = References::collect(&messages);
        let entities = Entities::resolve(&refs, resolvers);
        tracing::debug!(
            "[Transcript] Built transcript: {} messages, {}/{} users, {}/{} channels, {}/{} roles resolved",
            messages.len(),
            entities.users.len(),
            refs.users.len(),
            entities.channels.len(),
            refs.channels.len(),
            entities.roles.len(),
            refs.roles.len()
        );
        Self { entities, messages }
    }
}
