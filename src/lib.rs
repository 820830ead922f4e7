//! Archivist - client for encrypted, versioned ticket transcript archives
//!
//! This library turns chat transcripts into sealed blobs for a remote
//! archive service and back again, upgrading legacy archives on read.

mod config;
pub mod core;
pub mod error;
pub mod retriever;
pub mod transcript;
pub mod utils;

pub mod api;
pub mod cli;

pub use api::ArchiverClient;
pub use crate::config::{ArchiverConfig, EncryptionConfig, LoggingConfig, Settings, ENCRYPTION_KEY_VAR};
pub use error::{ArchiveError, ArchiveResult};

pub use crate::core::message::{Message, Snowflake, User};
pub use crate::retriever::{FileSystemRetriever, HttpRetriever, InMemoryRetriever, Retriever, StoreOptions};
pub use crate::transcript::{
    detect_version, ChannelEntity, Entities, MapResolver, NoopResolver, Resolver, Resolvers,
    RoleEntity, SchemaVersion, Transcript, UserEntity, VersionTag,
};
