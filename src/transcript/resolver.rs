//! Reference resolvers used when building a transcript for storage
//!
//! Information Hiding:
//! - Lookup source (cache, directory, fixture map) hidden behind one capability
//! - A no-op resolver is a normal choice and yields empty reference tables

use super::{ChannelEntity, RoleEntity, UserEntity};
use crate::core::message::Snowflake;
use std::collections::HashMap;

/// Resolve an opaque ID to an enriched value, if one is known
pub trait Resolver<T>: Send + Sync {
    fn resolve(&self, id: Snowflake) -> Option<T>;
}

impl<T, F> Resolver<T> for F
where
    F: Fn(Snowflake) -> Option<T> + Send + Sync,
{
    fn resolve(&self, id: Snowflake) -> Option<T> {
        self(id)
    }
}

/// Resolves nothing; skips reference capture entirely
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopResolver;

impl<T> Resolver<T> for NoopResolver {
    fn resolve(&self, _id: Snowflake) -> Option<T> {
        None
    }
}

/// Resolver backed by a prepared lookup table
#[derive(Debug, Clone)]
pub struct MapResolver<T> {
    entries: HashMap<Snowflake, T>,
}

impl<T> MapResolver<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn with(mut self, id: impl Into<Snowflake>, value: T) -> Self {
        self.entries.insert(id.into(), value);
        self
    }
}

impl<T> Default for MapResolver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<(Snowflake, T)> for MapResolver<T> {
    fn from_iter<I: IntoIterator<Item = (Snowflake, T)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<T: Clone + Send + Sync> Resolver<T> for MapResolver<T> {
    fn resolve(&self, id: Snowflake) -> Option<T> {
        self.entries.get(&id).cloned()
    }
}

/// The three reference resolvers supplied at store time
#[derive(Clone, Copy)]
pub struct Resolvers<'a> {
    pub users: &'a dyn Resolver<UserEntity>,
    pub channels: &'a dyn Resolver<ChannelEntity>,
    pub roles: &'a dyn Resolver<RoleEntity>,
}

impl Resolvers<'static> {
    pub fn none() -> Self {
        Self {
            users: &NoopResolver,
            channels: &NoopResolver,
            roles: &NoopResolver,
        }
    }
}

impl Default for Resolvers<'static> {
    fn default() -> Self {
        Self::none()
    }
}

impl<'a> Resolvers<'a> {
    pub fn new(
        users: &'a dyn Resolver<UserEntity>,
        channels: &'a dyn Resolver<ChannelEntity>,
        roles: &'a dyn Resolver<RoleEntity>,
    ) -> Self {
        Self {
            users,
            channels,
            roles,
        }
    }
}
