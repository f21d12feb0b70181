// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Composite-key index over an event-plane stream.
//!
//! Built once from a single forward scan, read-only afterwards. The map is
//! keyed by [`PackedKey`], so two distinct (run, event) pairs can never
//! land on the same entry.

use crate::error::{KernelError, KernelResult};
use crate::types::key::{EventKey, PackedKey};
use rustc_hash::FxHashMap;

/// What to do when a key is seen a second time during the build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Keep the most recent position and log a warning.
    #[default]
    LastWins,
    /// Abort the build.
    Reject,
}

/// One duplicate seen while building.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyCollision {
    pub key: EventKey,
    pub replaced: u64,
    pub kept: u64,
}

#[derive(Debug)]
pub struct IndexBuilder {
    policy: DuplicatePolicy,
    map: FxHashMap<PackedKey, u64>,
    collisions: Vec<KeyCollision>,
}

impl IndexBuilder {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self::with_capacity(policy, 0)
    }

    pub fn with_capacity(policy: DuplicatePolicy, capacity: usize) -> Self {
        Self {
            policy,
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            collisions: Vec::new(),
        }
    }

    pub fn insert(&mut self, key: EventKey, position: u64) -> KernelResult<()> {
        let Some(previous) = self.map.insert(key.packed(), position) else {
            return Ok(());
        };
        match self.policy {
            DuplicatePolicy::LastWins => {
                tracing::warn!(
                    run = key.run,
                    event = key.event,
                    replaced = previous,
                    kept = position,
                    "duplicate event-plane key"
                );
                self.collisions.push(KeyCollision {
                    key,
                    replaced: previous,
                    kept: position,
                });
                Ok(())
            }
            DuplicatePolicy::Reject => Err(KernelError::DuplicateKey {
                key,
                first: previous,
                second: position,
            }),
        }
    }

    pub fn finish(self) -> EventPlaneIndex {
        tracing::info!(
            entries = self.map.len(),
            collisions = self.collisions.len(),
            "indexed event-plane records"
        );
        EventPlaneIndex {
            map: self.map,
            collisions: self.collisions,
        }
    }
}

#[derive(Debug, Default)]
pub struct EventPlaneIndex {
    map: FxHashMap<PackedKey, u64>,
    collisions: Vec<KeyCollision>,
}

impl EventPlaneIndex {
    /// Indexes keys in stream order; the position of a key is its ordinal.
    pub fn build<I>(keys: I, policy: DuplicatePolicy) -> KernelResult<Self>
    where
        I: IntoIterator<Item = EventKey>,
    {
        let keys = keys.into_iter();
        let mut builder = IndexBuilder::with_capacity(policy, keys.size_hint().0);
        for (position, key) in keys.enumerate() {
            builder.insert(key, position as u64)?;
        }
        Ok(builder.finish())
    }

    pub fn lookup(&self, run: u32, event: u64) -> Option<u64> {
        self.lookup_key(EventKey::new(run, event))
    }

    pub fn lookup_key(&self, key: EventKey) -> Option<u64> {
        self.map.get(&key.packed()).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn collisions(&self) -> &[KeyCollision] {
        &self.collisions
    }
}
