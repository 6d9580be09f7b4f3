//! Root tree bookkeeping
//!
//! Every tree seeded from the sentinel is registered here and stays here
//! until the last cursor into it is dropped. The [`crate::Cursor`] side owns
//! the guard that calls [`RootRegistry::release`]; this module only keeps
//! the set consistent under concurrent register/release.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};
use uuid::Uuid;

use crate::arena::DomArena;

/// Tree storage shared between the registry and the cursors of one tree
pub type SharedArena = Arc<Mutex<DomArena>>;

/// Identity of a registered root tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RootId(Uuid);

impl RootId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RootId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Process-wide set of live root trees
///
/// Backed by a sharded concurrent map, so independent trees can be created
/// and torn down from any number of threads.
#[derive(Debug, Default)]
pub struct RootRegistry {
    roots: DashMap<RootId, SharedArena>,
}

impl RootRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry every tree seeded through the sentinel lands in
    pub fn global() -> &'static RootRegistry {
        static GLOBAL: OnceLock<RootRegistry> = OnceLock::new();
        GLOBAL.get_or_init(RootRegistry::new)
    }

    /// Track `arena` as a new root, returns its identity
    pub fn register(&self, arena: SharedArena) -> RootId {
        let id = RootId::new();
        if self.roots.insert(id, arena).is_some() {
            panic!("root {id} registered twice");
        }
        tracing::debug!(root = %id, live = self.roots.len(), "registered root");
        id
    }

    /// Stop tracking `id`. The registry's share of the storage is dropped
    /// here; the storage itself goes with the caller's last share.
    ///
    /// # Panics
    ///
    /// If `id` is not registered. Every register is paired with exactly one
    /// release, so this is a broken invariant, not a recoverable error.
    pub fn release(&self, id: RootId) {
        if self.roots.remove(&id).is_none() {
            panic!("root {id} released without a matching register");
        }
        tracing::debug!(root = %id, live = self.roots.len(), "released root");
    }

    pub fn contains(&self, id: RootId) -> bool {
        self.roots.contains_key(&id)
    }

    /// Number of live roots
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Snapshot of the live root IDs, in no particular order
    pub fn ids(&self) -> Vec<RootId> {
        self.roots.iter().map(|entry| *entry.key()).collect()
    }
}
