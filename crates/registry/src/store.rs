//! Concurrent in-memory entity store.
//!
//! [`EntityStore`] is the single source of truth for registry state. It is
//! created once at application startup and shared behind an `Arc`; every
//! handler and background task goes through it.
//!
//! Locking is two-level: an outer [`RwLock`] guards the id -> record map
//! (creates and deletes take the write lock), and each record carries its
//! own [`Mutex`] so mutations of one entity serialize without blocking
//! reads or writes of any other. [`EntityStore::update_with`] runs its
//! closure inside that per-record lock, which is what makes read-modify-
//! write sequences on a single entity atomic.

use std::sync::Arc;

use indexmap::IndexMap;
use tokio::sync::{Mutex, RwLock};

use nethub_core::entity::{clamp_percentages, Attributes, Entity, EntityKind};
use nethub_core::types::EntityId;

use crate::history::{BoundedHistory, HistoryEntry};

/// Default number of history entries retained per entity.
pub const DEFAULT_HISTORY_CAP: usize = 1000;

struct EntityRecord {
    entity: Entity,
    history: BoundedHistory,
}

/// Shared, insertion-ordered map of every entity in the registry.
pub struct EntityStore {
    history_cap: usize,
    entities: RwLock<IndexMap<EntityId, Arc<Mutex<EntityRecord>>>>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::with_history_cap(DEFAULT_HISTORY_CAP)
    }

    /// Build a store whose per-entity history keeps at most `cap` entries.
    pub fn with_history_cap(cap: usize) -> Self {
        Self {
            history_cap: cap,
            entities: RwLock::new(IndexMap::new()),
        }
    }

    /// Create an entity from a creation payload and insert it.
    ///
    /// Kind defaults are seeded and percentage fields clamped by
    /// [`Entity::new`]; the payload is assumed to be validated already.
    /// Creation itself cannot fail.
    pub async fn create(&self, kind: EntityKind, attributes: Attributes) -> Entity {
        let entity = Entity::new(kind, attributes);
        let record = EntityRecord {
            entity: entity.clone(),
            history: BoundedHistory::new(self.history_cap),
        };
        self.entities
            .write()
            .await
            .insert(entity.id.clone(), Arc::new(Mutex::new(record)));
        entity
    }

    /// Fetch a point-in-time copy of an entity.
    pub async fn get(&self, id: &str) -> Option<Entity> {
        let entities = self.entities.read().await;
        let record = entities.get(id)?;
        let record = record.lock().await;
        Some(record.entity.clone())
    }

    /// Merge `patch` into the entity's attributes key by key.
    ///
    /// Returns the updated entity, or `None` if the id is unknown.
    pub async fn update(&self, id: &str, patch: Attributes) -> Option<Entity> {
        self.update_with(id, move |attrs| {
            for (key, value) in patch {
                attrs.insert(key, value);
            }
        })
        .await
    }

    /// Atomically mutate an entity's attributes through a closure.
    ///
    /// The closure runs under the entity's own lock, so concurrent calls
    /// for the same id serialize and none of them observes a stale map.
    /// After the closure returns, percentage fields are re-clamped,
    /// `updated_at` is refreshed, and a history snapshot is recorded.
    ///
    /// Returns the updated entity, or `None` if the id is unknown.
    pub async fn update_with<F>(&self, id: &str, mutate: F) -> Option<Entity>
    where
        F: FnOnce(&mut Attributes),
    {
        let entities = self.entities.read().await;
        let record = entities.get(id)?;
        let mut record = record.lock().await;
        let record = &mut *record;

        mutate(&mut record.entity.attributes);
        clamp_percentages(&mut record.entity.attributes);
        record.entity.updated_at = chrono::Utc::now();
        record.history.push(HistoryEntry {
            entity_id: record.entity.id.clone(),
            timestamp: record.entity.updated_at,
            snapshot: record.entity.attributes.clone(),
        });
        Some(record.entity.clone())
    }

    /// List entities in creation order, optionally restricted to one kind.
    pub async fn list(&self, kind: Option<EntityKind>) -> Vec<Entity> {
        let entities = self.entities.read().await;
        let mut out = Vec::new();
        for record in entities.values() {
            let record = record.lock().await;
            if kind.is_none_or(|k| record.entity.kind == k) {
                out.push(record.entity.clone());
            }
        }
        out
    }

    /// Remove an entity and its history. Returns whether it existed.
    pub async fn delete(&self, id: &str) -> bool {
        self.entities.write().await.shift_remove(id).is_some()
    }

    /// The entity's recorded mutations, oldest first.
    ///
    /// Empty right after creation; `None` if the id is unknown.
    pub async fn history(&self, id: &str) -> Option<Vec<HistoryEntry>> {
        let entities = self.entities.read().await;
        let record = entities.get(id)?;
        let record = record.lock().await;
        Some(record.history.to_vec())
    }

    /// Number of entities currently in the registry, all kinds.
    pub async fn count(&self) -> usize {
        self.entities.read().await.len()
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}
