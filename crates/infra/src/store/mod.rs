//! Keyed entity storage abstractions.

pub mod in_memory;
pub mod sequence;
pub mod slot;

use std::sync::Arc;

use thiserror::Error;

use simplerest_core::{Entity, SequenceId};

pub use in_memory::InMemoryEntityStore;
pub use sequence::IdSequence;
pub use slot::InMemorySlot;

/// Store error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("entity not found: {0}")]
    NotFound(String),
    #[error("key mismatch: addressed '{addressed}', entity carries '{carried}'")]
    KeyMismatch { addressed: String, carried: String },
    #[error("id sequence exhausted")]
    SequenceExhausted,
    #[error("store lock poisoned")]
    Poisoned,
}

/// What a replace did to the addressed key.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Replaced {
    /// The key was absent and is now present.
    Created,
    /// The key was present and its value was overwritten.
    Updated,
}

/// Keyed entity store.
///
/// Every mutation is linearizable per key: a concurrent reader observes either
/// the value before or after the mutation, never an absent key in between.
pub trait EntityStore<V: Entity>: Send + Sync {
    fn get(&self, key: &V::Key) -> Result<V, StoreError>;

    /// All entities, in no particular order. Empty when the store is empty.
    fn list_all(&self) -> Result<Vec<V>, StoreError>;

    /// Insert `entity` under `key`, or overwrite the current value in one step.
    fn replace(&self, key: &V::Key, entity: V) -> Result<Replaced, StoreError>;

    /// Overwrite the value under `key`; fails with `NotFound` if absent.
    fn update_existing(&self, key: &V::Key, entity: V) -> Result<(), StoreError>;

    /// Remove `key` entirely and return the removed value.
    fn delete(&self, key: &V::Key) -> Result<V, StoreError>;

    /// Remove every entity and return how many there were.
    fn clear(&self) -> Result<usize, StoreError>;
}

/// Store for generated-id entities: allocates ids from a monotonic sequence.
pub trait SequencedStore<V: Entity<Key = SequenceId>>: EntityStore<V> {
    /// Allocate the next id, build the entity with it and insert it.
    ///
    /// Concurrent callers always receive distinct ids.
    fn allocate_and_insert<F>(&self, build: F) -> Result<V, StoreError>
    where
        F: FnOnce(SequenceId) -> V;

    /// Highest id allocated so far (`0` before the first allocation).
    fn high_water_mark(&self) -> SequenceId;
}

impl<V, S> EntityStore<V> for Arc<S>
where
    V: Entity,
    S: EntityStore<V> + ?Sized,
{
    fn get(&self, key: &V::Key) -> Result<V, StoreError> {
        (**self).get(key)
    }

    fn list_all(&self) -> Result<Vec<V>, StoreError> {
        (**self).list_all()
    }

    fn replace(&self, key: &V::Key, entity: V) -> Result<Replaced, StoreError> {
        (**self).replace(key, entity)
    }

    fn update_existing(&self, key: &V::Key, entity: V) -> Result<(), StoreError> {
        (**self).update_existing(key, entity)
    }

    fn delete(&self, key: &V::Key) -> Result<V, StoreError> {
        (**self).delete(key)
    }

    fn clear(&self) -> Result<usize, StoreError> {
        (**self).clear()
    }
}

impl<V, S> SequencedStore<V> for Arc<S>
where
    V: Entity<Key = SequenceId>,
    S: SequencedStore<V>,
{
    fn allocate_and_insert<F>(&self, build: F) -> Result<V, StoreError>
    where
        F: FnOnce(SequenceId) -> V,
    {
        (**self).allocate_and_insert(build)
    }

    fn high_water_mark(&self) -> SequenceId {
        (**self).high_water_mark()
    }
}
