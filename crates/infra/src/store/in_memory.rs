use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use simplerest_core::{Entity, SequenceId};

use super::{EntityStore, IdSequence, Replaced, SequencedStore, StoreError};

/// In-memory keyed store.
///
/// One `RwLock` guards the whole map, so every mutation (including an
/// overwrite of an existing key) is a single step under the write lock and
/// reads proceed concurrently with reads. Ids are reserved and committed
/// under the same write lock, so a failed allocation leaves no gap.
///
/// The store is owned by whoever composes the resources: it is constructed
/// explicitly and dropped with its owner.
#[derive(Debug)]
pub struct InMemoryEntityStore<V: Entity> {
    entities: RwLock<HashMap<V::Key, V>>,
    sequence: IdSequence,
}

impl<V: Entity> InMemoryEntityStore<V> {
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(HashMap::new()),
            sequence: IdSequence::new(),
        }
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<V::Key, V>>, StoreError> {
        self.entities.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<V::Key, V>>, StoreError> {
        self.entities.write().map_err(|_| StoreError::Poisoned)
    }
}

impl<V: Entity> Default for InMemoryEntityStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

fn check_key<V: Entity>(addressed: &V::Key, entity: &V) -> Result<(), StoreError> {
    if entity.key() == addressed {
        Ok(())
    } else {
        Err(StoreError::KeyMismatch {
            addressed: addressed.to_string(),
            carried: entity.key().to_string(),
        })
    }
}

impl<V: Entity> EntityStore<V> for InMemoryEntityStore<V> {
    fn get(&self, key: &V::Key) -> Result<V, StoreError> {
        self.read()?
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn list_all(&self) -> Result<Vec<V>, StoreError> {
        Ok(self.read()?.values().cloned().collect())
    }

    fn replace(&self, key: &V::Key, entity: V) -> Result<Replaced, StoreError> {
        check_key(key, &entity)?;
        let mut map = self.write()?;
        match map.insert(key.clone(), entity) {
            Some(_) => Ok(Replaced::Updated),
            None => Ok(Replaced::Created),
        }
    }

    fn update_existing(&self, key: &V::Key, entity: V) -> Result<(), StoreError> {
        check_key(key, &entity)?;
        let mut map = self.write()?;
        let slot = map
            .get_mut(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        *slot = entity;
        Ok(())
    }

    fn delete(&self, key: &V::Key) -> Result<V, StoreError> {
        self.write()?
            .remove(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn clear(&self) -> Result<usize, StoreError> {
        let mut map = self.write()?;
        let removed = map.len();
        map.clear();
        Ok(removed)
    }
}

impl<V: Entity<Key = SequenceId>> SequencedStore<V> for InMemoryEntityStore<V> {
    fn allocate_and_insert<F>(&self, build: F) -> Result<V, StoreError>
    where
        F: FnOnce(SequenceId) -> V,
    {
        let mut map = self.write()?;
        let id = self.sequence.peek()?;
        let entity = build(id);
        check_key(&id, &entity)?;

        self.sequence.commit(id);
        map.insert(id, entity.clone());
        Ok(entity)
    }

    fn high_water_mark(&self) -> SequenceId {
        self.sequence.current()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, Ordering};

    use proptest::prelude::*;
    use simplerest_core::LangCode;
    use simplerest_employees::{Employee, NewEmployee};
    use simplerest_greetings::Greeting;

    use super::*;

    fn greeting(lang: &str, message: &str) -> Greeting {
        Greeting::new(lang.parse::<LangCode>().unwrap(), message)
    }

    fn bob() -> NewEmployee {
        NewEmployee::new("Bob", "Geldof", "Comedy")
    }

    #[test]
    fn get_absent_key_is_not_found() {
        let store = InMemoryEntityStore::<Greeting>::new();
        let key: LangCode = "xx".parse().unwrap();
        assert_eq!(store.get(&key), Err(StoreError::NotFound("xx".to_string())));
    }

    #[test]
    fn replace_reports_created_then_updated() {
        let store = InMemoryEntityStore::<Greeting>::new();
        let de: LangCode = "de".parse().unwrap();

        assert_eq!(
            store.replace(&de, greeting("de", "Guten tag!")).unwrap(),
            Replaced::Created
        );
        assert_eq!(
            store.replace(&de, greeting("de", "Hallo!")).unwrap(),
            Replaced::Updated
        );
        assert_eq!(store.get(&de).unwrap().message, "Hallo!");
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn replace_rejects_entity_carrying_another_key() {
        let store = InMemoryEntityStore::<Greeting>::new();
        let de: LangCode = "de".parse().unwrap();
        let err = store.replace(&de, greeting("fr", "Bonjour")).unwrap_err();
        assert!(matches!(err, StoreError::KeyMismatch { .. }));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn update_existing_requires_presence() {
        let store = InMemoryEntityStore::<Employee>::new();
        let ghost = bob().with_id(SequenceId::new(7));
        assert_eq!(
            store.update_existing(&SequenceId::new(7), ghost),
            Err(StoreError::NotFound("7".to_string()))
        );
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn update_existing_overwrites_in_place() {
        let store = InMemoryEntityStore::<Employee>::new();
        let created = store.allocate_and_insert(|id| bob().with_id(id)).unwrap();

        let mut changed = created.clone();
        changed.department = "Music".to_string();
        store.update_existing(&created.id, changed).unwrap();

        assert_eq!(store.get(&created.id).unwrap().department, "Music");
    }

    #[test]
    fn delete_removes_key_entirely() {
        let store = InMemoryEntityStore::<Employee>::new();
        let created = store.allocate_and_insert(|id| bob().with_id(id)).unwrap();

        assert_eq!(store.delete(&created.id).unwrap(), created);
        assert!(matches!(store.get(&created.id), Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete(&created.id), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn clear_then_list_is_empty_not_an_error() {
        let store = InMemoryEntityStore::<Greeting>::new();
        store.replace(&"en".parse().unwrap(), greeting("en", "Hi")).unwrap();
        assert_eq!(store.clear().unwrap(), 1);
        assert_eq!(store.clear().unwrap(), 0);
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn ids_are_never_reused_after_delete_or_clear() {
        let store = InMemoryEntityStore::<Employee>::new();
        let first = store.allocate_and_insert(|id| bob().with_id(id)).unwrap();
        store.delete(&first.id).unwrap();
        store.clear().unwrap();
        let second = store.allocate_and_insert(|id| bob().with_id(id)).unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn builder_that_changes_the_id_is_rejected() {
        let store = InMemoryEntityStore::<Employee>::new();
        let err = store
            .allocate_and_insert(|_id| bob().with_id(SequenceId::new(1000)))
            .unwrap_err();
        assert!(matches!(err, StoreError::KeyMismatch { .. }));
        assert!(store.is_empty().unwrap());

        // The rejected allocation did not consume its id.
        assert_eq!(store.high_water_mark(), SequenceId::new(0));
        let next = store.allocate_and_insert(|id| bob().with_id(id)).unwrap();
        assert_eq!(next.id, SequenceId::new(1));
    }

    #[test]
    fn concurrent_creations_receive_contiguous_distinct_ids() {
        let store = InMemoryEntityStore::<Employee>::new();
        store.allocate_and_insert(|id| bob().with_id(id)).unwrap();
        let before = store.high_water_mark().value();

        const THREADS: u64 = 8;
        const PER_THREAD: u64 = 50;

        let ids: Vec<SequenceId> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    s.spawn(|| {
                        (0..PER_THREAD)
                            .map(|_| store.allocate_and_insert(|id| bob().with_id(id)).unwrap().id)
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
        });

        let distinct: HashSet<u64> = ids.iter().map(|id| id.value()).collect();
        let expected: HashSet<u64> = (before + 1..=before + THREADS * PER_THREAD).collect();
        assert_eq!(distinct, expected);
        assert_eq!(store.len().unwrap() as u64, 1 + THREADS * PER_THREAD);
    }

    #[test]
    fn replacing_existing_key_is_never_observed_as_absent() {
        let store = InMemoryEntityStore::<Greeting>::new();
        let de: LangCode = "de".parse().unwrap();
        store.replace(&de, greeting("de", "Guten tag!")).unwrap();

        let done = AtomicBool::new(false);
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    while !done.load(Ordering::Acquire) {
                        let current = store.get(&de).expect("key transiently absent");
                        assert!(current.message == "Guten tag!" || current.message == "Hallo!");
                    }
                });
            }

            for i in 0..2_000 {
                let message = if i % 2 == 0 { "Hallo!" } else { "Guten tag!" };
                store.replace(&de, greeting("de", message)).unwrap();
            }
            done.store(true, Ordering::Release);
        });
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: replacing with the same body twice leaves the same state,
        /// and the second call reports Updated.
        #[test]
        fn replace_is_idempotent(
            lang in "[a-z]{2}",
            message in "[ -~]{1,40}",
            others in prop::collection::vec(("[a-z]{3}", "[ -~]{1,10}"), 0..5),
        ) {
            let store = InMemoryEntityStore::<Greeting>::new();
            for (l, m) in &others {
                store.replace(&l.parse().unwrap(), greeting(l, m)).unwrap();
            }

            let key: LangCode = lang.parse().unwrap();
            let body = greeting(&lang, &message);

            prop_assert_eq!(store.replace(&key, body.clone()).unwrap(), Replaced::Created);
            let mut after_first = store.list_all().unwrap();
            after_first.sort_by(|a, b| a.lang.cmp(&b.lang));

            prop_assert_eq!(store.replace(&key, body.clone()).unwrap(), Replaced::Updated);
            let mut after_second = store.list_all().unwrap();
            after_second.sort_by(|a, b| a.lang.cmp(&b.lang));

            prop_assert_eq!(after_first, after_second);
            prop_assert_eq!(store.get(&key).unwrap(), body);
        }

        /// Property: sequential allocations continue from the high-water mark
        /// without gaps.
        #[test]
        fn allocation_is_contiguous_from_high_water_mark(
            seeded in 0usize..10,
            created in 1usize..20,
        ) {
            let store = InMemoryEntityStore::<Employee>::new();
            for _ in 0..seeded {
                store.allocate_and_insert(|id| bob().with_id(id)).unwrap();
            }
            let before = store.high_water_mark().value();

            let ids: Vec<u64> = (0..created)
                .map(|_| store.allocate_and_insert(|id| bob().with_id(id)).unwrap().id.value())
                .collect();

            let expected: Vec<u64> = (before + 1..=before + created as u64).collect();
            prop_assert_eq!(ids, expected);
        }
    }
}
