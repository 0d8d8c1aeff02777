use std::sync::RwLock;

use super::StoreError;

/// In-memory single-value store (a resource with exactly one, optional, value).
#[derive(Debug)]
pub struct InMemorySlot<T> {
    value: RwLock<Option<T>>,
}

impl<T: Clone + Send + Sync> InMemorySlot<T> {
    pub fn new(initial: Option<T>) -> Self {
        Self {
            value: RwLock::new(initial),
        }
    }

    pub fn get(&self) -> Result<Option<T>, StoreError> {
        let value = self.value.read().map_err(|_| StoreError::Poisoned)?;
        Ok(value.clone())
    }

    /// Store `value`, returning it back.
    pub fn set(&self, value: T) -> Result<T, StoreError> {
        let mut slot = self.value.write().map_err(|_| StoreError::Poisoned)?;
        *slot = Some(value.clone());
        Ok(value)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        let mut slot = self.value.write().map_err(|_| StoreError::Poisoned)?;
        *slot = None;
        Ok(())
    }
}

impl<T> Default for InMemorySlot<T> {
    fn default() -> Self {
        Self {
            value: RwLock::new(None),
        }
    }
}
