use std::sync::atomic::{AtomicU64, Ordering};

use simplerest_core::SequenceId;

use super::StoreError;

/// Monotonic id sequence.
///
/// Allocation is split into [`peek`](Self::peek) and
/// [`commit`](Self::commit) so an id is consumed only once its entity is
/// actually stored. Both steps must happen under the owning store's write
/// lock; that lock is what serializes allocations.
#[derive(Debug, Default)]
pub struct IdSequence {
    last: AtomicU64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence whose first allocation is `last + 1`.
    pub fn starting_after(last: u64) -> Self {
        Self {
            last: AtomicU64::new(last),
        }
    }

    /// Id the next allocation returns. Does not consume it.
    pub fn peek(&self) -> Result<SequenceId, StoreError> {
        self.last
            .load(Ordering::Acquire)
            .checked_add(1)
            .map(SequenceId::new)
            .ok_or(StoreError::SequenceExhausted)
    }

    /// Consume `id`, previously returned by `peek`.
    pub fn commit(&self, id: SequenceId) {
        self.last.store(id.value(), Ordering::Release);
    }

    pub fn current(&self) -> SequenceId {
        SequenceId::new(self.last.load(Ordering::Acquire))
    }
}
