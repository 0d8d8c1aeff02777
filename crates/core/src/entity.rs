//! Entity trait: a keyed record with continuity across replacements.

/// Entity marker + minimal interface.
///
/// Every entity carries its own key in its body. Stores index entities by
/// that key, and controllers compare it against the key addressed by a
/// request before allowing a mutation.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Strongly-typed entity key.
    type Key: Clone
        + Eq
        + core::hash::Hash
        + core::fmt::Debug
        + core::fmt::Display
        + Send
        + Sync
        + 'static;

    /// Resource kind name, used to scope permissions (e.g. `employee:view`).
    const KIND: &'static str;

    /// Returns the entity key.
    fn key(&self) -> &Self::Key;
}
