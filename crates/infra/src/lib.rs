//! Infrastructure: in-memory entity stores and the resource controller that
//! gates every store access behind the authorization check.

pub mod controller;
pub mod seed;
pub mod store;

pub use controller::{AccessPolicy, Operation, Outcome, ResourceController, ResourceError};
pub use store::{EntityStore, InMemoryEntityStore, InMemorySlot, Replaced, SequencedStore, StoreError};
