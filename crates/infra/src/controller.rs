//! Resource controller: one permission-gated CRUD engine per resource kind.
//!
//! Every operation runs the same pipeline:
//!
//! ```text
//! decoded request (principal, key, body)
//!   ↓
//! 1. Authorize the capability the operation declares (before any store access)
//!   ↓
//! 2. Validate key/identity consistency
//!   ↓
//! 3. Call the store
//!   ↓
//! 4. Return an Outcome, or a ResourceError for the HTTP layer to translate
//! ```
//!
//! Failing authorization never leaves a partial mutation behind: the store is
//! not touched until the check passes.

use std::marker::PhantomData;

use thiserror::Error;

use simplerest_auth::{authorize, AuthzError, Capability, Permission, Principal};
use simplerest_core::{DomainError, Entity, SequenceId};

use crate::store::{EntityStore, Replaced, SequencedStore, StoreError};

/// Failure taxonomy shared by every resource kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unauthenticated")]
    Unauthenticated,
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<AuthzError> for ResourceError {
    fn from(value: AuthzError) -> Self {
        match value {
            AuthzError::Unauthenticated => Self::Unauthenticated,
            AuthzError::Forbidden(perm) => Self::Forbidden(perm),
        }
    }
}

impl From<StoreError> for ResourceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(key) => Self::NotFound(key),
            e @ StoreError::KeyMismatch { .. } => Self::BadRequest(e.to_string()),
            e @ (StoreError::SequenceExhausted | StoreError::Poisoned) => {
                Self::Internal(e.to_string())
            }
        }
    }
}

impl From<DomainError> for ResourceError {
    fn from(value: DomainError) -> Self {
        Self::BadRequest(value.to_string())
    }
}

/// Operations a controller performs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operation {
    ReadOne,
    ReadAll,
    Create,
    Replace,
    Update,
    DeleteOne,
    DeleteAll,
}

impl Operation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Operation::ReadOne => "read_one",
            Operation::ReadAll => "read_all",
            Operation::Create => "create",
            Operation::Replace => "replace",
            Operation::Update => "update",
            Operation::DeleteOne => "delete_one",
            Operation::DeleteAll => "delete_all",
        }
    }
}

/// Per-resource access configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    /// Reads need no principal at all.
    pub public_reads: bool,
    /// Capability required to replace-or-create by natural key.
    pub upsert: Capability,
}

impl AccessPolicy {
    /// Every operation, reads included, requires a capability.
    pub const fn guarded() -> Self {
        Self {
            public_reads: false,
            upsert: Capability::Update,
        }
    }

    /// Reads are universally permitted; mutations require a capability.
    pub const fn public_reads() -> Self {
        Self {
            public_reads: true,
            upsert: Capability::Update,
        }
    }

    /// Capability `op` requires, or `None` when it is universally permitted.
    pub fn required(&self, op: Operation) -> Option<Capability> {
        match op {
            Operation::ReadOne | Operation::ReadAll => {
                (!self.public_reads).then_some(Capability::View)
            }
            Operation::Create => Some(Capability::Create),
            Operation::Replace => Some(self.upsert),
            Operation::Update => Some(Capability::Update),
            Operation::DeleteOne | Operation::DeleteAll => Some(Capability::Delete),
        }
    }
}

/// Successful result of a controller operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<V: Entity> {
    Found(V),
    Listed(Vec<V>),
    /// A new entity now exists under this key.
    Created(V::Key),
    /// An existing entity under this key was overwritten.
    Updated(V::Key),
    Deleted,
}

/// Permission-gated CRUD engine over one store.
#[derive(Debug)]
pub struct ResourceController<V: Entity, S> {
    store: S,
    policy: AccessPolicy,
    _entity: PhantomData<fn() -> V>,
}

impl<V, S> ResourceController<V, S>
where
    V: Entity,
    S: EntityStore<V>,
{
    pub fn new(store: S, policy: AccessPolicy) -> Self {
        Self {
            store,
            policy,
            _entity: PhantomData,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Check that `principal` may perform `op` on this resource kind.
    ///
    /// Every operation below runs this first. Callers that still have to
    /// decode request input call it before decoding, so an unauthorized
    /// caller learns nothing about the validity of its input.
    pub fn authorize(&self, principal: Option<&Principal>, op: Operation) -> Result<(), ResourceError> {
        let Some(capability) = self.policy.required(op) else {
            return Ok(());
        };

        let required = Permission::scoped(V::KIND, capability);
        authorize(principal, &required).map_err(|e| {
            if matches!(e, AuthzError::Unauthenticated) {
                tracing::warn!(resource = V::KIND, op = op.as_str(), "operation rejected: no principal");
            }
            ResourceError::from(e)
        })
    }

    fn ensure_key(path_key: &V::Key, body: &V) -> Result<(), ResourceError> {
        if body.key() == path_key {
            Ok(())
        } else {
            Err(DomainError::key_mismatch(path_key, body.key()).into())
        }
    }

    pub fn read_one(
        &self,
        principal: Option<&Principal>,
        key: &V::Key,
    ) -> Result<Outcome<V>, ResourceError> {
        self.authorize(principal, Operation::ReadOne)?;
        let entity = self.store.get(key)?;
        Ok(Outcome::Found(entity))
    }

    /// All entities; an empty store yields an empty list, not an error.
    pub fn read_all(&self, principal: Option<&Principal>) -> Result<Outcome<V>, ResourceError> {
        self.authorize(principal, Operation::ReadAll)?;
        Ok(Outcome::Listed(self.store.list_all()?))
    }

    /// Replace-or-create under a natural key addressed by the request.
    ///
    /// Idempotent: repeating the call with the same body leaves the same
    /// state and reports `Updated` after the first call.
    pub fn replace(
        &self,
        principal: Option<&Principal>,
        key: &V::Key,
        body: V,
    ) -> Result<Outcome<V>, ResourceError> {
        self.authorize(principal, Operation::Replace)?;
        Self::ensure_key(key, &body)?;

        let outcome = match self.store.replace(key, body)? {
            Replaced::Created => Outcome::Created(key.clone()),
            Replaced::Updated => Outcome::Updated(key.clone()),
        };
        tracing::debug!(resource = V::KIND, op = Operation::Replace.as_str(), key = %key, created = matches!(outcome, Outcome::Created(_)), "entity stored");
        Ok(outcome)
    }

    /// Replace-or-create with the key taken from the body itself.
    pub fn upsert(
        &self,
        principal: Option<&Principal>,
        body: V,
    ) -> Result<Outcome<V>, ResourceError> {
        let key = body.key().clone();
        self.replace(principal, &key, body)
    }

    /// Overwrite an existing entity; the body must carry the addressed key.
    pub fn update(
        &self,
        principal: Option<&Principal>,
        key: &V::Key,
        body: V,
    ) -> Result<Outcome<V>, ResourceError> {
        self.authorize(principal, Operation::Update)?;
        Self::ensure_key(key, &body)?;

        self.store.update_existing(key, body)?;
        tracing::debug!(resource = V::KIND, op = Operation::Update.as_str(), key = %key, "entity updated");
        Ok(Outcome::Updated(key.clone()))
    }

    pub fn delete_one(
        &self,
        principal: Option<&Principal>,
        key: &V::Key,
    ) -> Result<Outcome<V>, ResourceError> {
        self.authorize(principal, Operation::DeleteOne)?;
        self.store.delete(key)?;
        tracing::debug!(resource = V::KIND, op = Operation::DeleteOne.as_str(), key = %key, "entity deleted");
        Ok(Outcome::Deleted)
    }

    /// Remove every entity. Succeeds on an already empty store.
    pub fn delete_all(&self, principal: Option<&Principal>) -> Result<Outcome<V>, ResourceError> {
        self.authorize(principal, Operation::DeleteAll)?;
        let removed = self.store.clear()?;
        tracing::debug!(resource = V::KIND, op = Operation::DeleteAll.as_str(), removed, "store cleared");
        Ok(Outcome::Deleted)
    }
}

impl<V, S> ResourceController<V, S>
where
    V: Entity<Key = SequenceId>,
    S: SequencedStore<V>,
{
    /// Create with a server-assigned id.
    ///
    /// Not idempotent: every call allocates a fresh id and creates a
    /// distinct entity.
    pub fn create<F>(
        &self,
        principal: Option<&Principal>,
        build: F,
    ) -> Result<Outcome<V>, ResourceError>
    where
        F: FnOnce(SequenceId) -> V,
    {
        self.authorize(principal, Operation::Create)?;
        let entity = self.store.allocate_and_insert(build)?;
        tracing::debug!(resource = V::KIND, op = Operation::Create.as_str(), key = %entity.key(), "entity created");
        Ok(Outcome::Created(entity.key().clone()))
    }
}
