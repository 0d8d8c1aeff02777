use thiserror::Error;

use crate::{Grants, Permission, PrincipalId};

/// A fully resolved principal for authorization decisions.
///
/// Construction of this object is decoupled from transport: the HTTP layer
/// obtains it from the [`Realm`](crate::Realm) after checking credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub principal_id: PrincipalId,
    pub grants: Grants,
}

impl Principal {
    pub fn new(principal_id: PrincipalId, grants: Grants) -> Self {
        Self {
            principal_id,
            grants,
        }
    }

    /// Whether any held permission implies `required`.
    pub fn holds(&self, required: &Permission) -> bool {
        self.grants.permissions.iter().any(|p| p.implies(required))
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("unauthenticated")]
    Unauthenticated,

    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Check that `principal` holds `required`.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
///
/// An absent principal always fails with [`AuthzError::Unauthenticated`],
/// whatever the requirement.
pub fn authorize(principal: Option<&Principal>, required: &Permission) -> Result<(), AuthzError> {
    let principal = principal.ok_or(AuthzError::Unauthenticated)?;

    if principal.holds(required) {
        Ok(())
    } else {
        tracing::warn!(
            principal = %principal.principal_id,
            permission = %required,
            "authorization denied"
        );
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}
