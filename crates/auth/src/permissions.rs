use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Action a principal may perform on a resource kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    View,
    Create,
    Update,
    Delete,
}

impl Capability {
    pub const fn as_str(self) -> &'static str {
        match self {
            Capability::View => "view",
            Capability::Create => "create",
            Capability::Update => "update",
            Capability::Delete => "delete",
        }
    }
}

impl core::fmt::Display for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permission identifier.
///
/// Permissions are strings of the form `"<resource>:<capability>"`
/// (e.g. `"employee:create"`). Two wildcard forms are recognised:
/// `"*"` grants everything and `"<resource>:*"` grants every capability on
/// one resource kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Permission for `capability` on resource kind `resource`.
    pub fn scoped(resource: &str, capability: Capability) -> Self {
        Self::new(format!("{resource}:{capability}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == "*"
    }

    /// Whether holding `self` satisfies a requirement for `required`.
    pub fn implies(&self, required: &Permission) -> bool {
        if self.is_wildcard() || self == required {
            return true;
        }

        match self.as_str().strip_suffix(":*") {
            Some(resource) => required
                .as_str()
                .split_once(':')
                .is_some_and(|(r, _)| r == resource),
            None => false,
        }
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_permission_format() {
        let p = Permission::scoped("employee", Capability::Create);
        assert_eq!(p.as_str(), "employee:create");
    }

    #[test]
    fn exact_match_implies() {
        let held = Permission::new("employee:view");
        assert!(held.implies(&Permission::scoped("employee", Capability::View)));
        assert!(!held.implies(&Permission::scoped("employee", Capability::Create)));
    }

    #[test]
    fn resource_wildcard_is_scoped_to_its_resource() {
        let held = Permission::new("employee:*");
        assert!(held.implies(&Permission::scoped("employee", Capability::Delete)));
        assert!(!held.implies(&Permission::scoped("greeting", Capability::Delete)));
    }

    #[test]
    fn global_wildcard_implies_everything() {
        let held = Permission::new("*");
        assert!(held.implies(&Permission::scoped("greeting", Capability::Update)));
    }
}
