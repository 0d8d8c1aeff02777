//! Credential realm: users, their roles, and the permissions each role grants.
//!
//! The realm is the authentication collaborator. It never inspects requests;
//! callers hand it a decoded username/password pair and receive a resolved
//! [`Principal`] or an error.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Grants, Permission, Principal, PrincipalId, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RealmError {
    /// Unknown user or wrong password. The two are deliberately not distinguished.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid realm definition: {0}")]
    Invalid(String),
}

/// One user record of a realm definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEntry {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub roles: Vec<Role>,
}

/// Serializable realm definition (JSON file format).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealmConfig {
    pub users: Vec<UserEntry>,
    #[serde(default)]
    pub roles: HashMap<String, Vec<Permission>>,
}

/// In-memory realm built from a [`RealmConfig`].
#[derive(Debug, Clone)]
pub struct Realm {
    users: HashMap<String, UserEntry>,
    roles: HashMap<String, Vec<Permission>>,
}

impl Realm {
    pub fn from_config(config: RealmConfig) -> Result<Self, RealmError> {
        let mut users = HashMap::with_capacity(config.users.len());
        for user in config.users {
            if user.username.is_empty() || user.username.contains(':') {
                return Err(RealmError::Invalid(format!(
                    "username '{}' must be non-empty and must not contain ':'",
                    user.username
                )));
            }
            if users.contains_key(&user.username) {
                return Err(RealmError::Invalid(format!(
                    "duplicate username '{}'",
                    user.username
                )));
            }
            users.insert(user.username.clone(), user);
        }

        Ok(Self {
            users,
            roles: config.roles,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, RealmError> {
        let config: RealmConfig =
            serde_json::from_str(json).map_err(|e| RealmError::Invalid(e.to_string()))?;
        Self::from_config(config)
    }

    /// Built-in demo realm.
    ///
    /// - `Peter` / `P3ter`: role `viewer` (read-only on every resource kind)
    /// - `Sarah` / `S4rah`: role `manager` (every capability on every resource kind)
    pub fn demo() -> Self {
        let user = |name: &str, password: &str, role: &'static str| {
            (
                name.to_string(),
                UserEntry {
                    username: name.to_string(),
                    password: password.to_string(),
                    roles: vec![Role::new(role)],
                },
            )
        };

        Self {
            users: HashMap::from([
                user("Peter", "P3ter", "viewer"),
                user("Sarah", "S4rah", "manager"),
            ]),
            roles: HashMap::from([
                (
                    "viewer".to_string(),
                    vec![
                        Permission::new("employee:view"),
                        Permission::new("greeting:view"),
                    ],
                ),
                (
                    "manager".to_string(),
                    vec![Permission::new("employee:*"), Permission::new("greeting:*")],
                ),
            ]),
        }
    }

    /// Verify credentials and resolve the principal's grants.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Principal, RealmError> {
        let user = self
            .users
            .get(username)
            .filter(|u| u.password == password)
            .ok_or(RealmError::InvalidCredentials)?;

        let grants = Grants {
            roles: user.roles.clone(),
            permissions: self.permissions_for(&user.roles),
        };

        Ok(Principal::new(PrincipalId::new(user.username.clone()), grants))
    }

    /// Union of the permissions granted by `roles`, without duplicates.
    ///
    /// Roles the realm does not define grant nothing.
    pub fn permissions_for(&self, roles: &[Role]) -> Vec<Permission> {
        let mut seen = HashSet::new();
        roles
            .iter()
            .filter_map(|r| self.roles.get(r.as_str()))
            .flatten()
            .filter(|p| seen.insert((*p).clone()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{authorize, AuthzError, Capability};

    #[test]
    fn demo_viewer_can_view_but_not_create() {
        let realm = Realm::demo();
        let peter = realm.authenticate("Peter", "P3ter").unwrap();

        let view = Permission::scoped("employee", Capability::View);
        let create = Permission::scoped("employee", Capability::Create);
        assert_eq!(authorize(Some(&peter), &view), Ok(()));
        assert!(matches!(
            authorize(Some(&peter), &create),
            Err(AuthzError::Forbidden(_))
        ));
    }

    #[test]
    fn demo_manager_can_create() {
        let realm = Realm::demo();
        let sarah = realm.authenticate("Sarah", "S4rah").unwrap();
        let create = Permission::scoped("employee", Capability::Create);
        assert_eq!(authorize(Some(&sarah), &create), Ok(()));
    }

    #[test]
    fn wrong_password_and_unknown_user_look_the_same() {
        let realm = Realm::demo();
        assert_eq!(
            realm.authenticate("Peter", "nope"),
            Err(RealmError::InvalidCredentials)
        );
        assert_eq!(
            realm.authenticate("Mallory", "P3ter"),
            Err(RealmError::InvalidCredentials)
        );
    }

    #[test]
    fn realm_loads_from_json() {
        let json = r#"{
            "users": [
                {"username": "ada", "password": "secret", "roles": ["admin", "ghost"]}
            ],
            "roles": {"admin": ["*"]}
        }"#;
        let realm = Realm::from_json(json).unwrap();
        let ada = realm.authenticate("ada", "secret").unwrap();
        assert_eq!(ada.principal_id.as_str(), "ada");
        assert_eq!(ada.grants.permissions, vec![Permission::new("*")]);
    }

    #[test]
    fn duplicate_usernames_are_rejected() {
        let config = RealmConfig {
            users: vec![
                UserEntry {
                    username: "bob".into(),
                    password: "a".into(),
                    roles: vec![],
                },
                UserEntry {
                    username: "bob".into(),
                    password: "b".into(),
                    roles: vec![],
                },
            ],
            roles: HashMap::new(),
        };
        assert!(matches!(
            Realm::from_config(config),
            Err(RealmError::Invalid(_))
        ));
    }

    #[test]
    fn overlapping_roles_do_not_duplicate_permissions() {
        let json = r#"{
            "users": [{"username": "u", "password": "p", "roles": ["a", "b"]}],
            "roles": {"a": ["greeting:view"], "b": ["greeting:view", "greeting:delete"]}
        }"#;
        let realm = Realm::from_json(json).unwrap();
        let u = realm.authenticate("u", "p").unwrap();
        assert_eq!(u.grants.permissions.len(), 2);
    }
}
