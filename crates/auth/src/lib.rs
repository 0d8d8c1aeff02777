//! `simplerest-auth`: authentication realm and authorization gate.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod authorize;
pub mod permissions;
pub mod principal;
pub mod realm;

pub use authorize::{authorize, AuthzError, Principal};
pub use permissions::{Capability, Permission};
pub use principal::{Grants, PrincipalId, Role};
pub use realm::{Realm, RealmConfig, RealmError, UserEntry};
