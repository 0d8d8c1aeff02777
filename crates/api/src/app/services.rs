use std::sync::Arc;

use anyhow::Context;

use simplerest_auth::Realm;
use simplerest_employees::Employee;
use simplerest_greetings::Greeting;
use simplerest_infra::{
    AccessPolicy, InMemoryEntityStore, InMemorySlot, ResourceController, seed::seed_employees,
};

use crate::config::ApiConfig;

pub type EmployeeController = ResourceController<Employee, InMemoryEntityStore<Employee>>;
pub type GreetingController = ResourceController<Greeting, InMemoryEntityStore<Greeting>>;

pub const DEFAULT_HELLO: &str = "Hello!";

/// Everything the handlers share, owned by the router and dropped with it.
pub struct AppServices {
    /// Every operation, reads included, needs an `employee:*` permission.
    pub employees: EmployeeController,
    /// Reads are public; mutations need a `greeting:*` permission.
    pub greetings: GreetingController,
    /// Value behind `/hello/2`.
    pub hello: InMemorySlot<String>,
    pub realm: Arc<Realm>,
    pub public_base_url: Option<String>,
}

impl AppServices {
    pub fn new(config: &ApiConfig, realm: Realm) -> anyhow::Result<Self> {
        let employee_store = InMemoryEntityStore::new();
        if config.seed {
            seed_employees(&employee_store).context("failed to seed employees")?;
        }

        Ok(Self {
            employees: ResourceController::new(employee_store, AccessPolicy::guarded()),
            greetings: ResourceController::new(
                InMemoryEntityStore::new(),
                AccessPolicy::public_reads(),
            ),
            hello: InMemorySlot::new(Some(DEFAULT_HELLO.to_string())),
            realm: Arc::new(realm),
            public_base_url: config.public_base_url.clone(),
        })
    }
}

/// Load the configured realm file, or fall back to the demo realm.
pub fn load_realm(config: &ApiConfig) -> anyhow::Result<Realm> {
    match &config.realm_path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read realm file {}", path.display()))?;
            let realm = Realm::from_json(&json)
                .with_context(|| format!("invalid realm file {}", path.display()))?;
            tracing::info!(path = %path.display(), "realm loaded");
            Ok(realm)
        }
        None => {
            tracing::warn!("no realm file configured; using demo users");
            Ok(Realm::demo())
        }
    }
}
