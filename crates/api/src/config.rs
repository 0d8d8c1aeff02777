//! Process configuration, read from the environment at startup.
//!
//! | variable              | default        | meaning                                   |
//! |-----------------------|----------------|-------------------------------------------|
//! | `SIMPLEREST_BIND`     | `0.0.0.0:8080` | listen address                            |
//! | `SIMPLEREST_BASE_URL` | unset          | public base URL used for `Location`       |
//! | `SIMPLEREST_REALM`    | unset          | path to a JSON realm file (demo if unset) |
//! | `SIMPLEREST_SEED`     | `true`         | load the demo employees at startup        |

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, bail};

pub const BIND_VAR: &str = "SIMPLEREST_BIND";
pub const BASE_URL_VAR: &str = "SIMPLEREST_BASE_URL";
pub const REALM_VAR: &str = "SIMPLEREST_REALM";
pub const SEED_VAR: &str = "SIMPLEREST_SEED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// Absolute base URL (`scheme://host[:port]`) for generated links.
    /// When unset, links are derived from the request `Host` header.
    pub public_base_url: Option<String>,
    pub realm_path: Option<PathBuf>,
    pub seed: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            public_base_url: None,
            realm_path: None,
            seed: true,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(BIND_VAR) {
            config.bind_addr = raw
                .trim()
                .parse()
                .with_context(|| format!("{BIND_VAR}: invalid socket address '{raw}'"))?;
        }

        if let Some(raw) = lookup(BASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            let base = raw.trim().trim_end_matches('/').to_string();
            if !(base.starts_with("http://") || base.starts_with("https://")) {
                bail!("{BASE_URL_VAR}: expected an absolute http(s) URL, got '{raw}'");
            }
            config.public_base_url = Some(base);
        }

        config.realm_path = lookup(REALM_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        if let Some(raw) = lookup(SEED_VAR) {
            config.seed = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => bail!("{SEED_VAR}: expected a boolean, got '{raw}'"),
            };
        }

        Ok(config)
    }
}
