//! Strongly-typed keys used across the domain.
//!
//! Two key disciplines coexist:
//! - [`SequenceId`]: assigned by the server from a monotonically increasing
//!   sequence, exactly once, at creation.
//! - [`LangCode`]: a natural key supplied by the caller inside the body.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Server-assigned identifier (generated-id entities).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SequenceId(u64);

impl SequenceId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for SequenceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for SequenceId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<SequenceId> for u64 {
    fn from(value: SequenceId) -> Self {
        value.0
    }
}

impl FromStr for SequenceId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .parse::<u64>()
            .map_err(|e| DomainError::invalid_id(format!("SequenceId: {e}")))?;
        Ok(Self(value))
    }
}

/// Language code used as a natural key (e.g. `"en"`, `"de"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LangCode(String);

impl LangCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for LangCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LangCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_string())
    }
}

impl TryFrom<String> for LangCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().is_empty() {
            return Err(DomainError::invalid_id("LangCode: must not be empty"));
        }
        if value.contains('/') {
            return Err(DomainError::invalid_id("LangCode: must not contain '/'"));
        }
        Ok(Self(value))
    }
}

impl From<LangCode> for String {
    fn from(value: LangCode) -> Self {
        value.0
    }
}
