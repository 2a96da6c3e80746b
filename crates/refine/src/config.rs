//! Orchestrator configuration.
//!
//! Values come from the environment with fixed fallbacks, or from a JSON
//! document when the embedder keeps its settings on disk.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Which item set a numeric price tool narrows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NumericBase {
    /// The items surfaced by the previous turn, or the whole catalog when
    /// nothing has been surfaced yet.
    #[default]
    SeenSet,
    FullCatalog,
}

impl NumericBase {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "seen" | "seen_set" => Some(NumericBase::SeenSet),
            "full" | "full_catalog" => Some(NumericBase::FullCatalog),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterConfig {
    /// Upper bound on one understanding-service round-trip.
    #[serde(with = "duration_secs", default = "default_timeout")]
    pub upstream_timeout: Duration,
    #[serde(default)]
    pub numeric_base: NumericBase,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            upstream_timeout: default_timeout(),
            numeric_base: NumericBase::default(),
        }
    }
}

impl FilterConfig {
    pub fn from_env() -> Self {
        let upstream_timeout = env::var("REFINE_UPSTREAM_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(default_timeout);
        let numeric_base = env::var("REFINE_NUMERIC_BASE")
            .ok()
            .and_then(|value| NumericBase::parse(&value))
            .unwrap_or_default();
        Self {
            upstream_timeout,
            numeric_base,
        }
    }

    pub fn with_numeric_base(mut self, numeric_base: NumericBase) -> Self {
        self.numeric_base = numeric_base;
        self
    }

    pub fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = timeout;
        self
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS)
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
