//! Store connection settings and service behaviour options

use crate::error::{Error, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Region used when none is configured
pub const DEFAULT_REGION: &str = "us-east-1";

/// Table holding customer records
pub const DEFAULT_TABLE_NAME: &str = "Customer";

/// Delay applied by the paced listing operations
pub const DEFAULT_LIST_DELAY: Duration = Duration::from_millis(100);

pub const ENV_ENDPOINT: &str = "AWS_DYNAMODB_ENDPOINT";
pub const ENV_ACCESS_KEY: &str = "AWS_ACCESS_KEY";
pub const ENV_SECRET_KEY: &str = "AWS_SECRET_KEY";
pub const ENV_REGION: &str = "AWS_REGION";
pub const ENV_TABLE_NAME: &str = "CUSTOMER_TABLE_NAME";

/// Connection settings for the backing store
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreConfig {
    /// Endpoint override; empty means the default regional endpoint
    pub endpoint: String,

    pub access_key: String,

    pub secret_key: String,

    pub region: String,

    pub table_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
            region: DEFAULT_REGION.to_string(),
            table_name: DEFAULT_TABLE_NAME.to_string(),
        }
    }
}

// Secrets stay out of log output.
impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("endpoint", &self.endpoint)
            .field("access_key", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .field("region", &self.region)
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl StoreConfig {
    /// Creates a config with static credentials and default region and table
    pub fn new(
        endpoint: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            ..Self::default()
        }
    }

    /// Loads the config from the process environment
    ///
    /// `AWS_ACCESS_KEY` and `AWS_SECRET_KEY` are required. `AWS_DYNAMODB_ENDPOINT`
    /// may be unset or empty to use the default regional endpoint.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::Config(format!("{} is not set", key)))
        };

        let config = Self {
            endpoint: lookup(ENV_ENDPOINT).unwrap_or_default(),
            access_key: required(ENV_ACCESS_KEY)?,
            secret_key: required(ENV_SECRET_KEY)?,
            region: lookup(ENV_REGION)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            table_name: lookup(ENV_TABLE_NAME)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string()),
        };

        log::debug!("loaded store config: {:?}", config);

        Ok(config)
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    /// Returns the endpoint override, or `None` when the default endpoint applies
    pub fn endpoint_override(&self) -> Option<&str> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            None
        } else {
            Some(endpoint)
        }
    }
}

/// How the service stamps `created_time_stamp` on writes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampPolicy {
    /// Rewrite `created_time_stamp` on create, update and upsert
    #[default]
    Legacy,

    /// Stamp `created_time_stamp` once and carry it across later writes
    WriteOnce,
}

/// Options for the customer service
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    /// Delay used by the paced listing operations
    pub list_delay: Duration,

    pub timestamp_policy: TimestampPolicy,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            list_delay: DEFAULT_LIST_DELAY,
            timestamp_policy: TimestampPolicy::default(),
        }
    }
}

impl ServiceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list_delay(mut self, delay: Duration) -> Self {
        self.list_delay = delay;
        self
    }

    pub fn with_timestamp_policy(mut self, policy: TimestampPolicy) -> Self {
        self.timestamp_policy = policy;
        self
    }
}

/// Source of "now" for write timestamps
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current time in epoch seconds
    fn epoch_seconds(&self) -> i64;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn epoch_seconds(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// A clock that always reports the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn epoch_seconds(&self) -> i64 {
        self.0
    }
}
