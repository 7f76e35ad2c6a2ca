//! Store configuration.
//!
//! The backing implementation is chosen explicitly by whoever builds the
//! store; nothing here reads the process environment.

use serde::{Deserialize, Serialize};

/// Default base URL of the backend during local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

/// Configuration for the request store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: BackendConfig,
}

/// Which store implementation backs the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BackendConfig {
    /// Process-local collection with simulated network latency
    InMemory {
        #[serde(default)]
        latency: LatencyConfig,
        /// Preload the demonstration requests
        #[serde(default)]
        sample_data: bool,
    },
    /// JSON over HTTP to a real backend
    Remote(RemoteConfig),
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::InMemory {
            latency: LatencyConfig::default(),
            sample_data: false,
        }
    }
}

/// Connection settings for the remote backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,

    /// Sent as a bearer token when non-empty
    #[serde(default)]
    pub api_key: String,

    /// Timeout for each individual call in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Artificial delay, per operation, of the in-memory store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyConfig {
    pub list_ms: u64,
    pub get_ms: u64,
    pub create_ms: u64,
    pub update_ms: u64,
    pub delete_ms: u64,
    pub evaluation_ms: u64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            list_ms: 500,
            get_ms: 300,
            create_ms: 800,
            update_ms: 500,
            delete_ms: 500,
            evaluation_ms: 500,
        }
    }
}

impl LatencyConfig {
    /// No delay at all; for tests and embedding.
    pub fn none() -> Self {
        Self {
            list_ms: 0,
            get_ms: 0,
            create_ms: 0,
            update_ms: 0,
            delete_ms: 0,
            evaluation_ms: 0,
        }
    }
}
