use serde::{Deserialize, Serialize};
use warden_core::SeedConfig;
use warden_crypto::KdfParams;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerRuntimeConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub setup: SetupConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 500;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerRuntimeConfig {
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    #[serde(default)]
    pub name: Option<String>,
}

impl Default for ServerRuntimeConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: default_max_body_bytes(),
            name: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    #[serde(default)]
    pub kdf: KdfParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

/// Bootstrap seeding. Enabling it wipes privileges, roles and users on every
/// process start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub seed: SeedConfig,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            seed: SeedConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_metrics_endpoint")]
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_metrics_endpoint(),
        }
    }
}

const fn default_true() -> bool {
    true
}

const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

const fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

const fn default_max_page_size() -> u32 {
    DEFAULT_MAX_PAGE_SIZE
}

fn default_metrics_endpoint() -> String {
    "/metrics".to_string()
}
