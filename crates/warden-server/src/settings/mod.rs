use std::env;
use std::net::SocketAddr;

use tracing::warn;

use crate::config::ServerConfig;

mod env_config;
#[cfg(test)]
mod tests;

const DEFAULT_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_DB_URL: &str = "sqlite://warden.db";

#[derive(Debug, Clone)]
pub struct Settings {
    pub addr: SocketAddr,
    pub db_url: String,
    pub db_pool_max: u32,
    pub config: ServerConfig,
}

impl Settings {
    #[must_use]
    pub fn from_env() -> Self {
        let addr = match env::var("WARDEN_ADDR") {
            Ok(value) => value.parse().unwrap_or_else(|_| {
                warn!(event = "config_invalid", field = "WARDEN_ADDR", value = %value);
                default_addr()
            }),
            Err(_) => default_addr(),
        };
        let db_url = env::var("WARDEN_DB_URL").unwrap_or_else(|_| DEFAULT_DB_URL.to_string());
        let db_pool_max = env::var("WARDEN_DB_POOL_MAX")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(10);
        let config_path =
            env::var("WARDEN_CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());
        let mut config = env_config::load_config(&config_path);
        env_config::apply_setup_env_overrides(&mut config);
        env_config::apply_metrics_env_overrides(&mut config);

        Self {
            addr,
            db_url,
            db_pool_max,
            config,
        }
    }
}

fn default_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

/// Checks the loaded configuration for values the server cannot run with.
/// Every problem is reported, not only the first one. Seed references are
/// checked whenever this process is going to seed, even with setup disabled.
pub fn preflight(settings: &Settings, seeding: bool) -> Result<(), Vec<String>> {
    let mut problems = Vec::new();
    let listing = &settings.config.listing;
    if listing.default_page_size == 0 {
        problems.push("listing.default_page_size must be positive".to_string());
    }
    if listing.max_page_size == 0 {
        problems.push("listing.max_page_size must be positive".to_string());
    }
    if listing.default_page_size > listing.max_page_size {
        problems.push(format!(
            "listing.default_page_size ({}) exceeds listing.max_page_size ({})",
            listing.default_page_size, listing.max_page_size
        ));
    }
    if seeding {
        let seed = &settings.config.setup.seed;
        for (role, privilege) in seed.undeclared_privileges() {
            problems.push(format!(
                "setup.seed role {role} references undeclared privilege {privilege}"
            ));
        }
        for (login, role) in seed.undeclared_roles() {
            problems.push(format!(
                "setup.seed user {login} references undeclared role {role}"
            ));
        }
    }
    let metrics = &settings.config.metrics;
    if metrics.enabled && !metrics.endpoint.starts_with('/') {
        problems.push("metrics.endpoint must start with '/'".to_string());
    }
    if let Err(err) = settings.db_url.parse::<sqlx_sqlite::SqliteConnectOptions>() {
        problems.push(format!("WARDEN_DB_URL is not a sqlite url: {err}"));
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}
