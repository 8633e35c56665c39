use std::env;
use std::fs;
use std::path::Path;

use tracing::warn;
use warden_core::constants::principals;

use crate::config::ServerConfig;

pub(super) fn load_config(path: &str) -> ServerConfig {
    if !Path::new(path).exists() {
        return ServerConfig::default();
    }

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            warn!(event = "config_read_failed", path, error = %err);
            return ServerConfig::default();
        }
    };
    match serde_yaml::from_str(&contents) {
        Ok(config) => config,
        Err(err) => {
            warn!(event = "config_parse_failed", path, error = %err);
            ServerConfig::default()
        }
    }
}

pub(super) fn apply_setup_env_overrides(config: &mut ServerConfig) {
    if let Ok(value) = env::var("WARDEN_SETUP_ENABLED") {
        if let Some(enabled) = parse_bool(&value) {
            config.setup.enabled = enabled;
        } else {
            warn!(event = "config_invalid", field = "WARDEN_SETUP_ENABLED", value = %value);
        }
    }
    if let Ok(password) = env::var("WARDEN_ADMIN_PASSWORD") {
        if password.is_empty() {
            warn!(
                event = "config_invalid",
                field = "WARDEN_ADMIN_PASSWORD",
                "empty admin password ignored"
            );
            return;
        }
        let admin = config
            .setup
            .seed
            .users
            .iter_mut()
            .find(|user| user.login == principals::ADMIN_USERNAME);
        match admin {
            Some(user) => user.password = password,
            None => warn!(
                event = "admin_password_unused",
                "WARDEN_ADMIN_PASSWORD set but no seeded admin user is configured"
            ),
        }
    }
}

pub(super) fn apply_metrics_env_overrides(config: &mut ServerConfig) {
    if let Ok(value) = env::var("WARDEN_METRICS_ENABLED") {
        if let Some(enabled) = parse_bool(&value) {
            config.metrics.enabled = enabled;
        } else {
            warn!(event = "config_invalid", field = "WARDEN_METRICS_ENABLED", value = %value);
        }
    }
    if let Ok(value) = env::var("WARDEN_METRICS_ENDPOINT") {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            warn!(event = "config_invalid", field = "WARDEN_METRICS_ENDPOINT", value = %value);
        } else {
            config.metrics.endpoint = trimmed.to_string();
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
