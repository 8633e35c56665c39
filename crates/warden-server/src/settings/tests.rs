use super::*;
use std::sync::Mutex;
use tempfile::TempDir;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for name in [
        "WARDEN_ADDR",
        "WARDEN_DB_URL",
        "WARDEN_DB_POOL_MAX",
        "WARDEN_CONFIG_PATH",
        "WARDEN_SETUP_ENABLED",
        "WARDEN_ADMIN_PASSWORD",
        "WARDEN_METRICS_ENABLED",
        "WARDEN_METRICS_ENDPOINT",
    ] {
        env::remove_var(name);
    }
}

/// The returned directory holds the config file until it is dropped.
fn set_config(yaml: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("config.yaml");
    std::fs::write(&config_path, yaml).expect("write config");
    env::set_var("WARDEN_CONFIG_PATH", config_path);
    dir
}

#[test]
fn defaults_apply_without_config_file() {
    let _lock = ENV_LOCK.lock().expect("env lock");
    clear_env();
    env::set_var("WARDEN_CONFIG_PATH", "/nonexistent/warden.yaml");

    let settings = Settings::from_env();
    assert_eq!(settings.addr.to_string(), "127.0.0.1:8080");
    assert_eq!(settings.db_url, "sqlite://warden.db");
    assert_eq!(settings.db_pool_max, 10);
    assert!(settings.config.setup.enabled);
    assert_eq!(settings.config.listing.default_page_size, 10);
    assert_eq!(settings.config.listing.max_page_size, 500);
    assert!(!settings.config.metrics.enabled);
    assert_eq!(settings.config.metrics.endpoint, "/metrics");
    assert!(preflight(&settings, true).is_ok());
}

#[test]
fn invalid_addr_falls_back_to_default() {
    let _lock = ENV_LOCK.lock().expect("env lock");
    clear_env();
    env::set_var("WARDEN_ADDR", "not-an-addr");

    let settings = Settings::from_env();
    assert_eq!(settings.addr.to_string(), "127.0.0.1:8080");
}

#[test]
fn yaml_config_is_loaded() {
    let _lock = ENV_LOCK.lock().expect("env lock");
    clear_env();
    let _config = set_config(
        r#"listing:
  default_page_size: 25
  max_page_size: 100
setup:
  enabled: false
"#,
    );

    let settings = Settings::from_env();
    assert_eq!(settings.config.listing.default_page_size, 25);
    assert_eq!(settings.config.listing.max_page_size, 100);
    assert!(!settings.config.setup.enabled);
}

#[test]
fn unparsable_config_falls_back_to_defaults() {
    let _lock = ENV_LOCK.lock().expect("env lock");
    clear_env();
    let _config = set_config("listing: [not, a, map");

    let settings = Settings::from_env();
    assert_eq!(settings.config.listing.default_page_size, 10);
}

#[test]
fn setup_and_metrics_env_overrides_apply() {
    let _lock = ENV_LOCK.lock().expect("env lock");
    clear_env();
    env::set_var("WARDEN_CONFIG_PATH", "/nonexistent/warden.yaml");
    env::set_var("WARDEN_SETUP_ENABLED", "off");
    env::set_var("WARDEN_ADMIN_PASSWORD", "rotated-secret");
    env::set_var("WARDEN_METRICS_ENABLED", "true");
    env::set_var("WARDEN_METRICS_ENDPOINT", "/internal/metrics");

    let settings = Settings::from_env();
    assert!(!settings.config.setup.enabled);
    let admin = settings
        .config
        .setup
        .seed
        .users
        .iter()
        .find(|user| user.login == "admin")
        .expect("admin seed");
    assert_eq!(admin.password, "rotated-secret");
    assert!(settings.config.metrics.enabled);
    assert_eq!(settings.config.metrics.endpoint, "/internal/metrics");
    clear_env();
}

#[test]
fn preflight_reports_every_problem() {
    let _lock = ENV_LOCK.lock().expect("env lock");
    clear_env();
    let _config = set_config(
        r#"listing:
  default_page_size: 50
  max_page_size: 20
metrics:
  enabled: true
  endpoint: metrics
setup:
  seed:
    privileges:
      - name: "user:write"
    roles:
      - name: admin
        privileges: ["user:write", "audit:read"]
    users:
      - login: ops
        password: secret
        roles: [operator]
"#,
    );

    let settings = Settings::from_env();
    let problems = preflight(&settings, true).expect_err("preflight should fail");
    assert!(problems
        .iter()
        .any(|value| value.contains("exceeds listing.max_page_size")));
    assert!(problems
        .iter()
        .any(|value| value.contains("undeclared privilege audit:read")));
    assert!(problems
        .iter()
        .any(|value| value.contains("undeclared role operator")));
    assert!(problems
        .iter()
        .any(|value| value.contains("metrics.endpoint must start with '/'")));
}

#[test]
fn preflight_checks_seed_only_when_seeding() {
    let _lock = ENV_LOCK.lock().expect("env lock");
    clear_env();
    let _config = set_config(
        r#"setup:
  enabled: false
  seed:
    roles:
      - name: admin
        privileges: ["missing"]
"#,
    );

    let settings = Settings::from_env();
    assert!(preflight(&settings, settings.config.setup.enabled).is_ok());

    // The seed subcommand seeds regardless of setup.enabled.
    let problems = preflight(&settings, true).expect_err("seed run must be checked");
    assert!(problems
        .iter()
        .any(|value| value.contains("undeclared privilege missing")));
}
