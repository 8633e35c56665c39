#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use base64::Engine;
use tower::ServiceExt;
use tracing_subscriber::EnvFilter;
use tempfile::TempDir;
use warden_db::{connect_sqlite_with_max, migrate, SqlitePool};
use warden_server::app::{build_router, AppState};
use warden_server::config::ServerConfig;
use warden_server::domains::setup::Seeder;

pub const ADMIN: &str = "admin";
pub const ADMIN_PASSWORD: &str = "adminpass";

pub fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("warden_server=debug"))
            .with_test_writer()
            .try_init();
    });
}

pub fn tune_test_kdf(config: &mut ServerConfig) {
    config.auth.kdf.iterations = 1;
    config.auth.kdf.memory_kb = 8;
    config.auth.kdf.parallelism = 1;
}

pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    tune_test_kdf(&mut config);
    config
}

/// A fresh, migrated database file inside a directory that is removed on
/// drop. One connection keeps every query on the same snapshot.
pub async fn setup_db() -> (SqlitePool, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_url = format!("sqlite://{}", dir.path().join("warden.sqlite").display());
    let pool = connect_sqlite_with_max(&db_url, 1)
        .await
        .expect("connect sqlite");
    migrate(&pool).await.expect("migrate");
    (pool, dir)
}

pub fn seeder_for(state: &AppState) -> Seeder {
    warden_server::bootstrap::build_seeder(state)
}

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    _db_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: ServerConfig) -> Self {
        init_tracing();
        let (pool, db_dir) = setup_db().await;
        let state = AppState::new(pool, config);
        let app = build_router(state.clone());
        Self {
            app,
            state,
            _db_dir: db_dir,
        }
    }

    /// A new app whose stores already hold the default seed.
    pub async fn seeded() -> Self {
        let app = Self::new().await;
        seeder_for(&app.state).on_ready().await.expect("seed");
        app
    }

    pub async fn get(
        &self,
        uri: &str,
        credentials: Option<(&str, &str)>,
    ) -> (StatusCode, HeaderMap, serde_json::Value) {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some((name, password)) = credentials {
            builder = builder.header(header::AUTHORIZATION, basic(name, password));
        }
        let request = builder.body(Body::empty()).expect("request");
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("response");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, headers, json)
    }

    pub async fn get_as_admin(&self, uri: &str) -> (StatusCode, HeaderMap, serde_json::Value) {
        self.get(uri, Some((ADMIN, ADMIN_PASSWORD))).await
    }
}

pub fn basic(name: &str, password: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(format!("{name}:{password}"));
    format!("Basic {encoded}")
}

pub fn field_values(body: &serde_json::Value, field: &str) -> Vec<serde_json::Value> {
    body.as_array()
        .expect("array body")
        .iter()
        .map(|item| item[field].clone())
        .collect()
}

pub fn link_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::LINK)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
