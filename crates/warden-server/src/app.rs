use axum::{extract::DefaultBodyLimit, Extension, Router};
use std::time::Instant;

use crate::config::ServerConfig;
use warden_db::repo::{PrivilegeRepo, RoleRepo, UserRepo};
use warden_db::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub started_at: Instant,
    pub config: ServerConfig,
    pub privileges: PrivilegeRepo,
    pub roles: RoleRepo,
    pub users: UserRepo,
}

impl AppState {
    /// Builds the stores over `db`. Users are hashed with `config.auth.kdf`.
    pub fn new(db: SqlitePool, config: ServerConfig) -> Self {
        Self {
            privileges: PrivilegeRepo::new(db.clone()),
            roles: RoleRepo::new(db.clone()),
            users: UserRepo::new(db.clone(), config.auth.kdf),
            db,
            started_at: Instant::now(),
            config,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let extension_state = state.clone();
    let max_body_bytes = state.config.server.max_body_bytes;
    crate::http::router()
        .with_state(state)
        .layer(Extension(extension_state))
        .layer(DefaultBodyLimit::max(max_body_bytes))
}
