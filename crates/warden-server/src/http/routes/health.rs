use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use crate::app::AppState;

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) status: &'static str,
    pub(crate) version: &'static str,
    pub(crate) uptime_seconds: u64,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let uptime_seconds = state.started_at.elapsed().as_secs();
    let version = env!("CARGO_PKG_VERSION");

    if sqlx_core::query::query::<sqlx_sqlite::Sqlite>("SELECT 1")
        .execute(&state.db)
        .await
        .is_ok()
    {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                version,
                uptime_seconds,
            }),
        )
    } else {
        tracing::warn!(event = "health_db_unavailable");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "db_error",
                version,
                uptime_seconds,
            }),
        )
    }
}
