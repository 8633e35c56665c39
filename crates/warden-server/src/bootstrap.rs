use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use warden_db::{connect_sqlite_with_max, SqlitePool};

use crate::app::{self, AppState};
use crate::config::MetricsConfig;
use crate::domains::setup::Seeder;
use crate::infra::metrics;
use crate::runtime;
use crate::settings;

pub fn init_tracing() {
    runtime::init_tracing();
}

pub fn log_startup(settings: &settings::Settings) {
    let config = &settings.config;
    tracing::info!(
        event = "server_startup",
        addr = %settings.addr,
        db_pool_max = settings.db_pool_max,
        setup_enabled = config.setup.enabled,
        seeded_users = config.setup.seed.users.len(),
        default_page_size = config.listing.default_page_size,
        max_page_size = config.listing.max_page_size,
        metrics_enabled = config.metrics.enabled,
        server_name = ?config.server.name,
        "Server configuration loaded"
    );
    if config.setup.enabled {
        tracing::warn!(
            event = "setup_reset_enabled",
            "Bootstrap seeding clears all privileges, roles and users on start"
        );
    }
}

pub fn init_metrics_registry(metrics_config: &MetricsConfig) {
    if !metrics_config.enabled {
        return;
    }
    #[cfg(target_os = "linux")]
    {
        let process_collector = prometheus::process_collector::ProcessCollector::for_self();
        if prometheus::default_registry()
            .register(Box::new(process_collector))
            .is_err()
        {
            tracing::warn!("failed to register process metrics");
        }
    }
    #[cfg(not(target_os = "linux"))]
    {
        tracing::warn!("process metrics are only available on linux");
    }
}

pub async fn connect_db(settings: &settings::Settings) -> Result<SqlitePool, sqlx_core::Error> {
    connect_sqlite_with_max(&settings.db_url, settings.db_pool_max).await
}

pub fn build_state(settings: &settings::Settings, db: SqlitePool) -> AppState {
    AppState::new(db, settings.config.clone())
}

pub fn build_seeder(state: &AppState) -> Seeder {
    Seeder::new(
        Arc::new(state.privileges.clone()),
        Arc::new(state.roles.clone()),
        Arc::new(state.users.clone()),
        state.config.setup.seed.clone(),
    )
}

pub fn build_app(metrics_config: &MetricsConfig, state: AppState) -> Router {
    let request_id_header = axum::http::HeaderName::from_static("x-request-id");
    let mut app = app::build_router(state);
    if metrics_config.enabled {
        app = app.route_layer(middleware::from_fn(metrics::http_metrics));
        app = app.route(&metrics_config.endpoint, axum::routing::get(metrics::render));
    }
    app.layer(
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|value| value.to_str().ok())
                .unwrap_or("unknown");
            let matched = request
                .extensions()
                .get::<axum::extract::MatchedPath>()
                .map(axum::extract::MatchedPath::as_str)
                .unwrap_or("unmatched");
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                path = %matched,
                request_id = %request_id,
                user_id = tracing::field::Empty
            )
        }),
    )
    .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
    .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
    .layer(CatchPanicLayer::custom(|err| {
        tracing::error!(event = "panic_recovered", error = ?err, "handler panicked");
        match axum::response::Response::builder()
            .status(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
            .body(axum::body::Body::empty())
        {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(event = "panic_response_failed", error = %err);
                axum::response::Response::new(axum::body::Body::empty())
            }
        }
    }))
}

pub async fn serve(settings: &settings::Settings, app: Router) {
    let addr: SocketAddr = settings.addr;
    tracing::info!(%addr, "listening");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(event = "server_bind_failed", error = %err);
            return;
        }
    };
    if let Err(err) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(runtime::shutdown_signal())
    .await
    {
        tracing::error!(event = "server_failed", error = %err);
    }
}
