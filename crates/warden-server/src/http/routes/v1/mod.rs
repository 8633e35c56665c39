use crate::app::AppState;
use axum::{middleware, routing::get, Router};
use warden_core::{Privilege, Role, User};

use crate::domains::auth::basic_auth_middleware;
use crate::domains::listing::list_resources;

pub fn router() -> Router<AppState> {
    // Every listing requires basic auth.
    Router::new()
        .route("/v1/privileges", get(list_resources::<Privilege>))
        .route("/v1/roles", get(list_resources::<Role>))
        .route("/v1/users", get(list_resources::<User>))
        .layer(middleware::from_fn(basic_auth_middleware))
}
