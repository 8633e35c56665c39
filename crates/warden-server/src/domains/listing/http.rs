use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;
use warden_core::{ListingStore, Page, Privilege, Role, SortOrder, Sortable, User};
use warden_db::repo::{PrivilegeRepo, RoleRepo, UserRepo};

use crate::app::AppState;
use crate::config::ListingConfig;
use crate::domains::auth::Principal;

use super::contract::{ListError, SortingListing};
use super::types::{ErrorResponse, ListQuery};

/// An entity served by a listing endpoint, together with the store that
/// backs it in [`AppState`].
pub trait ListedResource: Sortable + Serialize + Send + Sync + Sized + 'static {
    const RESOURCE: &'static str;
    type Store: ListingStore<Self>;

    fn store(state: &AppState) -> &Self::Store;
}

impl ListedResource for Privilege {
    const RESOURCE: &'static str = "privileges";
    type Store = PrivilegeRepo;

    fn store(state: &AppState) -> &Self::Store {
        &state.privileges
    }
}

impl ListedResource for Role {
    const RESOURCE: &'static str = "roles";
    type Store = RoleRepo;

    fn store(state: &AppState) -> &Self::Store {
        &state.roles
    }
}

impl ListedResource for User {
    const RESOURCE: &'static str = "users";
    type Store = UserRepo;

    fn store(state: &AppState) -> &Self::Store {
        &state.users
    }
}

pub(crate) fn map_list_error(error: ListError) -> Response {
    match error {
        ListError::InvalidSortField(field) => {
            tracing::debug!(event = "list_rejected", reason = "invalid_sort_field", field = %field);
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "invalid_sort_field",
                }),
            )
                .into_response()
        }
        ListError::InvalidSortOrder(direction) => {
            tracing::debug!(
                event = "list_rejected",
                reason = "invalid_sort_order",
                direction = %direction
            );
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "invalid_sort_order",
                }),
            )
                .into_response()
        }
        ListError::InvalidPagination(reason) => {
            tracing::warn!(event = "list_failed", reason = "invalid_pagination", detail = reason);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "invalid_pagination",
                }),
            )
                .into_response()
        }
        ListError::Store(err) => {
            tracing::error!(event = "list_failed", reason = "db_error", error = %err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse { error: "db_error" }),
            )
                .into_response()
        }
    }
}

#[tracing::instrument(skip_all, fields(resource = T::RESOURCE, principal = %principal.name))]
pub(crate) async fn list_resources<T: ListedResource>(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    uri: Uri,
    Query(query): Query<ListQuery>,
) -> Response {
    match run_query::<T>(&state, &query).await {
        Ok(Listing::All(items)) => (StatusCode::OK, Json(items)).into_response(),
        Ok(Listing::Paged(page, order)) => {
            let links = page_links(uri.path(), &page, order);
            let mut response = (StatusCode::OK, Json(page.items)).into_response();
            if let Some(links) = links {
                match HeaderValue::from_str(&links) {
                    Ok(value) => {
                        response.headers_mut().insert(header::LINK, value);
                    }
                    Err(err) => {
                        tracing::warn!(event = "link_header_invalid", error = %err);
                    }
                }
            }
            response
        }
        Err(err) => map_list_error(err),
    }
}

enum Listing<T> {
    All(Vec<T>),
    Paged(Page<T>, Option<SortOrder>),
}

async fn run_query<T: ListedResource>(
    state: &AppState,
    query: &ListQuery,
) -> Result<Listing<T>, ListError> {
    let store = T::store(state);
    let sort_order = query.sort_order.as_deref().unwrap_or("asc");
    let sort_by = query.sort_by.as_deref();

    if !query.is_paginated() {
        let items = match sort_by {
            None => SortingListing::<T>::find_all(store).await?,
            Some(sort_by) => {
                SortingListing::<T>::find_all_sorted(store, sort_by, sort_order).await?
            }
        };
        return Ok(Listing::All(items));
    }

    let (page, size) = parse_window(query, &state.config.listing)?;
    match sort_by {
        None => {
            let page = SortingListing::<T>::find_all_paginated(store, page, size).await?;
            Ok(Listing::Paged(page, None))
        }
        Some(sort_by) => {
            let page = SortingListing::<T>::find_all_paginated_and_sorted(
                store, page, size, sort_by, sort_order,
            )
            .await?;
            // Links carry the canonical spelling, never the raw parameters.
            let order = SortOrder::parse::<T>(sort_by, sort_order)?;
            Ok(Listing::Paged(page, Some(order)))
        }
    }
}

/// Missing `page` is the first page, missing `size` the configured default.
/// Sizes above the configured maximum are clamped.
fn parse_window(query: &ListQuery, limits: &ListingConfig) -> Result<(u32, u32), ListError> {
    let page = match query.page.as_deref() {
        None => 0,
        Some(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ListError::InvalidPagination("page must be a non-negative integer"))?,
    };
    let size = match query.size.as_deref() {
        None => limits.default_page_size,
        Some(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ListError::InvalidPagination("size must be a positive integer"))?,
    };
    Ok((page, size.min(limits.max_page_size)))
}

fn page_links<T>(path: &str, page: &Page<T>, order: Option<SortOrder>) -> Option<String> {
    let sort = order
        .map(|order| {
            format!(
                "&sortBy={}&sortOrder={}",
                order.field(),
                order.direction().as_str()
            )
        })
        .unwrap_or_default();
    let link = |target: u32, rel: &str| {
        format!(
            "<{path}?page={target}&size={}{sort}>; rel=\"{rel}\"",
            page.size
        )
    };

    let mut links = Vec::new();
    if page.has_next {
        links.push(link(page.page + 1, "next"));
    }
    if page.has_prev() {
        links.push(link(page.page - 1, "prev"));
    }
    if links.is_empty() {
        None
    } else {
        Some(links.join(", "))
    }
}
