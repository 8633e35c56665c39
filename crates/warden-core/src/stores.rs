//! Persistence collaborators used by the seeder, the listing endpoints and
//! authentication.

use async_trait::async_trait;
use thiserror::Error;

use crate::listing::{SortOrder, Sortable, Window};
use crate::models::{
    NewPrivilege, NewRole, NewUser, Privilege, Role, User, UserCredentials,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate name: {0}")]
    Duplicate(String),
    #[error("credential error: {0}")]
    Credential(String),
    #[error(transparent)]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(err))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait PrivilegeStore: Send + Sync {
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Privilege>>;
    async fn create(&self, privilege: NewPrivilege) -> StoreResult<Privilege>;
    async fn delete_all(&self) -> StoreResult<u64>;
}

#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Role>>;
    async fn create(&self, role: NewRole) -> StoreResult<Role>;
    async fn delete_all(&self) -> StoreResult<u64>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<User>>;
    async fn create(&self, user: NewUser) -> StoreResult<User>;
    async fn delete_all(&self) -> StoreResult<u64>;
    async fn find_credentials(&self, name: &str) -> StoreResult<Option<UserCredentials>>;
}

/// Ordered, optionally windowed reads over one entity type.
#[async_trait]
pub trait ListingStore<T: Sortable>: Send + Sync {
    /// `order` defaults to [`SortOrder::by_id`] when absent.
    async fn fetch(&self, order: Option<SortOrder>, window: Option<Window>) -> StoreResult<Vec<T>>;
}
