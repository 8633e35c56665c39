use async_trait::async_trait;
use thiserror::Error;
use warden_core::{
    ListingStore, Page, PageError, PageRequest, SortError, SortOrder, Sortable, StoreError,
};

#[derive(Debug, Error)]
pub enum ListError {
    #[error("invalid sort field: {0}")]
    InvalidSortField(String),
    #[error("invalid sort order: {0}")]
    InvalidSortOrder(String),
    #[error("invalid pagination: {0}")]
    InvalidPagination(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<SortError> for ListError {
    fn from(err: SortError) -> Self {
        match err {
            SortError::UnknownField(field) => Self::InvalidSortField(field),
            SortError::UnknownDirection(direction) => Self::InvalidSortOrder(direction),
        }
    }
}

impl From<PageError> for ListError {
    fn from(err: PageError) -> Self {
        match err {
            PageError::ZeroSize => Self::InvalidPagination("size must be positive"),
        }
    }
}

/// The four query shapes every listing endpoint supports.
///
/// Pages are zero-indexed. Ascending order is the natural order of the field;
/// descending is its exact reverse, ties included.
#[async_trait]
pub trait SortingListing<T: Sortable + Send + 'static> {
    /// Every record, ascending by id.
    async fn find_all(&self) -> Result<Vec<T>, ListError>;

    async fn find_all_sorted(&self, sort_by: &str, sort_order: &str) -> Result<Vec<T>, ListError>;

    async fn find_all_paginated(&self, page: u32, size: u32) -> Result<Page<T>, ListError>;

    async fn find_all_paginated_and_sorted(
        &self,
        page: u32,
        size: u32,
        sort_by: &str,
        sort_order: &str,
    ) -> Result<Page<T>, ListError>;
}

#[async_trait]
impl<T, S> SortingListing<T> for S
where
    T: Sortable + Send + 'static,
    S: ListingStore<T> + ?Sized,
{
    async fn find_all(&self) -> Result<Vec<T>, ListError> {
        Ok(self.fetch(None, None).await?)
    }

    async fn find_all_sorted(&self, sort_by: &str, sort_order: &str) -> Result<Vec<T>, ListError> {
        let order = SortOrder::parse::<T>(sort_by, sort_order)?;
        Ok(self.fetch(Some(order), None).await?)
    }

    async fn find_all_paginated(&self, page: u32, size: u32) -> Result<Page<T>, ListError> {
        let request = PageRequest::new(page, size)?;
        let rows = self.fetch(None, Some(request.probe_window())).await?;
        Ok(Page::from_probe(rows, request))
    }

    async fn find_all_paginated_and_sorted(
        &self,
        page: u32,
        size: u32,
        sort_by: &str,
        sort_order: &str,
    ) -> Result<Page<T>, ListError> {
        let order = SortOrder::parse::<T>(sort_by, sort_order)?;
        let request = PageRequest::new(page, size)?;
        let rows = self
            .fetch(Some(order), Some(request.probe_window()))
            .await?;
        Ok(Page::from_probe(rows, request))
    }
}
