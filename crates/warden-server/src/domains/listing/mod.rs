//! Sorted and paginated listing over any [`warden_core::ListingStore`].

mod contract;
mod http;
mod types;

pub use contract::{ListError, SortingListing};
pub use http::ListedResource;
pub(crate) use http::list_resources;
