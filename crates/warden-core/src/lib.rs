#![allow(clippy::pedantic)]
#![allow(clippy::nursery)]
#![deny(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc)]

pub mod constants;
pub mod listing;
pub mod models;
pub mod seed;
pub mod stores;

pub use crate::listing::*;
pub use crate::models::*;
pub use crate::seed::*;
pub use crate::stores::*;
