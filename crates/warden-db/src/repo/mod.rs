macro_rules! query {
    ($sql:expr $(, $arg:expr)* $(,)?) => {{
        #[allow(unused_mut)]
        let mut q = sqlx_core::query::query::<sqlx_sqlite::Sqlite>($sql);
        $(q = q.bind($arg);)*
        q
    }};
}

macro_rules! query_as {
    ($ty:ty, $sql:expr $(, $arg:expr)* $(,)?) => {{
        #[allow(unused_mut)]
        let mut q = sqlx_core::query_as::query_as::<sqlx_sqlite::Sqlite, $ty>($sql);
        $(q = q.bind($arg);)*
        q
    }};
}

pub(crate) mod prelude {
    pub(crate) use crate::SqlitePool;
    pub(crate) use async_trait::async_trait;
    pub(crate) use chrono::Utc;
    pub(crate) use warden_core::{
        ListingStore, SortOrder, StoreError, StoreResult, Window,
    };

    pub(crate) use super::{store_error, unbounded};
}

mod privileges;
mod roles;
mod users;

pub use privileges::PrivilegeRepo;
pub use roles::RoleRepo;
pub use users::UserRepo;

use warden_core::{StoreError, Window};

/// Maps a unique-constraint violation on `name` to [`StoreError::Duplicate`].
pub(crate) fn store_error(err: sqlx_core::Error, name: &str) -> StoreError {
    let duplicate = matches!(
        &err,
        sqlx_core::Error::Database(db) if db.is_unique_violation()
    );
    if duplicate {
        StoreError::Duplicate(name.to_string())
    } else {
        StoreError::backend(err)
    }
}

/// SQLite treats a negative LIMIT as "no limit".
pub(crate) fn unbounded() -> Window {
    Window {
        offset: 0,
        limit: -1,
    }
}
