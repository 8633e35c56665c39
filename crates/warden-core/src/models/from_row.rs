#[cfg(feature = "sqlite")]
use sqlx_core::from_row::FromRow;
#[cfg(feature = "sqlite")]
use sqlx_core::row::Row;
#[cfg(feature = "sqlite")]
use sqlx_sqlite::SqliteRow;

#[cfg(feature = "sqlite")]
use super::*;

// Roles and users come back without their relations; the repos attach those
// with a second query.
macro_rules! impl_from_row {
    ($ty:ty, $row:ident => $body:block) => {
        #[cfg(feature = "sqlite")]
        impl FromRow<'_, SqliteRow> for $ty {
            fn from_row($row: &SqliteRow) -> Result<Self, sqlx_core::Error> {
                $body
            }
        }
    };
}

impl_from_row!(Privilege, row => {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            created_at: row.try_get("created_at")?,
        })
    }
);

impl_from_row!(Role, row => {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            privileges: Vec::new(),
            created_at: row.try_get("created_at")?,
        })
    }
);

impl_from_row!(User, row => {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            roles: Vec::new(),
            created_at: row.try_get("created_at")?,
        })
    }
);

impl_from_row!(UserCredentials, row => {
        Ok(Self {
            user_id: row.try_get("id")?,
            name: row.try_get("name")?,
            password_hash: row.try_get("password_hash")?,
        })
    }
);
