use super::prelude::*;
use warden_core::{NewPrivilege, Privilege, PrivilegeStore};

#[derive(Clone)]
pub struct PrivilegeRepo {
    pool: SqlitePool,
}

impl PrivilegeRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<Privilege>, sqlx_core::Error> {
        query_as!(
            Privilege,
            r#"
            SELECT id, name, created_at
            FROM privileges
            WHERE name = ?1
            "#,
            name
        )
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn insert(&self, name: &str) -> Result<Privilege, sqlx_core::Error> {
        let created_at = Utc::now();
        let result = query!(
            r#"INSERT INTO privileges (name, created_at) VALUES (?1, ?2)"#,
            name,
            created_at
        )
        .execute(&self.pool)
        .await?;
        Ok(Privilege {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            created_at,
        })
    }

    pub async fn purge(&self) -> Result<u64, sqlx_core::Error> {
        let deleted = query!(r#"DELETE FROM privileges"#)
            .execute(&self.pool)
            .await?
            .rows_affected();
        tracing::debug!(event = "privileges_purged", deleted);
        Ok(deleted)
    }

    pub async fn list(
        &self,
        order: SortOrder,
        window: Window,
    ) -> Result<Vec<Privilege>, sqlx_core::Error> {
        let sql = format!(
            r#"
            SELECT id, name, created_at
            FROM privileges
            ORDER BY {}
            LIMIT ?1 OFFSET ?2
            "#,
            order.to_sql()
        );
        query_as!(Privilege, &sql, window.limit, window.offset)
            .fetch_all(&self.pool)
            .await
    }
}

#[async_trait]
impl PrivilegeStore for PrivilegeRepo {
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Privilege>> {
        self.get_by_name(name)
            .await
            .map_err(|err| store_error(err, name))
    }

    async fn create(&self, privilege: NewPrivilege) -> StoreResult<Privilege> {
        self.insert(&privilege.name)
            .await
            .map_err(|err| store_error(err, &privilege.name))
    }

    async fn delete_all(&self) -> StoreResult<u64> {
        self.purge().await.map_err(StoreError::backend)
    }
}

#[async_trait]
impl ListingStore<Privilege> for PrivilegeRepo {
    async fn fetch(
        &self,
        order: Option<SortOrder>,
        window: Option<Window>,
    ) -> StoreResult<Vec<Privilege>> {
        self.list(
            order.unwrap_or_else(SortOrder::by_id),
            window.unwrap_or_else(unbounded),
        )
        .await
        .map_err(StoreError::backend)
    }
}
