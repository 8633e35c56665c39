use super::prelude::*;
use warden_core::{NewRole, Privilege, Role, RoleStore};

#[derive(Clone)]
pub struct RoleRepo {
    pool: SqlitePool,
}

impl RoleRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<Role>, sqlx_core::Error> {
        let role = query_as!(
            Role,
            r#"
            SELECT id, name, created_at
            FROM roles
            WHERE name = ?1
            "#,
            name
        )
        .fetch_optional(&self.pool)
        .await?;
        match role {
            Some(role) => Ok(Some(self.with_privileges(role).await?)),
            None => Ok(None),
        }
    }

    /// Inserts the role and its privilege links in one transaction. Repeated
    /// privileges collapse into a single link.
    pub async fn insert(&self, name: &str, privileges: &[Privilege]) -> Result<Role, sqlx_core::Error> {
        let created_at = Utc::now();
        let mut tx = self.pool.begin().await?;
        let result = query!(
            r#"INSERT INTO roles (name, created_at) VALUES (?1, ?2)"#,
            name,
            created_at
        )
        .execute(&mut *tx)
        .await?;
        let role_id = result.last_insert_rowid();
        for privilege in privileges {
            query!(
                r#"
                INSERT OR IGNORE INTO role_privileges (role_id, privilege_id)
                VALUES (?1, ?2)
                "#,
                role_id,
                privilege.id
            )
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        let role = Role {
            id: role_id,
            name: name.to_string(),
            privileges: Vec::new(),
            created_at,
        };
        self.with_privileges(role).await
    }

    pub async fn purge(&self) -> Result<u64, sqlx_core::Error> {
        let deleted = query!(r#"DELETE FROM roles"#)
            .execute(&self.pool)
            .await?
            .rows_affected();
        tracing::debug!(event = "roles_purged", deleted);
        Ok(deleted)
    }

    pub async fn list(&self, order: SortOrder, window: Window) -> Result<Vec<Role>, sqlx_core::Error> {
        let sql = format!(
            r#"
            SELECT id, name, created_at
            FROM roles
            ORDER BY {}
            LIMIT ?1 OFFSET ?2
            "#,
            order.to_sql()
        );
        let roles = query_as!(Role, &sql, window.limit, window.offset)
            .fetch_all(&self.pool)
            .await?;
        let mut loaded = Vec::with_capacity(roles.len());
        for role in roles {
            loaded.push(self.with_privileges(role).await?);
        }
        Ok(loaded)
    }

    pub async fn privileges_of(&self, role_id: i64) -> Result<Vec<Privilege>, sqlx_core::Error> {
        query_as!(
            Privilege,
            r#"
            SELECT p.id, p.name, p.created_at
            FROM privileges p
            JOIN role_privileges rp ON rp.privilege_id = p.id
            WHERE rp.role_id = ?1
            ORDER BY p.id
            "#,
            role_id
        )
        .fetch_all(&self.pool)
        .await
    }

    pub(crate) async fn with_privileges(&self, mut role: Role) -> Result<Role, sqlx_core::Error> {
        role.privileges = self.privileges_of(role.id).await?;
        Ok(role)
    }
}

#[async_trait]
impl RoleStore for RoleRepo {
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Role>> {
        self.get_by_name(name)
            .await
            .map_err(|err| store_error(err, name))
    }

    async fn create(&self, role: NewRole) -> StoreResult<Role> {
        self.insert(&role.name, &role.privileges)
            .await
            .map_err(|err| store_error(err, &role.name))
    }

    async fn delete_all(&self) -> StoreResult<u64> {
        self.purge().await.map_err(StoreError::backend)
    }
}

#[async_trait]
impl ListingStore<Role> for RoleRepo {
    async fn fetch(&self, order: Option<SortOrder>, window: Option<Window>) -> StoreResult<Vec<Role>> {
        self.list(
            order.unwrap_or_else(SortOrder::by_id),
            window.unwrap_or_else(unbounded),
        )
        .await
        .map_err(StoreError::backend)
    }
}
