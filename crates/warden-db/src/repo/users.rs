use super::prelude::*;
use warden_core::{NewUser, Role, User, UserCredentials, UserStore};
use warden_crypto::{hash_password, KdfParams};

use super::RoleRepo;

/// User persistence. Owns the credential hashing policy: callers hand in raw
/// passwords and only PHC hashes are stored.
#[derive(Clone)]
pub struct UserRepo {
    pool: SqlitePool,
    roles: RoleRepo,
    kdf: KdfParams,
}

impl UserRepo {
    pub fn new(pool: SqlitePool, kdf: KdfParams) -> Self {
        Self {
            roles: RoleRepo::new(pool.clone()),
            pool,
            kdf,
        }
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<User>, sqlx_core::Error> {
        let user = query_as!(
            User,
            r#"
            SELECT id, name, created_at
            FROM users
            WHERE name = ?1
            "#,
            name
        )
        .fetch_optional(&self.pool)
        .await?;
        match user {
            Some(user) => Ok(Some(self.with_roles(user).await?)),
            None => Ok(None),
        }
    }

    pub async fn get_credentials(
        &self,
        name: &str,
    ) -> Result<Option<UserCredentials>, sqlx_core::Error> {
        query_as!(
            UserCredentials,
            r#"
            SELECT id, name, password_hash
            FROM users
            WHERE name = ?1
            "#,
            name
        )
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn insert(
        &self,
        name: &str,
        password_hash: &str,
        roles: &[Role],
    ) -> Result<User, sqlx_core::Error> {
        let created_at = Utc::now();
        let mut tx = self.pool.begin().await?;
        let result = query!(
            r#"
            INSERT INTO users (name, password_hash, created_at)
            VALUES (?1, ?2, ?3)
            "#,
            name,
            password_hash,
            created_at
        )
        .execute(&mut *tx)
        .await?;
        let user_id = result.last_insert_rowid();
        for role in roles {
            query!(
                r#"
                INSERT OR IGNORE INTO user_roles (user_id, role_id)
                VALUES (?1, ?2)
                "#,
                user_id,
                role.id
            )
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        let user = User {
            id: user_id,
            name: name.to_string(),
            roles: Vec::new(),
            created_at,
        };
        self.with_roles(user).await
    }

    pub async fn purge(&self) -> Result<u64, sqlx_core::Error> {
        let deleted = query!(r#"DELETE FROM users"#)
            .execute(&self.pool)
            .await?
            .rows_affected();
        tracing::debug!(event = "users_purged", deleted);
        Ok(deleted)
    }

    pub async fn list(&self, order: SortOrder, window: Window) -> Result<Vec<User>, sqlx_core::Error> {
        let sql = format!(
            r#"
            SELECT id, name, created_at
            FROM users
            ORDER BY {}
            LIMIT ?1 OFFSET ?2
            "#,
            order.to_sql()
        );
        let users = query_as!(User, &sql, window.limit, window.offset)
            .fetch_all(&self.pool)
            .await?;
        let mut loaded = Vec::with_capacity(users.len());
        for user in users {
            loaded.push(self.with_roles(user).await?);
        }
        Ok(loaded)
    }

    async fn with_roles(&self, mut user: User) -> Result<User, sqlx_core::Error> {
        let roles = query_as!(
            Role,
            r#"
            SELECT r.id, r.name, r.created_at
            FROM roles r
            JOIN user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = ?1
            ORDER BY r.id
            "#,
            user.id
        )
        .fetch_all(&self.pool)
        .await?;
        let mut loaded = Vec::with_capacity(roles.len());
        for role in roles {
            loaded.push(self.roles.with_privileges(role).await?);
        }
        user.roles = loaded;
        Ok(user)
    }
}

#[async_trait]
impl UserStore for UserRepo {
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<User>> {
        self.get_by_name(name)
            .await
            .map_err(|err| store_error(err, name))
    }

    async fn create(&self, user: NewUser) -> StoreResult<User> {
        let params = self.kdf;
        let password = user.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password, &params))
            .await
            .map_err(|err| StoreError::Credential(err.to_string()))?
            .map_err(|err| StoreError::Credential(err.to_string()))?;
        self.insert(&user.name, &password_hash, &user.roles)
            .await
            .map_err(|err| store_error(err, &user.name))
    }

    async fn delete_all(&self) -> StoreResult<u64> {
        self.purge().await.map_err(StoreError::backend)
    }

    async fn find_credentials(&self, name: &str) -> StoreResult<Option<UserCredentials>> {
        self.get_credentials(name)
            .await
            .map_err(|err| store_error(err, name))
    }
}

#[async_trait]
impl ListingStore<User> for UserRepo {
    async fn fetch(&self, order: Option<SortOrder>, window: Option<Window>) -> StoreResult<Vec<User>> {
        self.list(
            order.unwrap_or_else(SortOrder::by_id),
            window.unwrap_or_else(unbounded),
        )
        .await
        .map_err(StoreError::backend)
    }
}
