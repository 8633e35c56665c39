use std::collections::BTreeSet;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};
use warden_core::{
    NewPrivilege, NewRole, NewUser, Privilege, PrivilegeStore, Role, RoleStore, SeedConfig,
    StoreError, User, UserStore,
};

use crate::infra::metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedState {
    NotStarted,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded,
    AlreadyDone,
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("seeded role references missing privilege {0}")]
    MissingPrivilege(String),
    #[error("seeded user references missing role {0}")]
    MissingRole(String),
}

/// Wipes and recreates the configured privileges, roles and users the first
/// time the host reports it is ready.
///
/// The state mutex is held for the whole run, so concurrent ready signals
/// wait for the first one and then observe [`SeedState::Done`].
pub struct Seeder {
    privileges: Arc<dyn PrivilegeStore>,
    roles: Arc<dyn RoleStore>,
    users: Arc<dyn UserStore>,
    config: SeedConfig,
    state: Mutex<SeedState>,
}

impl Seeder {
    pub fn new(
        privileges: Arc<dyn PrivilegeStore>,
        roles: Arc<dyn RoleStore>,
        users: Arc<dyn UserStore>,
        config: SeedConfig,
    ) -> Self {
        Self {
            privileges,
            roles,
            users,
            config,
            state: Mutex::new(SeedState::NotStarted),
        }
    }

    pub async fn state(&self) -> SeedState {
        *self.state.lock().await
    }

    /// Ready signal. Only the first successful call touches the stores; a
    /// failed run leaves the state at [`SeedState::NotStarted`].
    pub async fn on_ready(&self) -> Result<SeedOutcome, SeedError> {
        let mut state = self.state.lock().await;
        if *state == SeedState::Done {
            tracing::debug!(event = "seed_skipped", "Seed already completed");
            metrics::seed_run("skipped");
            return Ok(SeedOutcome::AlreadyDone);
        }

        match self.run().await {
            Ok(()) => {
                *state = SeedState::Done;
                metrics::seed_run("seeded");
                Ok(SeedOutcome::Seeded)
            }
            Err(err) => {
                metrics::seed_run("failed");
                Err(err)
            }
        }
    }

    #[instrument(skip(self))]
    async fn run(&self) -> Result<(), SeedError> {
        let privileges_removed = self.privileges.delete_all().await?;
        let roles_removed = self.roles.delete_all().await?;
        let users_removed = self.users.delete_all().await?;
        info!(
            event = "seed_reset",
            privileges = privileges_removed,
            roles = roles_removed,
            users = users_removed,
            "Cleared access-control records"
        );

        for seed in &self.config.privileges {
            self.create_privilege_if_not_existing(&seed.name).await?;
        }

        for seed in &self.config.roles {
            let mut privileges = Vec::with_capacity(seed.privileges.len());
            for name in &seed.privileges {
                let privilege = self
                    .privileges
                    .find_by_name(name)
                    .await?
                    .ok_or_else(|| SeedError::MissingPrivilege(name.clone()))?;
                if !privileges.iter().any(|p: &Privilege| p.id == privilege.id) {
                    privileges.push(privilege);
                }
            }
            self.create_role_if_not_existing(&seed.name, privileges)
                .await?;
        }

        for seed in &self.config.users {
            let mut roles = Vec::with_capacity(seed.roles.len());
            for name in &seed.roles {
                let role = self
                    .roles
                    .find_by_name(name)
                    .await?
                    .ok_or_else(|| SeedError::MissingRole(name.clone()))?;
                if !roles.iter().any(|r: &Role| r.id == role.id) {
                    roles.push(role);
                }
            }
            self.create_principal_if_not_existing(&seed.login, &seed.password, roles)
                .await?;
        }

        info!(
            event = "seed_completed",
            privileges = self.config.privileges.len(),
            roles = self.config.roles.len(),
            users = self.config.users.len(),
            "Bootstrap seed completed"
        );
        Ok(())
    }

    pub async fn create_privilege_if_not_existing(
        &self,
        name: &str,
    ) -> Result<Privilege, SeedError> {
        if let Some(existing) = self.privileges.find_by_name(name).await? {
            return Ok(existing);
        }
        let privilege = self
            .privileges
            .create(NewPrivilege {
                name: name.to_string(),
            })
            .await?;
        info!(event = "privilege_created", privilege = %privilege.name, id = privilege.id);
        Ok(privilege)
    }

    /// An existing role keeps its stored privileges.
    pub async fn create_role_if_not_existing(
        &self,
        name: &str,
        privileges: Vec<Privilege>,
    ) -> Result<Role, SeedError> {
        if let Some(existing) = self.roles.find_by_name(name).await? {
            let stored: BTreeSet<i64> = existing.privileges.iter().map(|p| p.id).collect();
            let intended: BTreeSet<i64> = privileges.iter().map(|p| p.id).collect();
            if stored != intended {
                warn!(
                    event = "role_privileges_drift",
                    role = %existing.name,
                    stored = ?existing.privilege_names(),
                    intended = ?privileges.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
                    "Existing role left untouched"
                );
            }
            return Ok(existing);
        }
        let role = self
            .roles
            .create(NewRole {
                name: name.to_string(),
                privileges,
            })
            .await?;
        info!(
            event = "role_created",
            role = %role.name,
            id = role.id,
            privileges = ?role.privilege_names()
        );
        Ok(role)
    }

    pub async fn create_principal_if_not_existing(
        &self,
        login: &str,
        password: &str,
        roles: Vec<Role>,
    ) -> Result<User, SeedError> {
        if let Some(existing) = self.users.find_by_name(login).await? {
            return Ok(existing);
        }
        let user = self
            .users
            .create(NewUser {
                name: login.to_string(),
                password: password.to_string(),
                roles,
            })
            .await?;
        info!(
            event = "user_created",
            user = %user.name,
            id = user.id,
            roles = ?user.role_names()
        );
        Ok(user)
    }
}
