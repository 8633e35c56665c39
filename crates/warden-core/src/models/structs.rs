use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::listing::{Entity, Sortable};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Privilege {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    /// Ordered by privilege id, one entry per privilege.
    pub privileges: Vec<Privilege>,
    pub created_at: DateTime<Utc>,
}

impl Role {
    #[must_use]
    pub fn privilege_names(&self) -> Vec<&str> {
        self.privileges.iter().map(|p| p.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
}

impl User {
    #[must_use]
    pub fn role_names(&self) -> Vec<&str> {
        self.roles.iter().map(|r| r.name.as_str()).collect()
    }
}

/// Stored credential of a user. Never leaves the server.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: i64,
    pub name: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewPrivilege {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct NewRole {
    pub name: String,
    pub privileges: Vec<Privilege>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    /// Raw secret; the user store decides how it is hashed.
    pub password: String,
    pub roles: Vec<Role>,
}

impl Entity for Privilege {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Entity for Role {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Entity for User {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Sortable for Privilege {
    const SORT_FIELDS: &'static [&'static str] = &["id", "name", "created_at"];
}

impl Sortable for Role {
    const SORT_FIELDS: &'static [&'static str] = &["id", "name", "created_at"];
}

impl Sortable for User {
    const SORT_FIELDS: &'static [&'static str] = &["id", "name", "created_at"];
}
