use serde::{Deserialize, Serialize};

use crate::constants::{principals, privileges, roles};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivilegeSeed {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSeed {
    pub name: String,
    #[serde(default)]
    pub privileges: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSeed {
    pub login: String,
    pub password: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Records created by the bootstrap seeder, in dependency order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedConfig {
    #[serde(default)]
    pub privileges: Vec<PrivilegeSeed>,
    #[serde(default)]
    pub roles: Vec<RoleSeed>,
    #[serde(default)]
    pub users: Vec<UserSeed>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            privileges: vec![
                PrivilegeSeed {
                    name: privileges::USER_WRITE.to_string(),
                },
                PrivilegeSeed {
                    name: privileges::ROLE_WRITE.to_string(),
                },
            ],
            roles: vec![RoleSeed {
                name: roles::ADMIN.to_string(),
                privileges: vec![
                    privileges::USER_WRITE.to_string(),
                    privileges::ROLE_WRITE.to_string(),
                ],
            }],
            users: vec![UserSeed {
                login: principals::ADMIN_USERNAME.to_string(),
                password: principals::ADMIN_PASSWORD.to_string(),
                roles: vec![roles::ADMIN.to_string()],
            }],
        }
    }
}

impl SeedConfig {
    /// Role references that name no declared privilege, as `(role, privilege)`.
    #[must_use]
    pub fn undeclared_privileges(&self) -> Vec<(&str, &str)> {
        self.roles
            .iter()
            .flat_map(|role| {
                role.privileges
                    .iter()
                    .filter(|name| !self.privileges.iter().any(|p| &p.name == *name))
                    .map(move |name| (role.name.as_str(), name.as_str()))
            })
            .collect()
    }

    /// User references that name no declared role, as `(login, role)`.
    #[must_use]
    pub fn undeclared_roles(&self) -> Vec<(&str, &str)> {
        self.users
            .iter()
            .flat_map(|user| {
                user.roles
                    .iter()
                    .filter(|name| !self.roles.iter().any(|r| &r.name == *name))
                    .map(move |name| (user.login.as_str(), name.as_str()))
            })
            .collect()
    }
}
