//! Names of the records the bootstrap seeder creates when no seed set is
//! configured.

pub mod privileges {
    pub const USER_WRITE: &str = "user:write";
    pub const ROLE_WRITE: &str = "role:write";
}

pub mod roles {
    pub const ADMIN: &str = "admin";
}

pub mod principals {
    pub const ADMIN_USERNAME: &str = "admin";
    pub const ADMIN_PASSWORD: &str = "adminpass";
}
