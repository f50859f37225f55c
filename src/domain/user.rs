//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::role::Role;

/// User domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Assigned roles; non-empty for every persisted user
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check whether the user carries a role with the given name
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|role| role.name == name)
    }
}

/// Profile fields shared by creation and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// User creation intent carried from the form layer into the workflow
#[derive(Debug, Clone)]
pub struct NewUser {
    pub profile: UserProfile,
    /// Raw password; hashed before it ever reaches the store
    pub password: Option<String>,
    /// Selected role names; empty selections fall back to the default role
    pub roles: Vec<String>,
}

/// User update intent; carries no credential material
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub id: i64,
    pub profile: UserProfile,
    pub roles: Vec<String>,
}
