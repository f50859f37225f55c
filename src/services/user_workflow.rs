//! User workflow - Business rules behind signup and user management.
//!
//! SOLID (SRP): Handles user management use cases only.
//! DDD: Uses domain Password value object for hashing.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::config::ROLE_USER;
use crate::domain::{NewUser, Password, Role, User, UserUpdate};
use crate::errors::AppError;
use crate::infra::{RoleRepository, UserRepository};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Failure of a user workflow operation.
///
/// Field-level failures name the form field that caused them so the
/// page that collected the input can annotate it; everything else is a
/// general message for a banner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// Failure attributable to a single form field
    #[error("{message}")]
    Field { field: &'static str, message: String },

    /// Failure with no single owning field
    #[error("{0}")]
    General(String),

    /// The target user does not exist
    #[error("User not found")]
    NotFound,
}

/// Result type alias for workflow operations
pub type WorkflowResult<T> = Result<T, WorkflowError>;

impl From<AppError> for WorkflowError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::NotFound => WorkflowError::NotFound,
            AppError::Validation(message) | AppError::BadRequest(message) => {
                WorkflowError::General(message)
            }
            AppError::Database(e) => {
                tracing::error!("Database error in user workflow: {:?}", e);
                WorkflowError::General("A database error occurred".to_string())
            }
            AppError::Internal(message) => {
                tracing::error!("Internal error in user workflow: {}", message);
                WorkflowError::General("An internal error occurred".to_string())
            }
        }
    }
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::NotFound => AppError::NotFound,
            WorkflowError::Field { message, .. } => AppError::Validation(message),
            WorkflowError::General(message) => AppError::Internal(message),
        }
    }
}

/// User workflow trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserWorkflow: Send + Sync {
    /// Register a new user
    async fn create_user(&self, new_user: NewUser) -> WorkflowResult<User>;

    /// Update profile fields and roles of an existing user
    async fn update_user(&self, update: UserUpdate) -> WorkflowResult<()>;

    /// Delete user by ID
    async fn delete_user(&self, id: i64) -> WorkflowResult<()>;

    /// Get user by ID
    async fn get_user(&self, id: i64) -> WorkflowResult<User>;

    /// List all users
    async fn list_users(&self) -> WorkflowResult<Vec<User>>;
}

/// Concrete implementation of UserWorkflow.
pub struct UserManager {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
}

impl UserManager {
    /// Create new workflow instance
    pub fn new(users: Arc<dyn UserRepository>, roles: Arc<dyn RoleRepository>) -> Self {
        Self { users, roles }
    }

    /// Resolve role names to stored roles; empty input falls back to the default role
    async fn resolve_roles(&self, mut names: Vec<String>) -> WorkflowResult<Vec<Role>> {
        names.sort();
        names.dedup();
        if names.is_empty() {
            names.push(ROLE_USER.to_string());
        }

        let mut roles = Vec::with_capacity(names.len());
        for name in names {
            let role = self
                .roles
                .find_by_name(&name)
                .await?
                .ok_or_else(|| WorkflowError::General(format!("Unknown role: {}", name)))?;
            roles.push(role);
        }

        Ok(roles)
    }
}

#[async_trait]
impl UserWorkflow for UserManager {
    async fn create_user(&self, new_user: NewUser) -> WorkflowResult<User> {
        let NewUser {
            profile,
            password,
            roles,
        } = new_user;

        if self
            .users
            .find_by_username(&profile.username)
            .await?
            .is_some()
        {
            return Err(WorkflowError::Field {
                field: "username",
                message: "Username is not available".to_string(),
            });
        }

        let password = password.unwrap_or_default();
        if password.is_empty() {
            return Err(WorkflowError::Field {
                field: "password",
                message: "Password is required".to_string(),
            });
        }

        // DDD: Use Password value object for hashing
        let password_hash = match Password::new(&password) {
            Ok(hashed) => hashed.into_string(),
            Err(AppError::Validation(message)) => {
                return Err(WorkflowError::Field {
                    field: "password",
                    message,
                })
            }
            Err(other) => return Err(WorkflowError::from(other)),
        };

        let roles = self.resolve_roles(roles).await?;
        Ok(self.users.create(profile, password_hash, roles).await?)
    }

    async fn update_user(&self, update: UserUpdate) -> WorkflowResult<()> {
        let UserUpdate { id, profile, roles } = update;

        if self.users.find_by_id(id).await?.is_none() {
            return Err(WorkflowError::General(
                "No user exists with that id".to_string(),
            ));
        }

        // The username stays unique across users; keeping your own is fine
        if let Some(other) = self.users.find_by_username(&profile.username).await? {
            if other.id != id {
                return Err(WorkflowError::General(
                    "Username is not available".to_string(),
                ));
            }
        }

        let roles = self.resolve_roles(roles).await?;
        match self.users.update(id, profile, roles).await {
            Ok(_) => Ok(()),
            Err(AppError::NotFound) => Err(WorkflowError::General(
                "No user exists with that id".to_string(),
            )),
            Err(err) => Err(WorkflowError::from(err)),
        }
    }

    async fn delete_user(&self, id: i64) -> WorkflowResult<()> {
        if self.users.find_by_id(id).await?.is_none() {
            return Err(WorkflowError::NotFound);
        }

        Ok(self.users.delete(id).await?)
    }

    async fn get_user(&self, id: i64) -> WorkflowResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(WorkflowError::NotFound)
    }

    async fn list_users(&self) -> WorkflowResult<Vec<User>> {
        Ok(self.users.list().await?)
    }
}
