//! User repository implementation over the users, roles and user_roles tables.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};

use super::entities::{role, user, user_role};
use crate::domain::{Role, User, UserProfile};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Every loaded user carries its full set of roles.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Find user by username
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// List all users ordered by ID
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Create a new user and link it to the given roles
    async fn create(
        &self,
        profile: UserProfile,
        password_hash: String,
        roles: Vec<Role>,
    ) -> AppResult<User>;

    /// Update profile fields and replace role links; the password hash is left untouched
    async fn update(&self, id: i64, profile: UserProfile, roles: Vec<Role>) -> AppResult<User>;

    /// Delete user by ID
    async fn delete(&self, id: i64) -> AppResult<()>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert link rows for the user inside the given transaction
    async fn link_roles(txn: &DatabaseTransaction, user_id: i64, roles: &[Role]) -> AppResult<()> {
        if roles.is_empty() {
            return Ok(());
        }

        let links = roles.iter().map(|role| user_role::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(role.id),
        });

        user_role::Entity::insert_many(links)
            .exec(txn)
            .await
            .map_err(AppError::from)?;

        Ok(())
    }
}

/// Map a joined row to the domain entity, with roles in a stable order
fn into_domain((model, mut roles): (user::Model, Vec<role::Model>)) -> User {
    roles.sort_by_key(|role| role.id);
    User::from((model, roles))
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let rows = user::Entity::find_by_id(id)
            .find_with_related(role::Entity)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(rows.into_iter().next().map(into_domain))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let rows = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .find_with_related(role::Entity)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(rows.into_iter().next().map(into_domain))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let rows = user::Entity::find()
            .find_with_related(role::Entity)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(rows.into_iter().map(into_domain).collect())
    }

    async fn create(
        &self,
        profile: UserProfile,
        password_hash: String,
        mut roles: Vec<Role>,
    ) -> AppResult<User> {
        let now = chrono::Utc::now();
        let txn = self.db.begin().await.map_err(AppError::from)?;

        let active_model = user::ActiveModel {
            username: Set(profile.username),
            password_hash: Set(password_hash),
            first_name: Set(profile.first_name),
            last_name: Set(profile.last_name),
            email: Set(profile.email),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(&txn).await.map_err(AppError::from)?;
        Self::link_roles(&txn, model.id, &roles).await?;
        txn.commit().await.map_err(AppError::from)?;

        roles.sort_by_key(|role| role.id);
        Ok(User {
            id: model.id,
            username: model.username,
            password_hash: model.password_hash,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            roles,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    async fn update(&self, id: i64, profile: UserProfile, mut roles: Vec<Role>) -> AppResult<User> {
        let txn = self.db.begin().await.map_err(AppError::from)?;

        let user = user::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_not_found()?;

        let mut active: user::ActiveModel = user.into();
        active.username = Set(profile.username);
        active.first_name = Set(profile.first_name);
        active.last_name = Set(profile.last_name);
        active.email = Set(profile.email);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&txn).await.map_err(AppError::from)?;

        user_role::Entity::delete_many()
            .filter(user_role::Column::UserId.eq(id))
            .exec(&txn)
            .await
            .map_err(AppError::from)?;
        Self::link_roles(&txn, id, &roles).await?;

        txn.commit().await.map_err(AppError::from)?;

        roles.sort_by_key(|role| role.id);
        Ok(User {
            id: model.id,
            username: model.username,
            password_hash: model.password_hash,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            roles,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        // Link rows are removed by the ON DELETE CASCADE on user_roles
        let result = user::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
