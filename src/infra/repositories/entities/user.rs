//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Role, User};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::role::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_role::Relation::Role.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::user_role::Relation::User.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model plus its role rows to the domain entity
impl From<(Model, Vec<super::role::Model>)> for User {
    fn from((model, roles): (Model, Vec<super::role::Model>)) -> Self {
        User {
            id: model.id,
            username: model.username,
            password_hash: model.password_hash,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            roles: roles.into_iter().map(Role::from).collect(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
