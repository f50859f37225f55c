//! Service Container - Centralized service wiring.
//!
//! SOLID (SRP): Manages service lifecycle and access.
//! SOLID (DIP): Depends on service traits, not implementations.

use std::sync::Arc;

use super::{UserManager, UserWorkflow};
use crate::infra::{RoleRepository, RoleStore, UserStore};

/// Holds the wired application services
pub struct Services {
    workflow: Arc<dyn UserWorkflow>,
    roles: Arc<dyn RoleRepository>,
}

impl Services {
    /// Create a new service container from already-built parts
    pub fn new(workflow: Arc<dyn UserWorkflow>, roles: Arc<dyn RoleRepository>) -> Self {
        Self { workflow, roles }
    }

    /// Create service container from a database connection
    pub fn from_connection(db: sea_orm::DatabaseConnection) -> Self {
        let users = Arc::new(UserStore::new(db.clone()));
        let roles: Arc<dyn RoleRepository> = Arc::new(RoleStore::new(db));
        let workflow = Arc::new(UserManager::new(users, roles.clone()));

        Self { workflow, roles }
    }

    /// Get user workflow service
    pub fn workflow(&self) -> Arc<dyn UserWorkflow> {
        self.workflow.clone()
    }

    /// Get role repository
    pub fn roles(&self) -> Arc<dyn RoleRepository> {
        self.roles.clone()
    }
}
