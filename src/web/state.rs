//! Application state - Dependency injection container.
//!
//! Provides centralized access to the controller, renderer and database.

use std::sync::Arc;

use crate::infra::Database;
use crate::services::Services;
use crate::web::controller::UserController;
use crate::web::pages::HtmlPages;
use crate::web::views::ViewRenderer;

/// Application state shared by every route handler.
#[derive(Clone)]
pub struct AppState {
    /// Page controller
    pub controller: Arc<UserController>,
    /// View renderer
    pub renderer: Arc<dyn ViewRenderer>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from a connected database.
    pub fn from_config(database: Arc<Database>) -> Self {
        let services = Services::from_connection(database.get_connection());
        let controller = Arc::new(UserController::new(services.workflow(), services.roles()));

        Self {
            controller,
            renderer: Arc::new(HtmlPages::new()),
            database,
        }
    }
}
