//! Web layer - Routes, controller, forms and server-rendered views.

pub mod binding;
pub mod controller;
pub mod extractors;
pub mod forms;
pub mod pages;
pub mod routes;
pub mod state;
pub mod views;

pub use controller::UserController;
pub use pages::HtmlPages;
pub use routes::create_router;
pub use state::AppState;
pub use views::{View, ViewRenderer};
