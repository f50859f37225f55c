//! User Management - A server-rendered user administration app
//!
//! This crate provides signup, listing, editing and deletion of user
//! accounts with role assignment, rendered through server-side HTML
//! forms on Axum, following DDD, SOLID, and DRY principles.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and logic
//! - **services**: Application use cases and business logic
//! - **infra**: Infrastructure concerns (database, repositories)
//! - **web**: Routes, controller, forms and server-rendered views
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod web;

// Re-export commonly used types at crate root
pub use config::Config;
pub use domain::{Password, Role, User};
pub use errors::{AppError, AppResult};
pub use web::AppState;
