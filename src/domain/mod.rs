//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.
//!
//! Contains: Entities, Value Objects.

pub mod password;
pub mod role;
pub mod user;

pub use password::Password;
pub use role::Role;
pub use user::{NewUser, User, UserProfile, UserUpdate};
