//! Role reference entity.

use serde::{Deserialize, Serialize};

/// Immutable reference data: looked up by name, never created or
/// destroyed by this application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
}
