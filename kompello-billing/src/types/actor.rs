//! The user on whose behalf operations run

use serde::{Deserialize, Serialize};

use super::ids::UserId;

/// Authenticated caller. Admins bypass company membership checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user: UserId,
    #[serde(default)]
    pub is_admin: bool,
}

impl Actor {
    pub fn user(id: impl Into<UserId>) -> Self {
        Self {
            user: id.into(),
            is_admin: false,
        }
    }

    pub fn admin(id: impl Into<UserId>) -> Self {
        Self {
            user: id.into(),
            is_admin: true,
        }
    }

    /// Internal actor for maintenance tasks and tooling.
    pub fn system() -> Self {
        Self::admin("system")
    }
}
