use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::RoleId;
use crate::permission::Permission;
use crate::user::User;

/// A persisted role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Store-assigned identity key.
    pub id: RoleId,
    /// Unique role name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Whether the role is active.
    pub active: bool,
    /// Row creation timestamp.
    pub created: DateTime<Utc>,
    /// Last modification timestamp.
    pub last_update: DateTime<Utc>,
}

/// A role together with its member users and granted permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleExtended {
    /// The base role record.
    pub role: Role,
    /// Users belonging to the role.
    pub users: Vec<User>,
    /// Permissions granted to the role.
    pub permissions: Vec<Permission>,
}

impl RoleExtended {
    /// Returns whether the role grants the named permission.
    #[must_use]
    pub fn grants_permission(&self, name: &str) -> bool {
        self.permissions
            .iter()
            .any(|permission| permission.name == name)
    }

    /// Returns whether the named user is a member of the role.
    #[must_use]
    pub fn has_member(&self, name: &str) -> bool {
        self.users.iter().any(|user| user.name == name)
    }
}
