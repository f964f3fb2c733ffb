use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ids::UserId;
use crate::permission::PermissionGrant;
use crate::role::Role;

/// A persisted user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identity key.
    pub id: UserId,
    /// External-facing identifier, safe to expose outside the store.
    pub uuid: Uuid,
    /// Unique account name.
    pub name: String,
    /// Contact email address.
    pub email: String,
    /// Free-form description.
    pub description: String,
    /// Opaque credential hash; the hashing algorithm lives behind the
    /// password hasher port and is never inspected here.
    pub password_hash: String,
    /// Whether the account is active.
    pub active: bool,
    /// Row creation timestamp.
    pub created: DateTime<Utc>,
    /// Last modification timestamp.
    pub last_update: DateTime<Utc>,
}

/// A user together with its resolved role memberships and effective
/// permission grants.
///
/// The permission list carries one entry per resolution path: a permission
/// held both directly and through a role appears twice with different
/// provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserExtended {
    /// The base user record.
    pub user: User,
    /// Roles the user belongs to.
    pub roles: Vec<Role>,
    /// Effective permissions, one entry per provenance path.
    pub permissions: Vec<PermissionGrant>,
}

impl UserExtended {
    /// Returns whether any grant (direct or inherited) carries the name.
    #[must_use]
    pub fn holds_permission(&self, name: &str) -> bool {
        self.permissions
            .iter()
            .any(|grant| grant.permission.name == name)
    }
}
