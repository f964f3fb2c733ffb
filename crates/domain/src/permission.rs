use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rolevault_core::hash::sha256_hex;

use crate::ids::{PermissionId, RoleId, UserId};
use crate::role::Role;
use crate::user::User;

/// A persisted permission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    /// Store-assigned identity key.
    pub id: PermissionId,
    /// Unique permission name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Row creation timestamp.
    pub created: DateTime<Utc>,
    /// Last modification timestamp.
    pub last_update: DateTime<Utc>,
}

/// How a permission reached the user under resolution.
///
/// The marker is computed per query, not stored on the permission row: the
/// same permission resolves as `Direct` for one user and `ViaRole` for
/// another. On the wire it is a single integer column where zero means a
/// direct grant and any other value is the originating role key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provenance {
    /// Granted by a junction row naming the user itself.
    Direct,
    /// Inherited through membership in the recorded role.
    ViaRole(RoleId),
}

impl Provenance {
    /// Decodes the integer marker used by the store.
    #[must_use]
    pub fn from_marker(marker: i64) -> Self {
        if marker == 0 {
            Self::Direct
        } else {
            Self::ViaRole(RoleId::from_i64(marker))
        }
    }

    /// Encodes the integer marker used by the store.
    #[must_use]
    pub fn marker(&self) -> i64 {
        match self {
            Self::Direct => 0,
            Self::ViaRole(role_id) => role_id.as_i64(),
        }
    }
}

/// One resolved permission path for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    /// The granted permission.
    pub permission: Permission,
    /// The path it was resolved through.
    pub provenance: Provenance,
}

/// A permission together with the users and roles that hold it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionExtended {
    /// The base permission record.
    pub permission: Permission,
    /// Users holding the permission directly or through a role.
    pub users: Vec<User>,
    /// Roles the permission is granted to.
    pub roles: Vec<Role>,
}

/// Computes the membership token for a (user, permission) pair.
///
/// Tokens are permission-centric: a grant inherited through a role hashes
/// the permission key, never the role key, so direct and role paths
/// collapse to the same token. The store computes the same digest in SQL
/// when building the effective token set.
#[must_use]
pub fn permission_token(user_id: UserId, permission_id: PermissionId) -> String {
    sha256_hex(&format!("{user_id}.{permission_id}"))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::ids::{PermissionId, UserId};

    use super::{Provenance, permission_token};

    #[test]
    fn zero_marker_decodes_as_direct() {
        assert_eq!(Provenance::from_marker(0), Provenance::Direct);
        assert_eq!(Provenance::Direct.marker(), 0);
    }

    #[test]
    fn token_is_stable_for_a_pair() {
        let left = permission_token(UserId::from_i64(1), PermissionId::from_i64(2));
        let right = permission_token(UserId::from_i64(1), PermissionId::from_i64(2));
        assert_eq!(left, right);
    }

    #[test]
    fn token_distinguishes_users() {
        let left = permission_token(UserId::from_i64(1), PermissionId::from_i64(2));
        let right = permission_token(UserId::from_i64(2), PermissionId::from_i64(2));
        assert_ne!(left, right);
    }

    proptest! {
        #[test]
        fn nonzero_markers_round_trip(role_key in 1_i64..i64::MAX) {
            let provenance = Provenance::from_marker(role_key);
            prop_assert_eq!(provenance.marker(), role_key);
        }

        #[test]
        fn tokens_are_64_hex_chars(user_key in 1_i64..i64::MAX, permission_key in 1_i64..i64::MAX) {
            let token = permission_token(
                UserId::from_i64(user_key),
                PermissionId::from_i64(permission_key),
            );
            prop_assert_eq!(token.len(), 64);
            prop_assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }
}
