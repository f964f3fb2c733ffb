//! Domain types for role-based access control persistence.
//!
//! Users, roles, and permissions are related through three many-to-many
//! relationships: user membership in roles, permission grants to roles, and
//! permission grants directly to users. A user's effective permissions are
//! the union of direct grants and grants inherited through role membership.

#![forbid(unsafe_code)]

mod ids;
mod permission;
mod role;
mod user;

pub use ids::{PermissionId, RoleId, UserId};
pub use permission::{
    Permission, PermissionExtended, PermissionGrant, Provenance, permission_token,
};
pub use role::{Role, RoleExtended};
pub use user::{User, UserExtended};
