//! Application ports and resolution services for RBAC persistence.

#![forbid(unsafe_code)]

mod access_control;
mod ports;
mod resolvers;

pub use access_control::AccessControl;
pub use ports::{
    NewPermission, NewRole, NewUser, PasswordHasher, PermissionRepository, RoleRepository,
    UserRepository, validate_page,
};
pub use resolvers::{PermissionResolver, RoleResolver, UserResolver};
