//! Repository and collaborator ports implemented by storage adapters.

mod inputs;
mod paging;
mod password;
mod permissions;
mod roles;
mod users;

pub use inputs::{NewPermission, NewRole, NewUser};
pub use paging::validate_page;
pub use password::PasswordHasher;
pub use permissions::PermissionRepository;
pub use roles::RoleRepository;
pub use users::UserRepository;
