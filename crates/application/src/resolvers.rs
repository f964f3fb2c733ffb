//! Extended-aggregate resolvers.
//!
//! Each resolver composes the three repository ports: for every base row it
//! pulls, it re-invokes the sibling repositories to embed the related
//! collections. Mutation operations write one relation row and then
//! re-fetch the affected aggregate, returning the fresh state to the
//! caller.

mod permission;
mod role;
mod user;

#[cfg(test)]
mod tests;

pub use permission::PermissionResolver;
pub use role::RoleResolver;
pub use user::UserResolver;
