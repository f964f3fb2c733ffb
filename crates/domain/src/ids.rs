use serde::{Deserialize, Serialize};

/// Unique identifier for a persisted user record.
///
/// Identity keys are assigned by the store on first insert and never change
/// afterwards. A value of this type always refers to a persisted row;
/// not-yet-inserted users are described by input records instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(i64);

/// Unique identifier for a persisted role record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleId(i64);

/// Unique identifier for a persisted permission record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PermissionId(i64);

macro_rules! id_impls {
    ($name:ident) => {
        impl $name {
            /// Creates an identifier from a store-assigned key.
            #[must_use]
            pub fn from_i64(value: i64) -> Self {
                Self(value)
            }

            /// Returns the underlying key value.
            #[must_use]
            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }
    };
}

id_impls!(UserId);
id_impls!(RoleId);
id_impls!(PermissionId);
