use uuid::Uuid;

use rolevault_core::{AppResult, NonEmptyString};

/// Input payload for creating a user.
///
/// Input records describe not-yet-persisted entities; the store assigns the
/// identity key on insert and returns the hydrated record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// External-facing identifier.
    pub uuid: Uuid,
    /// Unique account name.
    pub name: String,
    /// Contact email address.
    pub email: String,
    /// Free-form description.
    pub description: String,
    /// Opaque credential hash produced by the password hasher.
    pub password_hash: String,
}

impl NewUser {
    /// Builds a validated payload, rejecting blank names and emails.
    pub fn new(
        uuid: Uuid,
        name: impl Into<String>,
        email: impl Into<String>,
        description: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> AppResult<Self> {
        let name = NonEmptyString::new(name)?;
        let email = NonEmptyString::new(email)?;

        Ok(Self {
            uuid,
            name: name.into(),
            email: email.into(),
            description: description.into(),
            password_hash: password_hash.into(),
        })
    }
}

/// Input payload for creating a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRole {
    /// Unique role name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Whether the role starts active.
    pub active: bool,
}

impl NewRole {
    /// Builds a validated payload, rejecting blank names.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        active: bool,
    ) -> AppResult<Self> {
        let name = NonEmptyString::new(name)?;

        Ok(Self {
            name: name.into(),
            description: description.into(),
            active,
        })
    }
}

/// Input payload for creating a permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPermission {
    /// Unique permission name.
    pub name: String,
    /// Free-form description.
    pub description: String,
}

impl NewPermission {
    /// Builds a validated payload, rejecting blank names.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> AppResult<Self> {
        let name = NonEmptyString::new(name)?;

        Ok(Self {
            name: name.into(),
            description: description.into(),
        })
    }
}
