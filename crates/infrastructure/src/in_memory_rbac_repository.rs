//! In-memory implementation of the three RBAC repository ports.
//!
//! Backs tests and local development. Mirrors the PostgreSQL adapters'
//! observable behavior: unique-name conflicts, cascading deletes, hashed
//! name lookups and idempotent relation mutations.

use std::collections::{BTreeSet, HashMap};

use tokio::sync::RwLock;

use rolevault_core::AppError;
use rolevault_domain::{Permission, Role, User};

/// In-memory store implementing the user, role and permission repositories.
#[derive(Debug, Default)]
pub struct InMemoryRbacRepository {
    state: RwLock<Store>,
}

#[derive(Debug, Default)]
struct Store {
    users: HashMap<i64, User>,
    roles: HashMap<i64, Role>,
    permissions: HashMap<i64, Permission>,
    user_roles: BTreeSet<(i64, i64)>,
    role_permissions: BTreeSet<(i64, i64)>,
    user_permissions: BTreeSet<(i64, i64)>,
    next_user_id: i64,
    next_role_id: i64,
    next_permission_id: i64,
}

impl Store {
    fn next_user_id(&mut self) -> i64 {
        self.next_user_id += 1;
        self.next_user_id
    }

    fn next_role_id(&mut self) -> i64 {
        self.next_role_id += 1;
        self.next_role_id
    }

    fn next_permission_id(&mut self) -> i64 {
        self.next_permission_id += 1;
        self.next_permission_id
    }
}

impl InMemoryRbacRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_by_name<T>(mut values: Vec<T>, name: impl Fn(&T) -> String) -> Vec<T> {
    values.sort_by_key(name);
    values
}

fn conflict(entity: &str) -> AppError {
    AppError::Conflict(format!("a {entity} with this name already exists"))
}

fn missing_reference() -> AppError {
    AppError::NotFound("referenced user, role or permission was not found".to_owned())
}

mod permissions;
mod roles;
mod users;
