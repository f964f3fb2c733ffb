use rolevault_core::AppResult;

/// Credential hashing collaborator.
///
/// The resolution core never inspects the hash format; it stores and
/// forwards the opaque string this port produces.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password into a storable string.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}
