//! User repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{NewUser, User, UserId};

/// Repository trait for user accounts.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user account.
    ///
    /// # Returns
    /// * `Ok(User)` - The stored record
    /// * `Err(RepositoryError::Conflict)` - If the e-mail is already taken
    async fn create_user(&self, new_user: NewUser) -> RepositoryResult<User>;

    /// Look up a user by id.
    async fn find_user(&self, id: UserId) -> RepositoryResult<Option<User>>;

    /// Look up a user by e-mail address.
    async fn find_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
}
