mod inmemory;
mod mongo;

pub use inmemory::InMemoryUserRepo;
pub use mongo::MongoUserRepo;
use user_directory_domain::{User, UserType};

use super::shared::repo::{DeleteResult, StoreError};

#[async_trait::async_trait]
pub trait IUserRepo: Send + Sync {
    /// Inserts a new record. Fails with `AlreadyExists` when the username
    /// is already taken.
    async fn insert(&self, user: &User) -> Result<(), StoreError>;
    /// Updates password and role of the matching record. Succeeds iff
    /// exactly one record matched.
    async fn update(
        &self,
        username: &str,
        password: &str,
        user_type: UserType,
    ) -> Result<(), StoreError>;
    async fn find(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, StoreError>;
    async fn find_all(&self) -> Result<Vec<User>, StoreError>;
    /// Removes the matching record. Succeeds iff exactly one record was
    /// removed.
    async fn delete(&self, username: &str) -> Result<(), StoreError>;
    async fn delete_all(&self) -> Result<DeleteResult, StoreError>;
    async fn count(&self) -> Result<u64, StoreError>;
}
