use crate::repos::{IUserRepo, Repos, StoreError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use user_directory_domain::{User, UserType};

/// Single point of access to the stored user records for the console
/// service. Every call issues its own request against the backing store;
/// the driver handles connection pooling and concurrent use.
pub struct UserDirectory {
    users: Arc<dyn IUserRepo>,
    available: AtomicBool,
}

impl UserDirectory {
    pub fn new(repos: &Repos) -> Self {
        Self {
            users: repos.users.clone(),
            available: AtomicBool::new(true),
        }
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable)
        }
    }

    /// All records, in storage-defined order.
    pub async fn list(&self) -> Result<Vec<User>, StoreError> {
        self.ensure_available()?;
        self.users.find_all().await
    }

    /// Creates a record for a username not yet present. Not idempotent: a
    /// second add with the same username fails with `AlreadyExists`.
    pub async fn add(
        &self,
        username: &str,
        password: &str,
        user_type: UserType,
    ) -> Result<(), StoreError> {
        self.ensure_available()?;
        if username.is_empty() || password.is_empty() {
            return Err(StoreError::InvalidArgument);
        }

        let user = User::new(username, password, user_type);
        match self.users.insert(&user).await {
            Err(StoreError::AlreadyExists) => {
                warn!("user with username {} already exists", username);
                Err(StoreError::AlreadyExists)
            }
            other => other,
        }
    }

    /// Updates password and role of the matching record. The username
    /// itself is never mutated.
    pub async fn edit(
        &self,
        username: &str,
        password: &str,
        user_type: UserType,
    ) -> Result<(), StoreError> {
        self.ensure_available()?;
        self.users.update(username, password, user_type).await
    }

    pub async fn delete(&self, username: &str) -> Result<(), StoreError> {
        self.ensure_available()?;
        self.users.delete(username).await
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool, StoreError> {
        self.ensure_available()?;
        Ok(self.users.find(username).await?.is_some())
    }

    /// True iff a record matches both username and password exactly.
    /// Passwords are compared verbatim, the way they were stored.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<bool, StoreError> {
        self.ensure_available()?;
        Ok(self
            .users
            .find_by_credentials(username, password)
            .await?
            .is_some())
    }

    pub async fn get(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.ensure_available()?;
        self.users.find(username).await
    }

    /// Removes every record and returns how many went away.
    pub async fn clear(&self) -> Result<u64, StoreError> {
        self.ensure_available()?;
        let res = self.users.delete_all().await?;
        Ok(res.deleted_count)
    }

    pub async fn count(&self) -> Result<u64, StoreError> {
        self.ensure_available()?;
        self.users.count().await
    }

    /// Marks the directory closed. One-way: operations invoked afterwards
    /// fail with `Unavailable`. The driver releases its pooled connections
    /// when the last handle is dropped.
    pub fn close(&self) {
        self.available.store(false, Ordering::SeqCst);
        info!("user directory closed");
    }

    /// True iff the directory was initialized and not yet closed.
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::Repos;

    fn directory() -> UserDirectory {
        UserDirectory::new(&Repos::create_inmemory())
    }

    #[tokio::test]
    async fn added_user_exists() {
        let dir = directory();

        dir.add("a@x.com", "pw1", UserType::Admin)
            .await
            .expect("To add user");

        assert!(dir.username_exists("a@x.com").await.unwrap());
        assert!(!dir.username_exists("b@x.com").await.unwrap());
    }

    #[tokio::test]
    async fn second_add_with_same_username_is_rejected() {
        let dir = directory();

        assert!(dir.add("a@x.com", "pw1", UserType::Admin).await.is_ok());
        let err = dir.add("a@x.com", "pw2", UserType::User).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists));

        assert_eq!(dir.count().await.unwrap(), 1);
        let user = dir.get("a@x.com").await.unwrap().unwrap();
        assert_eq!(user.password, "pw1");
        assert_eq!(user.user_type, UserType::Admin);
    }

    #[tokio::test]
    async fn add_requires_username_and_password() {
        let dir = directory();

        let err = dir.add("", "pw1", UserType::Admin).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument));
        let err = dir.add("a@x.com", "", UserType::Admin).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument));

        assert_eq!(dir.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn authenticate_compares_credentials_verbatim() {
        let dir = directory();

        dir.add("a@x.com", "pw1", UserType::Admin).await.unwrap();

        assert!(dir.authenticate("a@x.com", "pw1").await.unwrap());
        assert!(!dir.authenticate("a@x.com", "pw2").await.unwrap());
        assert!(!dir.authenticate("b@x.com", "pw1").await.unwrap());
    }

    #[tokio::test]
    async fn edit_replaces_password_and_role() {
        let dir = directory();

        dir.add("a@x.com", "pw1", UserType::Admin).await.unwrap();
        dir.edit("a@x.com", "pw2", UserType::User)
            .await
            .expect("To edit user");

        let user = dir.get("a@x.com").await.unwrap().unwrap();
        assert_eq!(user.password, "pw2");
        assert_eq!(user.user_type, UserType::User);
        assert!(dir.authenticate("a@x.com", "pw2").await.unwrap());
        assert!(!dir.authenticate("a@x.com", "pw1").await.unwrap());
    }

    #[tokio::test]
    async fn edit_of_unknown_user_is_not_found() {
        let dir = directory();

        let err = dir
            .edit("missing@x.com", "pw", UserType::User)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn deleted_user_is_gone() {
        let dir = directory();

        dir.add("a@x.com", "pw1", UserType::Admin).await.unwrap();
        dir.delete("a@x.com").await.expect("To delete user");

        assert!(!dir.username_exists("a@x.com").await.unwrap());
        let err = dir.delete("a@x.com").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn clear_empties_the_directory() {
        let dir = directory();

        dir.add("a@x.com", "pw1", UserType::Admin).await.unwrap();
        dir.add("b@x.com", "pw2", UserType::User).await.unwrap();

        assert_eq!(dir.clear().await.unwrap(), 2);
        assert_eq!(dir.count().await.unwrap(), 0);
        assert!(dir.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_returns_every_record() {
        let dir = directory();

        dir.add("a@x.com", "pw1", UserType::Admin).await.unwrap();
        dir.add("b@x.com", "pw2", UserType::User).await.unwrap();

        let mut usernames: Vec<_> = dir
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        usernames.sort();
        assert_eq!(usernames, vec!["a@x.com", "b@x.com"]);
    }

    #[tokio::test]
    async fn close_is_one_way() {
        let dir = directory();
        dir.add("a@x.com", "pw1", UserType::Admin).await.unwrap();

        assert!(dir.is_available());
        dir.close();
        assert!(!dir.is_available());

        assert!(matches!(
            dir.list().await.unwrap_err(),
            StoreError::Unavailable
        ));
        assert!(matches!(
            dir.add("b@x.com", "pw2", UserType::User).await.unwrap_err(),
            StoreError::Unavailable
        ));
        assert!(matches!(
            dir.authenticate("a@x.com", "pw1").await.unwrap_err(),
            StoreError::Unavailable
        ));
        assert!(matches!(
            dir.count().await.unwrap_err(),
            StoreError::Unavailable
        ));
    }
}
