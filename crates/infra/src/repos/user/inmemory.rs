use super::IUserRepo;
use crate::repos::shared::inmemory_repo::*;
use crate::repos::shared::repo::{DeleteResult, StoreError};
use std::sync::Mutex;
use user_directory_domain::{User, UserType};

pub struct InMemoryUserRepo {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(vec![]),
        }
    }
}

impl Default for InMemoryUserRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IUserRepo for InMemoryUserRepo {
    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        if find(&user.username, &self.users).is_some() {
            return Err(StoreError::AlreadyExists);
        }
        insert(user, &self.users);
        Ok(())
    }

    async fn update(
        &self,
        username: &str,
        password: &str,
        user_type: UserType,
    ) -> Result<(), StoreError> {
        let matched = update_by(
            &self.users,
            |u| u.username == username,
            |u| {
                u.password = password.to_string();
                u.user_type = user_type;
            },
        );
        if matched == 1 {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    async fn find(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(find(username, &self.users))
    }

    async fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, StoreError> {
        let mut matches = find_by(&self.users, |u| {
            u.username == username && u.password == password
        });
        if matches.is_empty() {
            return Ok(None);
        }
        Ok(Some(matches.remove(0)))
    }

    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(find_by(&self.users, |_| true))
    }

    async fn delete(&self, username: &str) -> Result<(), StoreError> {
        match delete(username, &self.users) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete_all(&self) -> Result<DeleteResult, StoreError> {
        Ok(delete_by(&self.users, |_| true))
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(count(&self.users))
    }
}
