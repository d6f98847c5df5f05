use super::IUserRepo;
use crate::repos::shared::mongo_repo::{self, MongoDocument};
use crate::repos::shared::repo::{DeleteResult, StoreError};
use mongodb::{
    bson::{doc, Document},
    options::IndexOptions,
    Collection, Database, IndexModel,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use user_directory_domain::{User, UserType};

pub struct MongoUserRepo {
    collection: Collection<Document>,
}

impl MongoUserRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("users"),
        }
    }

    /// Ensures the unique index on `username` that backs the
    /// one-record-per-username invariant.
    pub(crate) async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let index = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(index, None).await.map_err(|e| {
            error!("failed to create the username index: {:?}", e);
            StoreError::Storage(e.into())
        })?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl IUserRepo for MongoUserRepo {
    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        mongo_repo::insert::<_, UserMongo>(&self.collection, user).await
    }

    async fn update(
        &self,
        username: &str,
        password: &str,
        user_type: UserType,
    ) -> Result<(), StoreError> {
        let filter = doc! { "username": username };
        let update = doc! {
            "$set": {
                "password": password,
                "userType": user_type.to_string(),
            }
        };
        let matched = mongo_repo::update_one(&self.collection, filter, update).await?;
        if matched == 1 {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    async fn find(&self, username: &str) -> Result<Option<User>, StoreError> {
        let filter = doc! { "username": username };
        mongo_repo::find_one_by::<_, UserMongo>(&self.collection, filter).await
    }

    async fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, StoreError> {
        let filter = doc! {
            "username": username,
            "password": password
        };
        mongo_repo::find_one_by::<_, UserMongo>(&self.collection, filter).await
    }

    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        mongo_repo::find_many_by::<_, UserMongo>(&self.collection, None).await
    }

    async fn delete(&self, username: &str) -> Result<(), StoreError> {
        let filter = doc! { "username": username };
        let deleted = mongo_repo::delete_one(&self.collection, filter).await?;
        if deleted == 1 {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    async fn delete_all(&self) -> Result<DeleteResult, StoreError> {
        mongo_repo::delete_many_by(&self.collection, doc! {}).await
    }

    async fn count(&self) -> Result<u64, StoreError> {
        mongo_repo::count(&self.collection, None).await
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct UserMongo {
    username: String,
    password: String,
    #[serde(rename = "userType")]
    user_type: UserType,
}

impl MongoDocument<User> for UserMongo {
    fn to_domain(self) -> User {
        User {
            username: self.username,
            password: self.password,
            user_type: self.user_type,
        }
    }

    fn from_domain(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            password: user.password.clone(),
            user_type: user.user_type,
        }
    }
}
