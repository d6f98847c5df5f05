mod shared;
mod user;

use mongodb::{options::ClientOptions, Client};
use std::sync::Arc;
use tracing::info;

pub use shared::repo::{DeleteResult, StoreError};
pub use user::{IUserRepo, InMemoryUserRepo, MongoUserRepo};

#[derive(Clone)]
pub struct Repos {
    pub users: Arc<dyn IUserRepo>,
}

impl Repos {
    pub async fn create_mongodb(connection_string: &str, db_name: &str) -> anyhow::Result<Self> {
        let client_options = ClientOptions::parse(connection_string).await?;
        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        let users = MongoUserRepo::new(&db);

        // Creating the username index up front both enforces the
        // one-record-per-username invariant server-side and makes sure the
        // db is reachable before the repos are handed out.
        info!("DB CHECKING CONNECTION ...");
        users.ensure_indexes().await?;
        info!("DB CHECKING CONNECTION ... [done]");

        Ok(Self {
            users: Arc::new(users),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepo::new()),
        }
    }
}
