mod config;
mod directory;
mod repos;

pub use config::{connection_string, Config};
pub use directory::UserDirectory;
pub use repos::{DeleteResult, IUserRepo, InMemoryUserRepo, MongoUserRepo, Repos, StoreError};
use tracing::info;

#[derive(Clone)]
pub struct DirectoryContext {
    pub repos: Repos,
    pub config: Config,
}

struct ContextParams {
    // (connection_string, db_name)
    pub mongodb: (String, String),
}

impl DirectoryContext {
    fn create_inmemory(config: Config) -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config,
        }
    }

    async fn create(params: ContextParams, config: Config) -> Self {
        let repos = Repos::create_mongodb(&params.mongodb.0, &params.mongodb.1)
            .await
            .expect("Mongo db creds must be set and valid");
        Self { repos, config }
    }
}

/// Will setup the correct infra context given the environment
pub async fn setup_context() -> DirectoryContext {
    let config = Config::new();

    match config.connection_string() {
        Some(uri) => {
            info!("MONGODB_HOST was provided. Going to use mongodb.");
            let db_name = config.db_name.clone();
            DirectoryContext::create(
                ContextParams {
                    mongodb: (uri, db_name),
                },
                config,
            )
            .await
        }
        None => {
            info!("MONGODB_HOST was not provided. Going to use the inmemory store.");
            DirectoryContext::create_inmemory(config)
        }
    }
}
