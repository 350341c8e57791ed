use std::time::Duration;

use mongodb::{
    bson::doc,
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection, Database as MongoDatabase,
};

use crate::{config::Config, errors::AppResult};

const APP_NAME: &str = "quiz-admin";

/// Store handle acquired once at startup and handed to each repository.
///
/// Clones share the underlying connection pool.
#[derive(Clone)]
pub struct Database {
    client: Client,
    database: MongoDatabase,
}

impl Database {
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let mut options = ClientOptions::parse(&config.mongo_conn_string).await?;
        options.app_name = Some(APP_NAME.to_string());
        options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());
        options.max_pool_size = Some(10);
        options.connect_timeout = Some(Duration::from_secs(5));
        options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(options)?;
        let database = client.database(&config.mongo_db_name);
        let db = Self { client, database };

        // fail at startup rather than on the first login
        db.health_check().await?;
        log::info!("Connected to MongoDB database '{}'", config.mongo_db_name);

        Ok(db)
    }

    pub fn get_collection<T>(&self, collection_name: &str) -> Collection<T>
    where
        T: Send + Sync,
    {
        self.database.collection(collection_name)
    }

    pub async fn health_check(&self) -> AppResult<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    /// Releases pooled connections. Call once, after the HTTP server has stopped.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
        log::info!("MongoDB connection closed");
    }
}
