use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::IndexOptions;
use mongodb::{Client, Database, IndexModel};
use tracing::{debug, info};

use super::{DeleteOutcome, DocumentStore, InsertOutcome, StoreError, UpdateOutcome};
use crate::config::DatabaseConfig;
use crate::types::Collection;

/// MongoDB-backed document store.
///
/// Holds one driver `Client` (and its connection pool) for the whole process.
/// Cloning shares the pool.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    db: Database,
}

impl MongoStore {
    /// Connect, ping and prepare indexes
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let uri = config.connection_uri()?;

        info!("Connecting to MongoDB database '{}'...", config.name);
        let client = Client::with_uri_str(&uri).await?;
        let db = client.database(&config.name);

        db.run_command(doc! { "ping": 1 }).await?;
        info!("Connected to MongoDB successfully");

        let store = Self { client, db };
        store.create_indexes().await?;
        Ok(store)
    }

    /// Unique index on `users.email`, the upsert key for user records
    async fn create_indexes(&self) -> Result<(), StoreError> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.db
            .collection::<Document>(Collection::Users.name())
            .create_index(index)
            .await?;
        debug!("Ensured unique index on users.email");
        Ok(())
    }

    /// Close pooled connections. Call once after the server stops accepting requests.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
        info!("MongoDB client shut down");
    }

    fn collection(&self, collection: Collection) -> mongodb::Collection<Document> {
        self.db.collection(collection.name())
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find(&self, collection: Collection, filter: Document) -> Result<Vec<Document>, StoreError> {
        debug!("find {} {:?}", collection, filter);
        let cursor = self.collection(collection).find(filter).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_one(&self, collection: Collection, filter: Document) -> Result<Option<Document>, StoreError> {
        debug!("find_one {} {:?}", collection, filter);
        Ok(self.collection(collection).find_one(filter).await?)
    }

    async fn insert_one(&self, collection: Collection, mut document: Document) -> Result<InsertOutcome, StoreError> {
        // Assign the id client-side so the outcome never depends on the driver's Bson variant
        let id = match document.get_object_id("_id") {
            Ok(id) => id,
            Err(_) => {
                let id = mongodb::bson::oid::ObjectId::new();
                document.insert("_id", id);
                id
            }
        };

        debug!("insert_one {} {}", collection, id);
        self.collection(collection).insert_one(document).await?;
        Ok(InsertOutcome {
            acknowledged: true,
            inserted_id: id,
        })
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: Document,
        set: Document,
        upsert: bool,
    ) -> Result<UpdateOutcome, StoreError> {
        debug!("update_one {} {:?} upsert={}", collection, filter, upsert);
        let result = self
            .collection(collection)
            .update_one(filter, doc! { "$set": set })
            .upsert(upsert)
            .await?;

        Ok(UpdateOutcome {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_id: result.upserted_id.and_then(|id| id.as_object_id()),
        })
    }

    async fn delete_one(&self, collection: Collection, filter: Document) -> Result<DeleteOutcome, StoreError> {
        debug!("delete_one {} {:?}", collection, filter);
        let result = self.collection(collection).delete_one(filter).await?;
        Ok(DeleteOutcome {
            acknowledged: true,
            deleted_count: result.deleted_count,
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
