pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Document};
use serde::Serialize;
use thiserror::Error;

use crate::types::Collection;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Errors raised by a document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URI: {0}")]
    InvalidUri(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] mongodb::bson::ser::Error),

    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
}

/// Result of an insert, shaped like the driver acknowledgement clients already consume
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOutcome {
    pub acknowledged: bool,
    #[serde(serialize_with = "serialize_object_id")]
    pub inserted_id: ObjectId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    #[serde(serialize_with = "serialize_optional_object_id")]
    pub upserted_id: Option<ObjectId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

fn serialize_object_id<S: serde::Serializer>(id: &ObjectId, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&id.to_hex())
}

fn serialize_optional_object_id<S: serde::Serializer>(
    id: &Option<ObjectId>,
    s: S,
) -> Result<S::Ok, S::Error> {
    match id {
        Some(id) => s.serialize_str(&id.to_hex()),
        None => s.serialize_none(),
    }
}

/// Collection-scoped document operations with equality filters.
///
/// Implementations are shared by every in-flight request and must tolerate
/// concurrent calls. Writes to the same document resolve last-writer-wins.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, collection: Collection, filter: Document) -> Result<Vec<Document>, StoreError>;

    async fn find_one(&self, collection: Collection, filter: Document) -> Result<Option<Document>, StoreError>;

    /// Insert a document, generating `_id` when absent
    async fn insert_one(&self, collection: Collection, document: Document) -> Result<InsertOutcome, StoreError>;

    /// Apply `$set: set` to the first match. With `upsert`, a missing match
    /// creates a document from the filter's fields plus `set`.
    async fn update_one(
        &self,
        collection: Collection,
        filter: Document,
        set: Document,
        upsert: bool,
    ) -> Result<UpdateOutcome, StoreError>;

    async fn delete_one(&self, collection: Collection, filter: Document) -> Result<DeleteOutcome, StoreError>;

    /// Round-trip to the backing store
    async fn ping(&self) -> Result<(), StoreError>;
}
