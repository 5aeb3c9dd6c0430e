use std::sync::Arc;

use mongodb::bson::{doc, Document};
use tracing::debug;

use crate::api::format::parse_object_id;
use crate::database::{DeleteOutcome, DocumentStore, InsertOutcome, UpdateOutcome};
use crate::error::ApiError;
use crate::types::Collection;

/// Collection-scoped access gateway shared by every resource route.
///
/// Each method is a single store call; nothing here spans collections.
#[derive(Clone)]
pub struct ResourceService {
    store: Arc<dyn DocumentStore>,
    collection: Collection,
}

impl ResourceService {
    pub fn new(store: Arc<dyn DocumentStore>, collection: Collection) -> Self {
        Self { store, collection }
    }

    /// All documents matching an equality filter (empty filter lists everything)
    pub async fn list(&self, filter: Document) -> Result<Vec<Document>, ApiError> {
        Ok(self.store.find(self.collection, filter).await?)
    }

    /// Fetch by generated id. Missing documents are `NotFound`.
    pub async fn get(&self, id: &str) -> Result<Document, ApiError> {
        let oid = parse_object_id(id)?;
        self.store
            .find_one(self.collection, doc! { "_id": oid })
            .await?
            .ok_or_else(|| ApiError::not_found(format!("{} {} not found", self.collection.label(), id)))
    }

    pub async fn create(&self, document: Document) -> Result<InsertOutcome, ApiError> {
        let outcome = self.store.insert_one(self.collection, document).await?;
        debug!("Created {} {}", self.collection.label(), outcome.inserted_id);
        Ok(outcome)
    }

    /// `$set` the patch on the first match; with `upsert`, create when absent
    pub async fn update(&self, filter: Document, patch: Document, upsert: bool) -> Result<UpdateOutcome, ApiError> {
        if patch.is_empty() {
            return Err(ApiError::bad_request("Update contains no fields"));
        }
        Ok(self.store.update_one(self.collection, filter, patch, upsert).await?)
    }

    /// Update by generated id
    pub async fn update_by_id(&self, id: &str, patch: Document, upsert: bool) -> Result<UpdateOutcome, ApiError> {
        let oid = parse_object_id(id)?;
        self.update(doc! { "_id": oid }, patch, upsert).await
    }

    pub async fn delete(&self, filter: Document) -> Result<DeleteOutcome, ApiError> {
        Ok(self.store.delete_one(self.collection, filter).await?)
    }

    /// Delete by generated id
    pub async fn delete_by_id(&self, id: &str) -> Result<DeleteOutcome, ApiError> {
        let oid = parse_object_id(id)?;
        self.delete(doc! { "_id": oid }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use mongodb::bson::oid::ObjectId;

    fn items() -> ResourceService {
        ResourceService::new(Arc::new(MemoryStore::new()), Collection::Items)
    }

    #[tokio::test]
    async fn created_document_is_retrievable_with_all_fields() {
        let service = items();
        let outcome = service
            .create(doc! { "name": "Angle Grinder", "price": 89.5, "quantity": 120, "supplier": "Bosch" })
            .await
            .unwrap();

        let found = service.get(&outcome.inserted_id.to_hex()).await.unwrap();
        assert_eq!(found.get_str("name").unwrap(), "Angle Grinder");
        assert_eq!(found.get_f64("price").unwrap(), 89.5);
        assert_eq!(found.get_i32("quantity").unwrap(), 120);
        assert_eq!(found.get_str("supplier").unwrap(), "Bosch");
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let err = items().get(&ObjectId::new().to_hex()).await.unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn empty_patch_is_rejected() {
        let err = items()
            .update_by_id(&ObjectId::new().to_hex(), Document::new(), true)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn upsert_by_id_keeps_path_id() {
        let service = items();
        let id = ObjectId::new();
        let outcome = service
            .update_by_id(&id.to_hex(), doc! { "quantity": 7 }, true)
            .await
            .unwrap();
        assert_eq!(outcome.upserted_id, Some(id));
        assert_eq!(service.get(&id.to_hex()).await.unwrap().get_i32("quantity").unwrap(), 7);
    }
}
