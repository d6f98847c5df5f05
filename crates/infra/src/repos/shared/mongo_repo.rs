use super::repo::{DeleteResult, StoreError};
use futures::stream::StreamExt;
use mongodb::{
    bson::{self, Document},
    error::{ErrorKind, WriteFailure},
    Collection, Cursor,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::error;

/// Conversion between a domain entity and its persisted document shape.
pub trait MongoDocument<E>: Serialize + DeserializeOwned {
    fn to_domain(self) -> E;
    fn from_domain(entity: &E) -> Self;
}

fn entity_to_persistence<E, D: MongoDocument<E>>(entity: &E) -> Result<Document, StoreError> {
    let raw = D::from_domain(entity);
    bson::to_document(&raw).map_err(|e| StoreError::Storage(e.into()))
}

fn persistence_to_entity<E, D: MongoDocument<E>>(doc: Document) -> Result<E, StoreError> {
    let raw: D = bson::from_document(doc).map_err(|e| StoreError::Storage(e.into()))?;
    Ok(raw.to_domain())
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == 11000,
        _ => false,
    }
}

pub async fn insert<E, D: MongoDocument<E>>(
    collection: &Collection<Document>,
    entity: &E,
) -> Result<(), StoreError> {
    let doc = entity_to_persistence::<E, D>(entity)?;
    collection.insert_one(doc, None).await.map_err(|e| {
        if is_duplicate_key(&e) {
            StoreError::AlreadyExists
        } else {
            error!("failed to insert document: {:?}", e);
            StoreError::Storage(e.into())
        }
    })?;
    Ok(())
}

/// Applies `update` to the documents matching `filter` and returns the
/// matched count.
pub async fn update_one(
    collection: &Collection<Document>,
    filter: Document,
    update: Document,
) -> Result<u64, StoreError> {
    let res = collection.update_one(filter, update, None).await.map_err(|e| {
        error!("failed to update document: {:?}", e);
        StoreError::Storage(e.into())
    })?;
    Ok(res.matched_count)
}

pub async fn find_one_by<E, D: MongoDocument<E>>(
    collection: &Collection<Document>,
    filter: Document,
) -> Result<Option<E>, StoreError> {
    let doc = collection.find_one(filter, None).await.map_err(|e| {
        error!("failed to find document: {:?}", e);
        StoreError::Storage(e.into())
    })?;
    match doc {
        Some(doc) => Ok(Some(persistence_to_entity::<E, D>(doc)?)),
        None => Ok(None),
    }
}

pub async fn find_many_by<E, D: MongoDocument<E>>(
    collection: &Collection<Document>,
    filter: Option<Document>,
) -> Result<Vec<E>, StoreError> {
    let cursor = collection.find(filter, None).await.map_err(|e| {
        error!("failed to query documents: {:?}", e);
        StoreError::Storage(e.into())
    })?;
    consume_cursor::<E, D>(cursor).await
}

pub async fn delete_one(
    collection: &Collection<Document>,
    filter: Document,
) -> Result<u64, StoreError> {
    let res = collection.delete_one(filter, None).await.map_err(|e| {
        error!("failed to delete document: {:?}", e);
        StoreError::Storage(e.into())
    })?;
    Ok(res.deleted_count)
}

pub async fn delete_many_by(
    collection: &Collection<Document>,
    filter: Document,
) -> Result<DeleteResult, StoreError> {
    let res = collection.delete_many(filter, None).await.map_err(|e| {
        error!("failed to delete documents: {:?}", e);
        StoreError::Storage(e.into())
    })?;
    Ok(DeleteResult {
        deleted_count: res.deleted_count,
    })
}

pub async fn count(
    collection: &Collection<Document>,
    filter: Option<Document>,
) -> Result<u64, StoreError> {
    collection.count_documents(filter, None).await.map_err(|e| {
        error!("failed to count documents: {:?}", e);
        StoreError::Storage(e.into())
    })
}

async fn consume_cursor<E, D: MongoDocument<E>>(
    mut cursor: Cursor<Document>,
) -> Result<Vec<E>, StoreError> {
    let mut documents = vec![];
    while let Some(result) = cursor.next().await {
        let doc = result.map_err(|e| {
            error!("failed to read document cursor: {:?}", e);
            StoreError::Storage(e.into())
        })?;
        documents.push(persistence_to_entity::<E, D>(doc)?);
    }

    Ok(documents)
}
