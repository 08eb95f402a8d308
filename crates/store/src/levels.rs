//! Level catalog persistence

use serde_json::Value;

use common::models::Level;
use common::{Error, Result};

use crate::{collections, DocumentStore, OrderBy};

/// All levels, ordered by their position in the unlock sequence
pub async fn list(store: &dyn DocumentStore) -> Result<Vec<Level>> {
    let docs = store
        .query(collections::LEVELS, &[], Some(OrderBy::asc("order")))
        .await?;
    docs.into_iter().map(decode).collect()
}

/// Level by id
pub async fn get(store: &dyn DocumentStore, id: &str) -> Result<Option<Level>> {
    match store.get(collections::LEVELS, id).await? {
        Some(doc) => Ok(Some(decode(doc)?)),
        None => Ok(None),
    }
}

/// Create or replace a level
pub async fn put(store: &dyn DocumentStore, level: &Level) -> Result<()> {
    let doc = encode(level)?;
    store.set(collections::LEVELS, &level.id, doc).await
}

/// Remove a level
pub async fn remove(store: &dyn DocumentStore, id: &str) -> Result<()> {
    store.delete(collections::LEVELS, id).await
}

fn decode(doc: Value) -> Result<Level> {
    serde_json::from_value(doc)
        .map_err(|e| Error::Internal(format!("invalid level document: {e}")))
}

fn encode(level: &Level) -> Result<Value> {
    serde_json::to_value(level)
        .map_err(|e| Error::Internal(format!("failed to encode level {}: {e}", level.id)))
}
