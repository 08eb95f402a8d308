//! User progress persistence
//!
//! One document per user in the `userProgress` collection, keyed by user id.

use serde_json::Value;

use common::models::UserProgress;
use common::{Error, Result};

use crate::{collections, DocumentStore, Precondition, WriteBatch};

/// Progress record for a user, `None` if never created
pub async fn get(store: &dyn DocumentStore, user_id: &str) -> Result<Option<UserProgress>> {
    match store.get(collections::USER_PROGRESS, user_id).await? {
        Some(doc) => Ok(Some(decode(doc)?)),
        None => Ok(None),
    }
}

/// Progress record for a user, created all-empty on first access.
///
/// Creation is guarded so that two concurrent first reads produce exactly
/// one record; the loser re-reads what the winner wrote.
pub async fn get_or_init(
    store: &dyn DocumentStore,
    user_id: &str,
    first_level_id: &str,
) -> Result<UserProgress> {
    if let Some(progress) = get(store, user_id).await? {
        return Ok(progress);
    }

    let fresh = UserProgress::new(user_id, first_level_id);
    let batch = WriteBatch::new().set_if(
        collections::USER_PROGRESS,
        user_id,
        encode(&fresh)?,
        Precondition::Exists(false),
    );
    match store.commit(batch).await {
        Ok(()) => Ok(fresh),
        Err(Error::Conflict(_)) => get(store, user_id)
            .await?
            .ok_or_else(|| Error::Internal(format!("progress for {user_id} vanished"))),
        Err(e) => Err(e),
    }
}

/// Replace a user's progress record
pub async fn put(store: &dyn DocumentStore, progress: &UserProgress) -> Result<()> {
    let doc = encode(progress)?;
    store
        .set(collections::USER_PROGRESS, &progress.user_id, doc)
        .await
}

/// Reset-to-initial utility: drop the record and start over
pub async fn reset(
    store: &dyn DocumentStore,
    user_id: &str,
    first_level_id: &str,
) -> Result<UserProgress> {
    let fresh = UserProgress::new(user_id, first_level_id);
    let batch = WriteBatch::new()
        .delete(collections::USER_PROGRESS, user_id)
        .set(collections::USER_PROGRESS, user_id, encode(&fresh)?);
    store.commit(batch).await?;
    Ok(fresh)
}

pub(crate) fn decode(doc: Value) -> Result<UserProgress> {
    serde_json::from_value(doc)
        .map_err(|e| Error::Internal(format!("invalid progress document: {e}")))
}

pub(crate) fn encode(progress: &UserProgress) -> Result<Value> {
    serde_json::to_value(progress).map_err(|e| {
        Error::Internal(format!(
            "failed to encode progress for {}: {e}",
            progress.user_id
        ))
    })
}
