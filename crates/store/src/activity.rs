//! Per-item activity side records
//!
//! Watch positions and quiz answer sheets are logged next to the progress
//! record, keyed `"{user_id}:{item_id}"`. Nothing in unlock gating reads
//! them back; they exist for the profile and admin views.

use serde_json::Value;

use common::models::{TestProgress, VideoProgress};
use common::{Error, Result};

use crate::{collections, DocumentStore, WriteBatch};

fn record_id(user_id: &str, item_id: &str) -> String {
    format!("{user_id}:{item_id}")
}

/// Append a video watch record to a batch
pub fn push_video(batch: WriteBatch, user_id: &str, record: &VideoProgress) -> Result<WriteBatch> {
    let doc = serde_json::to_value(record)
        .map_err(|e| Error::Internal(format!("failed to encode video record: {e}")))?;
    Ok(batch.set(
        collections::VIDEO_PROGRESS,
        &record_id(user_id, &record.video_id),
        doc,
    ))
}

/// Append a quiz result record to a batch
pub fn push_test(batch: WriteBatch, user_id: &str, record: &TestProgress) -> Result<WriteBatch> {
    let doc = serde_json::to_value(record)
        .map_err(|e| Error::Internal(format!("failed to encode test record: {e}")))?;
    Ok(batch.set(
        collections::TEST_PROGRESS,
        &record_id(user_id, &record.test_id),
        doc,
    ))
}

/// Watch record for one (user, video) pair
pub async fn video(
    store: &dyn DocumentStore,
    user_id: &str,
    video_id: &str,
) -> Result<Option<VideoProgress>> {
    decode_opt(
        store
            .get(collections::VIDEO_PROGRESS, &record_id(user_id, video_id))
            .await?,
    )
}

/// Quiz result for one (user, test) pair
pub async fn test(
    store: &dyn DocumentStore,
    user_id: &str,
    test_id: &str,
) -> Result<Option<TestProgress>> {
    decode_opt(
        store
            .get(collections::TEST_PROGRESS, &record_id(user_id, test_id))
            .await?,
    )
}

fn decode_opt<T: serde::de::DeserializeOwned>(doc: Option<Value>) -> Result<Option<T>> {
    doc.map(|d| {
        serde_json::from_value(d)
            .map_err(|e| Error::Internal(format!("invalid activity record: {e}")))
    })
    .transpose()
}
