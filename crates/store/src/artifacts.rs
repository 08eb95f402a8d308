//! Artifact download counters

use common::Result;

use crate::{collections, DocumentStore, WriteBatch};

const DOWNLOAD_COUNT: &str = "downloadCount";

/// Append a download-counter increment to a batch, so the counter moves
/// atomically with the progress update that recorded the download
pub fn push_download(batch: WriteBatch, artifact_id: &str) -> WriteBatch {
    batch.increment(collections::ARTIFACT_STATS, artifact_id, DOWNLOAD_COUNT, 1)
}

/// Total downloads recorded for an artifact
pub async fn download_count(store: &dyn DocumentStore, artifact_id: &str) -> Result<i64> {
    let count = store
        .get(collections::ARTIFACT_STATS, artifact_id)
        .await?
        .and_then(|doc| doc.get(DOWNLOAD_COUNT).and_then(|v| v.as_i64()))
        .unwrap_or(0);
    Ok(count)
}
