//! Tracking operations over a user's progress record
//!
//! Three idempotent "mark as done" operations plus the completion
//! transition. Tracking never advances the current level or touches skill
//! scores; only an explicit `complete_level` does.

use chrono::Utc;
use serde_json::{json, Map};
use std::sync::Arc;
use tracing::{debug, info};

use common::models::{AnswerRecord, LevelStatus, TestProgress, UserProgress, VideoProgress};
use common::{Error, Result};
use store::retry::RetryPolicy;
use store::{collections, Precondition, StoreHandle, WriteBatch};

use crate::catalog::Catalog;
use crate::{gate, status};

pub struct Tracker {
    store: StoreHandle,
    catalog: Arc<Catalog>,
    retry: RetryPolicy,
}

impl Tracker {
    pub fn new(store: StoreHandle, catalog: Arc<Catalog>, retry: RetryPolicy) -> Self {
        Self {
            store,
            catalog,
            retry,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn first_level_id(&self) -> Result<String> {
        self.catalog
            .first()
            .map(|level| level.id.clone())
            .ok_or_else(|| Error::Catalog("catalog is empty".to_string()))
    }

    /// Progress record for a user, created all-empty on first access
    pub async fn progress(&self, user_id: &str) -> Result<UserProgress> {
        let first = self.first_level_id()?;
        self.retry
            .run(|| store::progress::get_or_init(self.store.as_ref(), user_id, &first))
            .await
    }

    /// Reset-to-initial debug utility
    pub async fn reset_progress(&self, user_id: &str) -> Result<UserProgress> {
        let first = self.first_level_id()?;
        let fresh = store::progress::reset(self.store.as_ref(), user_id, &first).await?;
        info!("Progress reset for {user_id}");
        Ok(fresh)
    }

    /// Record that a video was watched to the end. Safe to retry.
    pub async fn track_video_watched(
        &self,
        user_id: &str,
        video_id: &str,
        position: u32,
    ) -> Result<UserProgress> {
        self.catalog.require_video(video_id)?;
        let mut progress = self.progress(user_id).await?;

        if progress.watched_videos.iter().any(|id| id == video_id) {
            debug!("Video {video_id} already watched by {user_id}");
            return Ok(progress);
        }

        let now = Utc::now();
        let record = VideoProgress {
            video_id: video_id.to_string(),
            watched: true,
            position,
            completed_at: now,
        };
        let batch = WriteBatch::new()
            .array_union(
                collections::USER_PROGRESS,
                user_id,
                "watchedVideos",
                json!(video_id),
            )
            .update_fields(collections::USER_PROGRESS, user_id, last_updated(now)?);
        let batch = store::activity::push_video(batch, user_id, &record)?;
        self.store.commit(batch).await?;

        debug!("Video {video_id} watched by {user_id}");
        progress.watched_videos.push(video_id.to_string());
        progress.last_updated = now;
        Ok(progress)
    }

    /// Record a finished quiz with its score and answer sheet. The score is
    /// stored but takes no part in completion gating. Safe to retry.
    pub async fn track_test_completed(
        &self,
        user_id: &str,
        test_id: &str,
        score: u32,
        answers: Vec<AnswerRecord>,
    ) -> Result<UserProgress> {
        self.catalog.require_test(test_id)?;
        let mut progress = self.progress(user_id).await?;

        if progress.completed_tests.iter().any(|id| id == test_id) {
            debug!("Test {test_id} already completed by {user_id}");
            return Ok(progress);
        }

        let now = Utc::now();
        let record = TestProgress {
            test_id: test_id.to_string(),
            completed: true,
            score,
            answers,
            completed_at: now,
        };
        let batch = WriteBatch::new()
            .array_union(
                collections::USER_PROGRESS,
                user_id,
                "completedTests",
                json!(test_id),
            )
            .update_fields(collections::USER_PROGRESS, user_id, last_updated(now)?);
        let batch = store::activity::push_test(batch, user_id, &record)?;
        self.store.commit(batch).await?;

        debug!("Test {test_id} completed by {user_id} with score {score}");
        progress.completed_tests.push(test_id.to_string());
        progress.last_updated = now;
        Ok(progress)
    }

    /// Record an artifact download and bump its download counter in the same
    /// batch. Safe to retry; the counter moves once per user.
    pub async fn track_artifact_downloaded(
        &self,
        user_id: &str,
        artifact_id: &str,
    ) -> Result<UserProgress> {
        self.catalog.require_artifact(artifact_id)?;
        let mut progress = self.progress(user_id).await?;

        if progress
            .downloaded_artifacts
            .iter()
            .any(|id| id == artifact_id)
        {
            debug!("Artifact {artifact_id} already downloaded by {user_id}");
            return Ok(progress);
        }

        let now = Utc::now();
        let batch = WriteBatch::new()
            .array_union(
                collections::USER_PROGRESS,
                user_id,
                "downloadedArtifacts",
                json!(artifact_id),
            )
            .update_fields(collections::USER_PROGRESS, user_id, last_updated(now)?);
        let batch = store::artifacts::push_download(batch, artifact_id);
        self.store.commit(batch).await?;

        debug!("Artifact {artifact_id} downloaded by {user_id}");
        progress.downloaded_artifacts.push(artifact_id.to_string());
        progress.last_updated = now;
        Ok(progress)
    }

    /// Complete a level: extend the completed set, advance the pointer,
    /// recompute skills over the new set and award badges, committed as one
    /// guarded write. A concurrent double-submit loses the optimistic check
    /// and surfaces `AlreadyCompleted`; no partial state is ever visible.
    pub async fn complete_level(&self, user_id: &str, level_id: &str) -> Result<UserProgress> {
        let level = self.catalog.require(level_id)?;
        let progress = self.progress(user_id).await?;

        if progress.completed_levels.iter().any(|id| id == level_id) {
            return Err(Error::AlreadyCompleted(level_id.to_string()));
        }

        if status::resolve_status(level, &self.catalog, &progress) == LevelStatus::Locked {
            return Err(Error::GateNotSatisfied(format!(
                "level {level_id} is locked; complete earlier levels first"
            )));
        }

        let missing = gate::missing_items(level, &progress);
        if !missing.is_empty() {
            return Err(Error::GateNotSatisfied(missing.to_string()));
        }

        let now = Utc::now();
        let updated = gate::advance(&progress, level, &self.catalog, now);
        let doc = serde_json::to_value(&updated)
            .map_err(|e| Error::Internal(format!("failed to encode progress: {e}")))?;
        let batch = WriteBatch::new().set_if(
            collections::USER_PROGRESS,
            user_id,
            doc,
            Precondition::ArrayMissing {
                field: "completedLevels".to_string(),
                value: json!(level_id),
            },
        );
        match self.store.commit(batch).await {
            Ok(()) => {}
            Err(Error::Conflict(_)) => {
                return Err(Error::AlreadyCompleted(level_id.to_string()));
            }
            Err(e) => return Err(e),
        }

        info!("Level {level_id} completed by {user_id}");
        for badge in updated.badges.iter().skip(progress.badges.len()) {
            info!("🏆 Badge earned: {} for {user_id}", badge.id);
        }
        Ok(updated)
    }
}

fn last_updated(now: chrono::DateTime<Utc>) -> Result<Map<String, serde_json::Value>> {
    let mut fields = Map::new();
    fields.insert(
        "lastUpdated".to_string(),
        serde_json::to_value(now)
            .map_err(|e| Error::Internal(format!("failed to encode timestamp: {e}")))?,
    );
    Ok(fields)
}
