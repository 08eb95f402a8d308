//! Progress and tracking routes
//!
//! The user id in the path comes from the auth layer in front of this
//! service and is trusted as given.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use common::models::{AnswerRecord, UserProgress};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Get the progress record, creating it on first access
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserProgress>> {
    let progress = state.tracker().await.progress(&user_id).await?;
    Ok(Json(progress))
}

/// Reset progress to its initial state (debug utility)
pub async fn reset(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserProgress>> {
    let progress = state.tracker().await.reset_progress(&user_id).await?;
    Ok(Json(progress))
}

#[derive(Deserialize)]
pub struct WatchRequest {
    /// Playback position in seconds when the video finished
    #[serde(default)]
    pub position: u32,
}

/// Mark a video as watched
pub async fn watch_video(
    State(state): State<Arc<AppState>>,
    Path((user_id, video_id)): Path<(String, String)>,
    Json(req): Json<WatchRequest>,
) -> ApiResult<Json<UserProgress>> {
    let progress = state
        .tracker()
        .await
        .track_video_watched(&user_id, &video_id, req.position)
        .await?;
    Ok(Json(progress))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRequest {
    pub score: u32,
    #[serde(default)]
    pub answers: Vec<AnswerRecord>,
}

/// Mark a test as completed, recording score and answer sheet
pub async fn complete_test(
    State(state): State<Arc<AppState>>,
    Path((user_id, test_id)): Path<(String, String)>,
    Json(req): Json<TestRequest>,
) -> ApiResult<Json<UserProgress>> {
    let progress = state
        .tracker()
        .await
        .track_test_completed(&user_id, &test_id, req.score, req.answers)
        .await?;
    Ok(Json(progress))
}

/// Mark an artifact as downloaded
pub async fn download_artifact(
    State(state): State<Arc<AppState>>,
    Path((user_id, artifact_id)): Path<(String, String)>,
) -> ApiResult<Json<UserProgress>> {
    let progress = state
        .tracker()
        .await
        .track_artifact_downloaded(&user_id, &artifact_id)
        .await?;
    Ok(Json(progress))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteResponse {
    pub already_completed: bool,
    pub progress: UserProgress,
}

/// Complete a level. A double-submit is benign: the response carries the
/// stored progress with `alreadyCompleted` set instead of an error.
pub async fn complete_level(
    State(state): State<Arc<AppState>>,
    Path((user_id, level_id)): Path<(String, String)>,
) -> ApiResult<Json<CompleteResponse>> {
    let tracker = state.tracker().await;
    match tracker.complete_level(&user_id, &level_id).await {
        Ok(progress) => Ok(Json(CompleteResponse {
            already_completed: false,
            progress,
        })),
        Err(common::Error::AlreadyCompleted(_)) => {
            let progress = tracker.progress(&user_id).await?;
            Ok(Json(CompleteResponse {
                already_completed: true,
                progress,
            }))
        }
        Err(e) => Err(ApiError::from(e)),
    }
}
