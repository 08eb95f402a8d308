//! Level map routes
//!
//! The level map is rendered per user: the same catalog, each level tagged
//! with that user's unlock status.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use common::models::{Level, LevelStatus, SkillType};
use engine::gate::{self, MissingItems};
use engine::status;

use crate::error::{ApiResult, OptionExt};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserQuery {
    pub user: String,
}

/// One entry of the level map
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelSummary {
    pub id: String,
    pub order: u32,
    pub title: String,
    pub description: String,
    pub is_premium: bool,
    pub skills_focus: Vec<SkillType>,
    pub status: LevelStatus,
    pub video_count: usize,
    pub test_count: usize,
    pub artifact_count: usize,
}

impl LevelSummary {
    fn new(level: &Level, status: LevelStatus) -> Self {
        Self {
            id: level.id.clone(),
            order: level.order,
            title: level.title.clone(),
            description: level.description.clone(),
            is_premium: level.is_premium,
            skills_focus: level.skills_focus.clone(),
            status,
            video_count: level.videos.len(),
            test_count: level.tests.len(),
            artifact_count: level.artifacts.len(),
        }
    }
}

/// Full level content plus the user's standing against its gate
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDetail {
    #[serde(flatten)]
    pub level: Level,
    pub status: LevelStatus,
    pub can_complete: bool,
    pub missing: MissingItems,
}

/// List the level map for a user
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<Vec<LevelSummary>>> {
    let tracker = state.tracker().await;
    let progress = tracker.progress(&query.user).await?;

    let summaries = status::statuses(tracker.catalog(), &progress)
        .into_iter()
        .map(|(level, status)| LevelSummary::new(level, status))
        .collect();

    Ok(Json(summaries))
}

/// Get one level with the user's gate standing
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<LevelDetail>> {
    let tracker = state.tracker().await;
    let progress = tracker.progress(&query.user).await?;

    let catalog = tracker.catalog();
    let level = catalog
        .by_id(&id)
        .not_found(format!("Level {id} not found"))?;

    Ok(Json(LevelDetail {
        status: status::resolve_status(level, catalog, &progress),
        can_complete: gate::can_complete(level, &progress),
        missing: gate::missing_items(level, &progress),
        level: level.clone(),
    }))
}
