//! Profile routes: skill dashboard and badges

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use common::models::{Badge, SkillType};
use engine::skills;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillEntry {
    pub skill: SkillType,
    pub display_name: &'static str,
    pub description: &'static str,
    pub color: &'static str,
    pub progress: u8,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelRef {
    pub id: String,
    pub order: u32,
    pub title: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationEntry {
    pub skill: SkillType,
    pub display_name: &'static str,
    pub progress: u8,
    pub recommended_levels: Vec<LevelRef>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user_id: String,
    pub current_level: String,
    pub completed_levels: usize,
    pub total_levels: usize,
    pub skills: Vec<SkillEntry>,
    pub dominant_skills: Vec<SkillEntry>,
    pub recommendations: Vec<RecommendationEntry>,
    pub badges: Vec<Badge>,
}

fn entry(info: skills::SkillInfo, progress: u8) -> SkillEntry {
    SkillEntry {
        skill: info.skill,
        display_name: info.display_name,
        description: info.description,
        color: info.color,
        progress,
    }
}

/// Skill dashboard for a user
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<ProfileResponse>> {
    let tracker = state.tracker().await;
    let progress = tracker.progress(&user_id).await?;
    let catalog = tracker.catalog();

    let all_skills = skills::skills_info()
        .into_iter()
        .map(|info| {
            let pct = progress.skill_progress.get(&info.skill).copied().unwrap_or(0);
            entry(info, pct)
        })
        .collect();

    let dominant_skills = skills::dominant_skills(&progress.skill_progress, 2)
        .into_iter()
        .map(|(info, pct)| entry(info, pct))
        .collect();

    let recommendations = skills::recommendations(&progress, catalog)
        .into_iter()
        .map(|rec| RecommendationEntry {
            skill: rec.skill,
            display_name: skills::skill_info(rec.skill).display_name,
            progress: rec.progress,
            recommended_levels: rec
                .recommended_levels
                .into_iter()
                .map(|level| LevelRef {
                    id: level.id,
                    order: level.order,
                    title: level.title,
                })
                .collect(),
        })
        .collect();

    Ok(Json(ProfileResponse {
        user_id: progress.user_id.clone(),
        current_level: progress.current_level.clone(),
        completed_levels: progress.completed_levels.len(),
        total_levels: catalog.len(),
        skills: all_skills,
        dominant_skills,
        recommendations,
        badges: progress.badges.clone(),
    }))
}
