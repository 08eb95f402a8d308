//! Completion gate
//!
//! A level may be marked complete only when every video is watched, every
//! test is passed and every artifact is downloaded. A category with no
//! items is trivially satisfied.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use common::models::{Level, UserProgress};

use crate::badges;
use crate::catalog::Catalog;
use crate::skills;

/// Items still standing between a user and level completion
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingItems {
    pub videos: Vec<String>,
    pub tests: Vec<String>,
    pub artifacts: Vec<String>,
}

impl MissingItems {
    pub fn is_empty(&self) -> bool {
        self.videos.is_empty() && self.tests.is_empty() && self.artifacts.is_empty()
    }
}

impl fmt::Display for MissingItems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if !self.videos.is_empty() {
            parts.push(format!("{} video(s)", self.videos.len()));
        }
        if !self.tests.is_empty() {
            parts.push(format!("{} test(s)", self.tests.len()));
        }
        if !self.artifacts.is_empty() {
            parts.push(format!("{} artifact(s)", self.artifacts.len()));
        }
        write!(f, "{} remaining", parts.join(", "))
    }
}

/// What is left before `level` can be completed
pub fn missing_items(level: &Level, progress: &UserProgress) -> MissingItems {
    MissingItems {
        videos: level
            .videos
            .iter()
            .filter(|v| !progress.watched_videos.iter().any(|id| id == &v.id))
            .map(|v| v.id.clone())
            .collect(),
        tests: level
            .tests
            .iter()
            .filter(|t| !progress.completed_tests.iter().any(|id| id == &t.id))
            .map(|t| t.id.clone())
            .collect(),
        artifacts: level
            .artifacts
            .iter()
            .filter(|a| !progress.downloaded_artifacts.iter().any(|id| id == &a.id))
            .map(|a| a.id.clone())
            .collect(),
    }
}

/// True iff the level is not yet completed and the gate holds
pub fn can_complete(level: &Level, progress: &UserProgress) -> bool {
    !progress.completed_levels.iter().any(|id| id == &level.id)
        && missing_items(level, progress).is_empty()
}

/// The post-completion progress record: completed set extended, pointer
/// advanced, skills recomputed over the new set, new badges appended.
///
/// On the last level of the catalog the pointer stays where it is; the
/// level itself resolves as completed from then on.
pub fn advance(
    progress: &UserProgress,
    level: &Level,
    catalog: &Catalog,
    now: DateTime<Utc>,
) -> UserProgress {
    let mut updated = progress.clone();
    updated.completed_levels.push(level.id.clone());
    if let Some(next) = catalog.next_after(level) {
        updated.current_level = next.id.clone();
    }
    updated.skill_progress = skills::compute_skill_progress(&updated.completed_levels, catalog);
    let earned = badges::evaluate(&updated, now);
    updated.badges.extend(earned);
    updated.last_updated = now;
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::models::{FileType, LevelArtifact, Question, SkillType, Test, Video};

    fn video(id: &str, order: u32) -> Video {
        Video {
            id: id.to_string(),
            title: format!("Video {order}"),
            description: String::new(),
            youtube_id: "dQw4w9WgXcQ".to_string(),
            duration: 180,
            order,
        }
    }

    fn quiz(id: &str, after: &str) -> Test {
        Test {
            id: id.to_string(),
            after_video_id: after.to_string(),
            questions: vec![Question {
                id: format!("{id}-q1"),
                text: "?".to_string(),
                options: vec!["a".to_string(), "b".to_string()],
                correct_answer: 0,
            }],
        }
    }

    fn artifact(id: &str) -> LevelArtifact {
        LevelArtifact {
            id: id.to_string(),
            title: "Template".to_string(),
            description: String::new(),
            file_url: "/artifacts/template.pdf".to_string(),
            file_type: FileType::Pdf,
        }
    }

    fn full_level() -> Level {
        Level {
            id: "level-1".to_string(),
            order: 1,
            title: "Goal Setting".to_string(),
            description: String::new(),
            is_premium: false,
            skills_focus: vec![SkillType::Management],
            videos: vec![video("v1", 1), video("v2", 2)],
            tests: vec![quiz("t1", "v1")],
            artifacts: vec![artifact("a1")],
        }
    }

    fn empty_level(id: &str, order: u32) -> Level {
        Level {
            id: id.to_string(),
            order,
            title: String::new(),
            description: String::new(),
            is_premium: false,
            skills_focus: vec![SkillType::Management],
            videos: vec![],
            tests: vec![],
            artifacts: vec![],
        }
    }

    #[test]
    fn test_gate_is_vacuously_open_for_an_empty_level() {
        let level = empty_level("level-1", 1);
        let progress = UserProgress::new("u1", "level-1");
        assert!(can_complete(&level, &progress));
        assert!(missing_items(&level, &progress).is_empty());
    }

    #[test]
    fn test_gate_reports_every_missing_item() {
        let level = full_level();
        let mut progress = UserProgress::new("u1", "level-1");
        progress.watched_videos.push("v1".to_string());

        let missing = missing_items(&level, &progress);
        assert_eq!(missing.videos, vec!["v2"]);
        assert_eq!(missing.tests, vec!["t1"]);
        assert_eq!(missing.artifacts, vec!["a1"]);
        assert!(!can_complete(&level, &progress));
    }

    #[test]
    fn test_gate_opens_once_everything_is_done() {
        let level = full_level();
        let mut progress = UserProgress::new("u1", "level-1");
        progress.watched_videos = vec!["v1".to_string(), "v2".to_string()];
        progress.completed_tests = vec!["t1".to_string()];
        progress.downloaded_artifacts = vec!["a1".to_string()];

        assert!(can_complete(&level, &progress));
    }

    #[test]
    fn test_gate_closes_on_an_already_completed_level() {
        let level = empty_level("level-1", 1);
        let mut progress = UserProgress::new("u1", "level-1");
        progress.completed_levels.push("level-1".to_string());

        assert!(!can_complete(&level, &progress));
    }

    #[test]
    fn test_advance_moves_the_pointer_and_recomputes_skills() {
        let catalog = Catalog::new(vec![
            empty_level("level-1", 1),
            empty_level("level-2", 2),
        ])
        .unwrap();
        let progress = UserProgress::new("u1", "level-1");

        let updated = advance(
            &progress,
            catalog.by_id("level-1").unwrap(),
            &catalog,
            Utc::now(),
        );
        assert_eq!(updated.completed_levels, vec!["level-1"]);
        assert_eq!(updated.current_level, "level-2");
        assert_eq!(updated.skill_progress[&SkillType::Management], 10);
        assert_eq!(updated.badges.len(), 1);
        assert_eq!(updated.badges[0].id, "badge-first-level");
    }

    #[test]
    fn test_advance_on_the_terminal_level_keeps_the_pointer() {
        let catalog = Catalog::new(vec![empty_level("level-1", 1)]).unwrap();
        let progress = UserProgress::new("u1", "level-1");

        let updated = advance(
            &progress,
            catalog.by_id("level-1").unwrap(),
            &catalog,
            Utc::now(),
        );
        assert_eq!(updated.current_level, "level-1");
        assert_eq!(updated.completed_levels, vec!["level-1"]);
    }
}
