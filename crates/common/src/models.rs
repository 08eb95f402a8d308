//! Domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Competency categories a level can develop
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "camelCase")]
pub enum SkillType {
    PersonalSkills,
    Management,
    Networking,
    ClientWork,
    Finance,
    Legal,
}

impl SkillType {
    pub const ALL: [SkillType; 6] = [
        SkillType::PersonalSkills,
        SkillType::Management,
        SkillType::Networking,
        SkillType::ClientWork,
        SkillType::Finance,
        SkillType::Legal,
    ];
}

/// Video content in a level
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub title: String,
    pub description: String,
    pub youtube_id: String,
    /// Playback length in seconds
    pub duration: u32,
    /// Position within the level
    pub order: u32,
}

/// Question in a quiz
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    /// Index into `options`
    pub correct_answer: usize,
}

/// Quiz shown after a video
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Test {
    pub id: String,
    pub after_video_id: String,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pdf,
    Doc,
    Spreadsheet,
}

/// Downloadable artifact bundled with a level
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LevelArtifact {
    pub id: String,
    pub title: String,
    pub description: String,
    pub file_url: String,
    pub file_type: FileType,
}

/// An ordered unit of course content
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub id: String,
    /// Position in the unlock sequence. Unique and dense, starting at 1.
    pub order: u32,
    pub title: String,
    pub description: String,
    pub is_premium: bool,
    pub skills_focus: Vec<SkillType>,
    pub videos: Vec<Video>,
    pub tests: Vec<Test>,
    pub artifacts: Vec<LevelArtifact>,
}

/// Unlock state of a level for a particular user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LevelStatus {
    Locked,
    Available,
    Completed,
}

/// Achievement flag awarded by a badge rule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub achieved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achieved_at: Option<DateTime<Utc>>,
}

/// The one mutable record per user capturing all completion facts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub user_id: String,
    /// Always a prefix of the order 1..N sequence, enforced by the completion gate
    pub completed_levels: Vec<String>,
    pub current_level: String,
    pub skill_progress: BTreeMap<SkillType, u8>,
    pub badges: Vec<Badge>,
    pub downloaded_artifacts: Vec<String>,
    pub watched_videos: Vec<String>,
    pub completed_tests: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

impl UserProgress {
    /// Fresh record: nothing done, pointing at the first level of the catalog
    pub fn new(user_id: &str, first_level_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            completed_levels: Vec::new(),
            current_level: first_level_id.to_string(),
            skill_progress: SkillType::ALL.iter().map(|s| (*s, 0)).collect(),
            badges: Vec::new(),
            downloaded_artifacts: Vec::new(),
            watched_videos: Vec::new(),
            completed_tests: Vec::new(),
            last_updated: Utc::now(),
        }
    }
}

/// Watch record for a single video
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoProgress {
    pub video_id: String,
    pub watched: bool,
    /// Playback position in seconds at completion time
    pub position: u32,
    pub completed_at: DateTime<Utc>,
}

/// Correctness record for a single answered question
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question_id: String,
    pub answered_option: usize,
    pub is_correct: bool,
}

/// Result record for a single quiz. Recorded but never consulted by gating.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TestProgress {
    pub test_id: String,
    pub completed: bool,
    pub score: u32,
    pub answers: Vec<AnswerRecord>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Russian,
}

/// User preferences. The set of keys is closed: unknown keys are rejected
/// at deserialization time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserPreferences {
    pub language: Language,
    pub email_notifications: bool,
    pub app_notifications: bool,
    pub dark_mode: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            language: Language::English,
            email_notifications: true,
            app_notifications: true,
            dark_mode: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_type_wire_names_are_camel_case() {
        let json = serde_json::to_string(&SkillType::PersonalSkills).unwrap();
        assert_eq!(json, "\"personalSkills\"");
        let json = serde_json::to_string(&SkillType::ClientWork).unwrap();
        assert_eq!(json, "\"clientWork\"");
    }

    #[test]
    fn test_fresh_progress_has_every_skill_at_zero() {
        let progress = UserProgress::new("user-1", "level-1");
        assert_eq!(progress.skill_progress.len(), SkillType::ALL.len());
        assert!(progress.skill_progress.values().all(|&p| p == 0));
        assert_eq!(progress.current_level, "level-1");
        assert!(progress.completed_levels.is_empty());
    }

    #[test]
    fn test_preferences_reject_unknown_keys() {
        let raw = r#"{
            "language": "english",
            "emailNotifications": true,
            "appNotifications": false,
            "darkMode": true,
            "experimentalFlags": {}
        }"#;
        let parsed: Result<UserPreferences, _> = serde_json::from_str(raw);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_preferences_round_trip() {
        let prefs = UserPreferences {
            language: Language::Russian,
            dark_mode: true,
            ..Default::default()
        };
        let json = serde_json::to_string(&prefs).unwrap();
        let back: UserPreferences = serde_json::from_str(&json).unwrap();
        assert_eq!(back, prefs);
    }
}
