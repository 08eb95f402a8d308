//! Built-in demo catalog
//!
//! Installed on startup when the levels collection is empty so a fresh
//! deployment has something to serve.

use tracing::info;

use common::models::{FileType, Level, LevelArtifact, Question, SkillType, Test, Video};
use common::Result;
use store::DocumentStore;

pub fn demo_catalog() -> Vec<Level> {
    vec![
        Level {
            id: "level-1".to_string(),
            order: 1,
            title: "Goal Setting".to_string(),
            description: "Set business goals you can actually track and reach".to_string(),
            is_premium: false,
            skills_focus: vec![SkillType::Management, SkillType::PersonalSkills],
            videos: vec![
                Video {
                    id: "video-1-1".to_string(),
                    title: "Why goals matter".to_string(),
                    description: "What changes when goals are written down".to_string(),
                    youtube_id: "dQw4w9WgXcQ".to_string(),
                    duration: 180,
                    order: 1,
                },
                Video {
                    id: "video-1-2".to_string(),
                    title: "The SMART approach".to_string(),
                    description: "Making goals measurable and achievable".to_string(),
                    youtube_id: "dQw4w9WgXcQ".to_string(),
                    duration: 240,
                    order: 2,
                },
                Video {
                    id: "video-1-3".to_string(),
                    title: "Tracking progress".to_string(),
                    description: "Tools for monitoring how goals are going".to_string(),
                    youtube_id: "dQw4w9WgXcQ".to_string(),
                    duration: 210,
                    order: 3,
                },
            ],
            tests: vec![Test {
                id: "test-1-1".to_string(),
                after_video_id: "video-1-2".to_string(),
                questions: vec![
                    Question {
                        id: "q-1-1-1".to_string(),
                        text: "What does the S in SMART stand for?".to_string(),
                        options: vec![
                            "Stretching".to_string(),
                            "Specific".to_string(),
                            "Simple".to_string(),
                            "Strategic".to_string(),
                        ],
                        correct_answer: 1,
                    },
                    Question {
                        id: "q-1-1-2".to_string(),
                        text: "Which property does NOT belong to a SMART goal?".to_string(),
                        options: vec![
                            "Measurable".to_string(),
                            "Achievable".to_string(),
                            "Relevant".to_string(),
                            "Theoretical".to_string(),
                        ],
                        correct_answer: 3,
                    },
                ],
            }],
            artifacts: vec![LevelArtifact {
                id: "artifact-1-1".to_string(),
                title: "SMART goals template".to_string(),
                description: "Spreadsheet for planning and tracking SMART goals".to_string(),
                file_url: "/artifacts/smart-goals-template.xlsx".to_string(),
                file_type: FileType::Spreadsheet,
            }],
        },
        Level {
            id: "level-2".to_string(),
            order: 2,
            title: "Express Stress Management".to_string(),
            description: "Staying functional under sustained load".to_string(),
            is_premium: false,
            skills_focus: vec![SkillType::PersonalSkills],
            videos: vec![
                Video {
                    id: "video-2-1".to_string(),
                    title: "Recognizing stress early".to_string(),
                    description: "Signs of building stress in a founder".to_string(),
                    youtube_id: "dQw4w9WgXcQ".to_string(),
                    duration: 180,
                    order: 1,
                },
                Video {
                    id: "video-2-2".to_string(),
                    title: "Five-minute recovery techniques".to_string(),
                    description: "Methods that fit between two meetings".to_string(),
                    youtube_id: "dQw4w9WgXcQ".to_string(),
                    duration: 240,
                    order: 2,
                },
            ],
            tests: vec![],
            artifacts: vec![LevelArtifact {
                id: "artifact-2-1".to_string(),
                title: "Stress management checklist".to_string(),
                description: "Daily techniques in a printable checklist".to_string(),
                file_url: "/artifacts/stress-management-checklist.pdf".to_string(),
                file_type: FileType::Pdf,
            }],
        },
        Level {
            id: "level-3".to_string(),
            order: 3,
            title: "Winning Your First Clients".to_string(),
            description: "Finding, approaching and keeping early customers".to_string(),
            is_premium: false,
            skills_focus: vec![SkillType::ClientWork, SkillType::Networking],
            videos: vec![
                Video {
                    id: "video-3-1".to_string(),
                    title: "Where first clients come from".to_string(),
                    description: "Channels that work before you have a brand".to_string(),
                    youtube_id: "dQw4w9WgXcQ".to_string(),
                    duration: 200,
                    order: 1,
                },
                Video {
                    id: "video-3-2".to_string(),
                    title: "The first conversation".to_string(),
                    description: "Turning an introduction into a deal".to_string(),
                    youtube_id: "dQw4w9WgXcQ".to_string(),
                    duration: 260,
                    order: 2,
                },
            ],
            tests: vec![Test {
                id: "test-3-1".to_string(),
                after_video_id: "video-3-2".to_string(),
                questions: vec![Question {
                    id: "q-3-1-1".to_string(),
                    text: "What should the first client conversation focus on?".to_string(),
                    options: vec![
                        "Your pricing tiers".to_string(),
                        "The client's problem".to_string(),
                        "Your company history".to_string(),
                    ],
                    correct_answer: 1,
                }],
            }],
            artifacts: vec![LevelArtifact {
                id: "artifact-3-1".to_string(),
                title: "Outreach script".to_string(),
                description: "A short script for first-contact messages".to_string(),
                file_url: "/artifacts/outreach-script.docx".to_string(),
                file_type: FileType::Doc,
            }],
        },
    ]
}

/// Install the demo catalog if the levels collection is empty.
/// Returns how many levels were written.
pub async fn ensure_seeded(store: &dyn DocumentStore) -> Result<usize> {
    let existing = store::levels::list(store).await?;
    if !existing.is_empty() {
        return Ok(0);
    }

    let levels = demo_catalog();
    for level in &levels {
        store::levels::put(store, level).await?;
    }
    info!("Seeded demo catalog with {} levels", levels.len());
    Ok(levels.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use store::memory::MemoryStore;

    #[test]
    fn test_demo_catalog_satisfies_the_order_invariant() {
        Catalog::new(demo_catalog()).unwrap();
    }

    #[tokio::test]
    async fn test_seeding_is_a_noop_once_levels_exist() {
        let store = MemoryStore::new();
        assert_eq!(ensure_seeded(&store).await.unwrap(), 3);
        assert_eq!(ensure_seeded(&store).await.unwrap(), 0);
        assert_eq!(store::levels::list(&store).await.unwrap().len(), 3);
    }
}
