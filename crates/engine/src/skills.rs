//! Skill progress scoring
//!
//! Skill percentages are a pure function of the completed-level set: every
//! completed level contributes a fixed number of points to each skill it
//! focuses on, clamped to 100. Recomputing from scratch on every completion
//! keeps the numbers idempotent; there is no incremental accumulator to
//! drift.

use std::collections::BTreeMap;

use common::models::{Level, SkillType, UserProgress};
use serde::Serialize;

use crate::catalog::Catalog;

/// Points each completed level contributes to each focused skill
pub const SKILL_LEVEL_POINTS: u8 = 10;
/// Skill percentages are clamped to this ceiling
pub const SKILL_MAX: u8 = 100;

/// Display metadata for a skill
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillInfo {
    pub skill: SkillType,
    pub display_name: &'static str,
    pub description: &'static str,
    pub color: &'static str,
}

pub fn skill_info(skill: SkillType) -> SkillInfo {
    match skill {
        SkillType::PersonalSkills => SkillInfo {
            skill,
            display_name: "Personal Skills & Growth",
            description: "Self-organization, time management, emotional intelligence",
            color: "#10B981",
        },
        SkillType::Management => SkillInfo {
            skill,
            display_name: "Management & Planning",
            description: "Strategy, planning, team and project management",
            color: "#3B82F6",
        },
        SkillType::Networking => SkillInfo {
            skill,
            display_name: "Networking & Connections",
            description: "Building business relationships and communication",
            color: "#8B5CF6",
        },
        SkillType::ClientWork => SkillInfo {
            skill,
            display_name: "Client Work & Sales",
            description: "Winning and retaining clients, sales, customer service",
            color: "#EC4899",
        },
        SkillType::Finance => SkillInfo {
            skill,
            display_name: "Financial Management",
            description: "Budgeting, financial planning, accounting and analysis",
            color: "#F59E0B",
        },
        SkillType::Legal => SkillInfo {
            skill,
            display_name: "Legal & Accounting",
            description: "Legal foundations of business, taxes, documentation",
            color: "#EF4444",
        },
    }
}

pub fn skills_info() -> Vec<SkillInfo> {
    SkillType::ALL.iter().map(|s| skill_info(*s)).collect()
}

/// Skill percentages for a completed-level set. Every skill appears in the
/// result, zeros included; input order is irrelevant.
pub fn compute_skill_progress(
    completed_level_ids: &[String],
    catalog: &Catalog,
) -> BTreeMap<SkillType, u8> {
    let mut progress: BTreeMap<SkillType, u8> =
        SkillType::ALL.iter().map(|s| (*s, 0)).collect();

    for level in catalog.iter() {
        if !completed_level_ids.iter().any(|id| id == &level.id) {
            continue;
        }
        for skill in &level.skills_focus {
            let entry = progress.entry(*skill).or_insert(0);
            *entry = entry.saturating_add(SKILL_LEVEL_POINTS).min(SKILL_MAX);
        }
    }

    progress
}

/// The ceiling each skill could reach if every level were completed
pub fn max_skill_progress(catalog: &Catalog) -> BTreeMap<SkillType, u8> {
    let all: Vec<String> = catalog.iter().map(|l| l.id.clone()).collect();
    compute_skill_progress(&all, catalog)
}

/// Top `count` skills by percentage, strongest first
pub fn dominant_skills(
    progress: &BTreeMap<SkillType, u8>,
    count: usize,
) -> Vec<(SkillInfo, u8)> {
    let mut ranked: Vec<(SkillInfo, u8)> = SkillType::ALL
        .iter()
        .map(|s| (skill_info(*s), progress.get(s).copied().unwrap_or(0)))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(count);
    ranked
}

/// Levels suggested to shore up a weak skill
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRecommendation {
    pub skill: SkillType,
    pub progress: u8,
    pub recommended_levels: Vec<Level>,
}

const RECOMMENDED_SKILLS: usize = 3;
const RECOMMENDED_LEVELS_PER_SKILL: usize = 2;

/// For the weakest skills, the next uncompleted levels that develop them
pub fn recommendations(
    progress: &UserProgress,
    catalog: &Catalog,
) -> Vec<SkillRecommendation> {
    let mut ranked: Vec<(SkillType, u8)> = SkillType::ALL
        .iter()
        .map(|s| (*s, progress.skill_progress.get(s).copied().unwrap_or(0)))
        .collect();
    ranked.sort_by_key(|&(_, pct)| pct);

    ranked
        .into_iter()
        .take(RECOMMENDED_SKILLS)
        .map(|(skill, pct)| {
            let recommended_levels: Vec<Level> = catalog
                .iter()
                .filter(|level| {
                    !progress.completed_levels.iter().any(|id| id == &level.id)
                        && level.skills_focus.contains(&skill)
                })
                .take(RECOMMENDED_LEVELS_PER_SKILL)
                .cloned()
                .collect();
            SkillRecommendation {
                skill,
                progress: pct,
                recommended_levels,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(id: &str, order: u32, skills: Vec<SkillType>) -> Level {
        Level {
            id: id.to_string(),
            order,
            title: format!("Level {order}"),
            description: String::new(),
            is_premium: false,
            skills_focus: skills,
            videos: vec![],
            tests: vec![],
            artifacts: vec![],
        }
    }

    fn finance_catalog(n: u32) -> Catalog {
        Catalog::new(
            (1..=n)
                .map(|i| level(&format!("level-{i}"), i, vec![SkillType::Finance]))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_each_completed_level_adds_fixed_points() {
        let catalog = Catalog::new(vec![
            level("level-1", 1, vec![SkillType::Management, SkillType::PersonalSkills]),
            level("level-2", 2, vec![SkillType::PersonalSkills]),
        ])
        .unwrap();

        let progress =
            compute_skill_progress(&["level-1".to_string(), "level-2".to_string()], &catalog);

        assert_eq!(progress[&SkillType::Management], 10);
        assert_eq!(progress[&SkillType::PersonalSkills], 20);
        assert_eq!(progress[&SkillType::Finance], 0);
        assert_eq!(progress.len(), SkillType::ALL.len());
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let catalog = finance_catalog(3);
        let forward: Vec<String> = (1..=3).map(|i| format!("level-{i}")).collect();
        let mut reversed = forward.clone();
        reversed.reverse();

        assert_eq!(
            compute_skill_progress(&forward, &catalog),
            compute_skill_progress(&reversed, &catalog)
        );
    }

    #[test]
    fn test_unknown_level_ids_contribute_nothing() {
        let catalog = finance_catalog(1);
        let progress =
            compute_skill_progress(&["level-1".to_string(), "ghost".to_string()], &catalog);
        assert_eq!(progress[&SkillType::Finance], 10);
    }

    #[test]
    fn test_progress_is_monotonic_in_the_completed_set() {
        let catalog = finance_catalog(5);
        let mut completed: Vec<String> = Vec::new();
        let mut previous = compute_skill_progress(&completed, &catalog);

        for i in 1..=5 {
            completed.push(format!("level-{i}"));
            let next = compute_skill_progress(&completed, &catalog);
            for skill in SkillType::ALL {
                assert!(next[&skill] >= previous[&skill]);
                assert!(next[&skill] <= SKILL_MAX);
            }
            previous = next;
        }
    }

    #[test]
    fn test_twelve_finance_levels_cap_at_one_hundred() {
        let catalog = finance_catalog(12);
        let completed: Vec<String> = (1..=12).map(|i| format!("level-{i}")).collect();
        let progress = compute_skill_progress(&completed, &catalog);
        assert_eq!(progress[&SkillType::Finance], 100);
    }

    #[test]
    fn test_max_skill_progress_counts_every_level() {
        let catalog = finance_catalog(3);
        let max = max_skill_progress(&catalog);
        assert_eq!(max[&SkillType::Finance], 30);
        assert_eq!(max[&SkillType::Legal], 0);
    }

    #[test]
    fn test_dominant_skills_rank_strongest_first() {
        let catalog = Catalog::new(vec![
            level("level-1", 1, vec![SkillType::Finance]),
            level("level-2", 2, vec![SkillType::Finance]),
            level("level-3", 3, vec![SkillType::Legal]),
        ])
        .unwrap();
        let progress = compute_skill_progress(
            &(1..=3).map(|i| format!("level-{i}")).collect::<Vec<_>>(),
            &catalog,
        );

        let top = dominant_skills(&progress, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0.skill, SkillType::Finance);
        assert_eq!(top[0].1, 20);
        assert_eq!(top[1].1, 10);
    }

    #[test]
    fn test_recommendations_skip_completed_levels() {
        let catalog = Catalog::new(vec![
            level("level-1", 1, vec![SkillType::Finance]),
            level("level-2", 2, vec![SkillType::Finance]),
            level("level-3", 3, vec![SkillType::Finance]),
        ])
        .unwrap();
        let mut progress = UserProgress::new("u1", "level-1");
        progress.completed_levels.push("level-1".to_string());
        // Everything except finance and legal is well developed, so finance
        // lands among the weakest skills.
        for skill in [
            SkillType::PersonalSkills,
            SkillType::Management,
            SkillType::Networking,
            SkillType::ClientWork,
        ] {
            progress.skill_progress.insert(skill, 40);
        }

        let recs = recommendations(&progress, &catalog);
        assert_eq!(recs.len(), 3);
        let finance = recs.iter().find(|r| r.skill == SkillType::Finance).unwrap();
        let ids: Vec<&str> = finance
            .recommended_levels
            .iter()
            .map(|l| l.id.as_str())
            .collect();
        assert_eq!(ids, vec!["level-2", "level-3"]);
    }
}
