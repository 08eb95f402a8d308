//! Badge rules and evaluation
//!
//! The rule set is a table, walked in order. Adding a badge means adding a
//! row, not touching the traversal.

use chrono::{DateTime, Utc};

use common::models::{Badge, UserProgress};

pub struct BadgeRule {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub earned: fn(&UserProgress) -> bool,
}

fn first_level(progress: &UserProgress) -> bool {
    !progress.completed_levels.is_empty()
}

fn five_levels(progress: &UserProgress) -> bool {
    progress.completed_levels.len() >= 5
}

fn five_artifacts(progress: &UserProgress) -> bool {
    progress.downloaded_artifacts.len() >= 5
}

pub const RULES: &[BadgeRule] = &[
    BadgeRule {
        id: "badge-first-level",
        name: "First Steps",
        description: "Completed your first level",
        earned: first_level,
    },
    BadgeRule {
        id: "badge-halfway",
        name: "Halfway There",
        description: "Completed 5 levels",
        earned: five_levels,
    },
    BadgeRule {
        id: "badge-collector",
        name: "Resource Collector",
        description: "Downloaded 5 artifacts",
        earned: five_artifacts,
    },
];

/// Badges newly earned by `progress`, skipping any already held
pub fn evaluate(progress: &UserProgress, now: DateTime<Utc>) -> Vec<Badge> {
    RULES
        .iter()
        .filter(|rule| !progress.badges.iter().any(|b| b.id == rule.id))
        .filter(|rule| (rule.earned)(progress))
        .map(|rule| Badge {
            id: rule.id.to_string(),
            name: rule.name.to_string(),
            description: rule.description.to_string(),
            achieved: true,
            achieved_at: Some(now),
        })
        .collect()
}
