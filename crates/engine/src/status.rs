//! Level unlock status resolution

use common::models::{Level, LevelStatus, UserProgress};

use crate::catalog::Catalog;

/// Status of one level for one user. Pure; safe to call from any number of
/// rendering contexts at once.
pub fn resolve_status(level: &Level, catalog: &Catalog, progress: &UserProgress) -> LevelStatus {
    if progress.completed_levels.iter().any(|id| id == &level.id) {
        return LevelStatus::Completed;
    }

    if progress.current_level == level.id || level.order == 1 {
        return LevelStatus::Available;
    }

    // A missing predecessor fails closed: the level stays locked.
    match catalog.by_order(level.order.saturating_sub(1)) {
        Some(prev) if progress.completed_levels.iter().any(|id| id == &prev.id) => {
            LevelStatus::Available
        }
        _ => LevelStatus::Locked,
    }
}

/// Status of every level in catalog order, for rendering the level map
pub fn statuses<'a>(
    catalog: &'a Catalog,
    progress: &UserProgress,
) -> Vec<(&'a Level, LevelStatus)> {
    catalog
        .iter()
        .map(|level| (level, resolve_status(level, catalog, progress)))
        .collect()
}
