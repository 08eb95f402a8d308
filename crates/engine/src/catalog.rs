//! Validated level catalog
//!
//! The unlock sequence is defined entirely by `Level::order`. The catalog
//! refuses to build unless orders are unique, dense and start at 1; every
//! "previous level" lookup downstream depends on that.

use std::collections::HashMap;

use common::models::{Level, LevelArtifact, Test, Video};
use common::{Error, Result};

#[derive(Debug)]
pub struct Catalog {
    /// Sorted by order
    levels: Vec<Level>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(mut levels: Vec<Level>) -> Result<Self> {
        levels.sort_by_key(|l| l.order);
        for (i, level) in levels.iter().enumerate() {
            let expected = (i + 1) as u32;
            if level.order != expected {
                return Err(Error::Catalog(format!(
                    "level order must be unique and dense starting at 1: \
                     expected {expected}, found {} ({})",
                    level.order, level.id
                )));
            }
        }

        let mut by_id = HashMap::new();
        for (i, level) in levels.iter().enumerate() {
            if by_id.insert(level.id.clone(), i).is_some() {
                return Err(Error::Catalog(format!("duplicate level id: {}", level.id)));
            }
        }

        Ok(Self { levels, by_id })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.levels.iter()
    }

    /// First level of the unlock sequence
    pub fn first(&self) -> Option<&Level> {
        self.levels.first()
    }

    pub fn by_id(&self, id: &str) -> Option<&Level> {
        self.by_id.get(id).map(|&i| &self.levels[i])
    }

    pub fn by_order(&self, order: u32) -> Option<&Level> {
        let index = order.checked_sub(1)? as usize;
        self.levels.get(index)
    }

    /// The level unlocked by completing `level`, `None` on the last level
    pub fn next_after(&self, level: &Level) -> Option<&Level> {
        self.by_order(level.order + 1)
    }

    /// Level by id, loud failure when absent
    pub fn require(&self, id: &str) -> Result<&Level> {
        self.by_id(id)
            .ok_or_else(|| Error::NotFound(format!("level {id}")))
    }

    /// Video by id together with its owning level, loud failure when absent
    pub fn require_video(&self, video_id: &str) -> Result<(&Level, &Video)> {
        self.levels
            .iter()
            .find_map(|level| {
                level
                    .videos
                    .iter()
                    .find(|v| v.id == video_id)
                    .map(|v| (level, v))
            })
            .ok_or_else(|| Error::NotFound(format!("video {video_id}")))
    }

    /// Test by id together with its owning level, loud failure when absent
    pub fn require_test(&self, test_id: &str) -> Result<(&Level, &Test)> {
        self.levels
            .iter()
            .find_map(|level| {
                level
                    .tests
                    .iter()
                    .find(|t| t.id == test_id)
                    .map(|t| (level, t))
            })
            .ok_or_else(|| Error::NotFound(format!("test {test_id}")))
    }

    /// Artifact by id together with its owning level, loud failure when absent
    pub fn require_artifact(&self, artifact_id: &str) -> Result<(&Level, &LevelArtifact)> {
        self.levels
            .iter()
            .find_map(|level| {
                level
                    .artifacts
                    .iter()
                    .find(|a| a.id == artifact_id)
                    .map(|a| (level, a))
            })
            .ok_or_else(|| Error::NotFound(format!("artifact {artifact_id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::models::SkillType;

    fn level(id: &str, order: u32) -> Level {
        Level {
            id: id.to_string(),
            order,
            title: format!("Level {order}"),
            description: String::new(),
            is_premium: false,
            skills_focus: vec![SkillType::Management],
            videos: vec![],
            tests: vec![],
            artifacts: vec![],
        }
    }

    #[test]
    fn test_accepts_dense_orders_in_any_input_order() {
        let catalog =
            Catalog::new(vec![level("b", 2), level("c", 3), level("a", 1)]).unwrap();
        assert_eq!(catalog.first().unwrap().id, "a");
        assert_eq!(catalog.by_order(3).unwrap().id, "c");
        assert_eq!(catalog.next_after(catalog.by_id("a").unwrap()).unwrap().id, "b");
        assert!(catalog.next_after(catalog.by_id("c").unwrap()).is_none());
    }

    #[test]
    fn test_rejects_gap_in_orders() {
        let err = Catalog::new(vec![level("a", 1), level("b", 3)]).unwrap_err();
        assert!(matches!(err, Error::Catalog(_)));
    }

    #[test]
    fn test_rejects_duplicate_orders() {
        let err = Catalog::new(vec![level("a", 1), level("b", 1)]).unwrap_err();
        assert!(matches!(err, Error::Catalog(_)));
    }

    #[test]
    fn test_rejects_orders_not_starting_at_one() {
        let err = Catalog::new(vec![level("a", 2), level("b", 3)]).unwrap_err();
        assert!(matches!(err, Error::Catalog(_)));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = Catalog::new(vec![level("a", 1), level("a", 2)]).unwrap_err();
        assert!(matches!(err, Error::Catalog(_)));
    }

    #[test]
    fn test_empty_catalog_is_valid_but_has_no_first() {
        let catalog = Catalog::new(vec![]).unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.first().is_none());
    }

    #[test]
    fn test_require_reports_missing_ids_loudly() {
        let catalog = Catalog::new(vec![level("a", 1)]).unwrap();
        assert!(matches!(catalog.require("zzz"), Err(Error::NotFound(_))));
        assert!(matches!(
            catalog.require_video("v-zzz"),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            catalog.require_test("t-zzz"),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            catalog.require_artifact("a-zzz"),
            Err(Error::NotFound(_))
        ));
    }
}
