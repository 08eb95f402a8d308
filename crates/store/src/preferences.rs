//! User preference persistence

use common::models::UserPreferences;
use common::{Error, Result};

use crate::{collections, DocumentStore};

/// Preferences for a user, defaults if never saved
pub async fn get(store: &dyn DocumentStore, user_id: &str) -> Result<UserPreferences> {
    match store.get(collections::PREFERENCES, user_id).await? {
        Some(doc) => serde_json::from_value(doc)
            .map_err(|e| Error::Internal(format!("invalid preferences document: {e}"))),
        None => Ok(UserPreferences::default()),
    }
}

/// Save preferences for a user
pub async fn put(
    store: &dyn DocumentStore,
    user_id: &str,
    preferences: &UserPreferences,
) -> Result<()> {
    let doc = serde_json::to_value(preferences)
        .map_err(|e| Error::Internal(format!("failed to encode preferences: {e}")))?;
    store.set(collections::PREFERENCES, user_id, doc).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use common::models::Language;

    #[tokio::test]
    async fn test_defaults_until_saved() {
        let store = MemoryStore::new();
        let prefs = get(&store, "u1").await.unwrap();
        assert_eq!(prefs, UserPreferences::default());

        let updated = UserPreferences {
            language: Language::Russian,
            dark_mode: true,
            ..Default::default()
        };
        put(&store, "u1", &updated).await.unwrap();
        assert_eq!(get(&store, "u1").await.unwrap(), updated);
    }
}
