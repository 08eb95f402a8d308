//! In-memory store implementation
//!
//! Collections live in a single `RwLock`, which is what makes `commit`
//! atomic: a batch is validated and applied against a working copy under the
//! write lock and swapped in only if every write succeeds.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use common::{Error, Result};

use crate::{Direction, DocumentStore, Filter, OrderBy, Precondition, Write, WriteBatch};

type Collections = HashMap<String, BTreeMap<String, Value>>;

/// Single-process document store
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        let inner = self.inner.read().await;
        Ok(inner
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn set(&self, collection: &str, id: &str, doc: Value) -> Result<()> {
        let mut inner = self.inner.write().await;
        apply(
            &mut inner,
            &Write::Set {
                collection: collection.to_string(),
                id: id.to_string(),
                doc,
                precondition: None,
            },
        )
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<()> {
        let mut inner = self.inner.write().await;
        apply(
            &mut inner,
            &Write::UpdateFields {
                collection: collection.to_string(),
                id: id.to_string(),
                fields,
            },
        )
    }

    async fn array_union(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: Value,
    ) -> Result<()> {
        let mut inner = self.inner.write().await;
        apply(
            &mut inner,
            &Write::ArrayUnion {
                collection: collection.to_string(),
                id: id.to_string(),
                field: field.to_string(),
                value,
            },
        )
    }

    async fn increment(&self, collection: &str, id: &str, field: &str, delta: i64) -> Result<()> {
        let mut inner = self.inner.write().await;
        apply(
            &mut inner,
            &Write::Increment {
                collection: collection.to_string(),
                id: id.to_string(),
                field: field.to_string(),
                delta,
            },
        )
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        apply(
            &mut inner,
            &Write::Delete {
                collection: collection.to_string(),
                id: id.to_string(),
            },
        )
    }

    async fn query(
        &self,
        collection: &str,
        filters: &[Filter],
        order_by: Option<OrderBy>,
    ) -> Result<Vec<Value>> {
        let inner = self.inner.read().await;
        let mut docs: Vec<Value> = inner
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| filters.iter().all(|f| matches(doc, f)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = order_by {
            docs.sort_by(|a, b| {
                let ord = compare_values(a.get(&order.field), b.get(&order.field));
                match order.direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            });
        }

        Ok(docs)
    }

    async fn commit(&self, batch: WriteBatch) -> Result<()> {
        let mut inner = self.inner.write().await;
        let mut working = inner.clone();
        for write in batch.writes() {
            apply(&mut working, write)?;
        }
        *inner = working;
        Ok(())
    }
}

fn matches(doc: &Value, filter: &Filter) -> bool {
    match filter {
        Filter::Eq(field, value) => doc.get(field) == Some(value),
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .unwrap_or(0.0)
            .partial_cmp(&y.as_f64().unwrap_or(0.0))
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

fn check_precondition(
    collections: &Collections,
    collection: &str,
    id: &str,
    precondition: &Precondition,
) -> Result<()> {
    let current = collections.get(collection).and_then(|docs| docs.get(id));
    match precondition {
        Precondition::Exists(expected) => {
            if current.is_some() != *expected {
                return Err(Error::Conflict(format!(
                    "{collection}/{id}: existence check failed"
                )));
            }
        }
        Precondition::ArrayMissing { field, value } => {
            let present = current
                .and_then(|doc| doc.get(field))
                .and_then(Value::as_array)
                .map(|arr| arr.contains(value))
                .unwrap_or(false);
            if present {
                return Err(Error::Conflict(format!(
                    "{collection}/{id}: {field} already contains {value}"
                )));
            }
        }
    }
    Ok(())
}

fn apply(collections: &mut Collections, write: &Write) -> Result<()> {
    match write {
        Write::Set {
            collection,
            id,
            doc,
            precondition,
        } => {
            if let Some(pre) = precondition {
                check_precondition(collections, collection, id, pre)?;
            }
            collections
                .entry(collection.clone())
                .or_default()
                .insert(id.clone(), doc.clone());
        }
        Write::UpdateFields {
            collection,
            id,
            fields,
        } => {
            let doc = collections
                .get_mut(collection)
                .and_then(|docs| docs.get_mut(id))
                .ok_or_else(|| Error::NotFound(format!("{collection}/{id}")))?;
            let object = doc
                .as_object_mut()
                .ok_or_else(|| Error::Internal(format!("{collection}/{id} is not an object")))?;
            for (key, value) in fields {
                object.insert(key.clone(), value.clone());
            }
        }
        Write::ArrayUnion {
            collection,
            id,
            field,
            value,
        } => {
            let doc = collections
                .entry(collection.clone())
                .or_default()
                .entry(id.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            let object = doc
                .as_object_mut()
                .ok_or_else(|| Error::Internal(format!("{collection}/{id} is not an object")))?;
            let entry = object
                .entry(field.clone())
                .or_insert_with(|| Value::Array(Vec::new()));
            let array = entry.as_array_mut().ok_or_else(|| {
                Error::Internal(format!("{collection}/{id}.{field} is not an array"))
            })?;
            if !array.contains(value) {
                array.push(value.clone());
            }
        }
        Write::Increment {
            collection,
            id,
            field,
            delta,
        } => {
            let doc = collections
                .entry(collection.clone())
                .or_default()
                .entry(id.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            let object = doc
                .as_object_mut()
                .ok_or_else(|| Error::Internal(format!("{collection}/{id} is not an object")))?;
            let current = match object.get(field) {
                Some(Value::Number(n)) => n.as_i64().ok_or_else(|| {
                    Error::Internal(format!("{collection}/{id}.{field} is not an integer"))
                })?,
                Some(_) => {
                    return Err(Error::Internal(format!(
                        "{collection}/{id}.{field} is not numeric"
                    )))
                }
                None => 0,
            };
            object.insert(field.clone(), Value::from(current + delta));
        }
        Write::Delete { collection, id } => {
            if let Some(docs) = collections.get_mut(collection) {
                docs.remove(id);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_and_get_round_trip() {
        let store = MemoryStore::new();
        store
            .set("levels", "level-1", json!({"id": "level-1", "order": 1}))
            .await
            .unwrap();

        let doc = store.get("levels", "level-1").await.unwrap().unwrap();
        assert_eq!(doc["order"], json!(1));
        assert!(store.get("levels", "level-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_array_union_is_idempotent() {
        let store = MemoryStore::new();
        store
            .set("userProgress", "u1", json!({"watchedVideos": []}))
            .await
            .unwrap();

        store
            .array_union("userProgress", "u1", "watchedVideos", json!("v1"))
            .await
            .unwrap();
        store
            .array_union("userProgress", "u1", "watchedVideos", json!("v1"))
            .await
            .unwrap();

        let doc = store.get("userProgress", "u1").await.unwrap().unwrap();
        assert_eq!(doc["watchedVideos"], json!(["v1"]));
    }

    #[tokio::test]
    async fn test_increment_creates_and_accumulates() {
        let store = MemoryStore::new();
        store
            .increment("artifactStats", "a1", "downloadCount", 1)
            .await
            .unwrap();
        store
            .increment("artifactStats", "a1", "downloadCount", 2)
            .await
            .unwrap();

        let doc = store.get("artifactStats", "a1").await.unwrap().unwrap();
        assert_eq!(doc["downloadCount"], json!(3));
    }

    #[tokio::test]
    async fn test_update_fields_requires_existing_document() {
        let store = MemoryStore::new();
        let mut fields = Map::new();
        fields.insert("name".to_string(), json!("x"));

        let err = store
            .update_fields("userProgress", "missing", fields)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_failed_precondition_aborts_entire_batch() {
        let store = MemoryStore::new();
        store
            .set("userProgress", "u1", json!({"completedLevels": ["level-1"]}))
            .await
            .unwrap();

        let batch = WriteBatch::new()
            .increment("artifactStats", "a1", "downloadCount", 1)
            .set_if(
                "userProgress",
                "u1",
                json!({"completedLevels": ["level-1", "level-1"]}),
                Precondition::ArrayMissing {
                    field: "completedLevels".to_string(),
                    value: json!("level-1"),
                },
            );

        let err = store.commit(batch).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));

        // The increment that preceded the failed guard must not have landed.
        assert!(store.get("artifactStats", "a1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_exists_precondition_guards_creation() {
        let store = MemoryStore::new();
        let batch = WriteBatch::new().set_if(
            "userProgress",
            "u1",
            json!({"userId": "u1"}),
            Precondition::Exists(false),
        );
        store.commit(batch).await.unwrap();

        // Second creation attempt loses the race.
        let batch = WriteBatch::new().set_if(
            "userProgress",
            "u1",
            json!({"userId": "u1"}),
            Precondition::Exists(false),
        );
        let err = store.commit(batch).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn test_query_filters_and_orders() {
        let store = MemoryStore::new();
        for (id, order, premium) in [("b", 2, false), ("c", 3, true), ("a", 1, false)] {
            store
                .set(
                    "levels",
                    id,
                    json!({"id": id, "order": order, "isPremium": premium}),
                )
                .await
                .unwrap();
        }

        let docs = store
            .query("levels", &[], Some(OrderBy::asc("order")))
            .await
            .unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        let free = store
            .query(
                "levels",
                &[Filter::Eq("isPremium".to_string(), json!(false))],
                Some(OrderBy::desc("order")),
            )
            .await
            .unwrap();
        let ids: Vec<&str> = free.iter().map(|d| d["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_delete_missing_document_is_noop() {
        let store = MemoryStore::new();
        store.delete("levels", "missing").await.unwrap();
    }
}
