//! Document store boundary for BizLevel
//!
//! The backing database is an external collaborator modeled as a key-value
//! collection store: JSON documents addressed by (collection, id), with
//! atomic add-unique-to-set and increment primitives and an atomic multi
//! document batch. One implementation ships: [`memory::MemoryStore`].

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

use common::Result;

pub mod activity;
pub mod artifacts;
pub mod levels;
pub mod memory;
pub mod preferences;
pub mod progress;
pub mod retry;

/// Collection names
pub mod collections {
    pub const LEVELS: &str = "levels";
    pub const USER_PROGRESS: &str = "userProgress";
    pub const VIDEO_PROGRESS: &str = "videoProgress";
    pub const TEST_PROGRESS: &str = "testProgress";
    pub const ARTIFACT_STATS: &str = "artifactStats";
    pub const PREFERENCES: &str = "userPreferences";
}

/// Equality filter over a top-level document field
#[derive(Debug, Clone)]
pub enum Filter {
    Eq(String, Value),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Sort directive for collection scans
#[derive(Debug, Clone)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn asc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: Direction::Desc,
        }
    }
}

/// Guard evaluated against the current document state at commit time.
/// A failed guard aborts the whole batch with [`common::Error::Conflict`].
#[derive(Debug, Clone)]
pub enum Precondition {
    /// The document must exist (true) or must not exist (false)
    Exists(bool),
    /// The array field must not already contain the value
    ArrayMissing { field: String, value: Value },
}

/// A single write inside an atomic batch
#[derive(Debug, Clone)]
pub enum Write {
    Set {
        collection: String,
        id: String,
        doc: Value,
        precondition: Option<Precondition>,
    },
    UpdateFields {
        collection: String,
        id: String,
        fields: Map<String, Value>,
    },
    ArrayUnion {
        collection: String,
        id: String,
        field: String,
        value: Value,
    },
    Increment {
        collection: String,
        id: String,
        field: String,
        delta: i64,
    },
    Delete {
        collection: String,
        id: String,
    },
}

/// Writes applied atomically: either every write lands or none does
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    writes: Vec<Write>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, collection: &str, id: &str, doc: Value) -> Self {
        self.writes.push(Write::Set {
            collection: collection.to_string(),
            id: id.to_string(),
            doc,
            precondition: None,
        });
        self
    }

    /// A `set` guarded by an optimistic check against the current document
    pub fn set_if(
        mut self,
        collection: &str,
        id: &str,
        doc: Value,
        precondition: Precondition,
    ) -> Self {
        self.writes.push(Write::Set {
            collection: collection.to_string(),
            id: id.to_string(),
            doc,
            precondition: Some(precondition),
        });
        self
    }

    pub fn update_fields(mut self, collection: &str, id: &str, fields: Map<String, Value>) -> Self {
        self.writes.push(Write::UpdateFields {
            collection: collection.to_string(),
            id: id.to_string(),
            fields,
        });
        self
    }

    pub fn array_union(mut self, collection: &str, id: &str, field: &str, value: Value) -> Self {
        self.writes.push(Write::ArrayUnion {
            collection: collection.to_string(),
            id: id.to_string(),
            field: field.to_string(),
            value,
        });
        self
    }

    pub fn increment(mut self, collection: &str, id: &str, field: &str, delta: i64) -> Self {
        self.writes.push(Write::Increment {
            collection: collection.to_string(),
            id: id.to_string(),
            field: field.to_string(),
            delta,
        });
        self
    }

    pub fn delete(mut self, collection: &str, id: &str) -> Self {
        self.writes.push(Write::Delete {
            collection: collection.to_string(),
            id: id.to_string(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn writes(&self) -> &[Write] {
        &self.writes
    }
}

/// The key-value collection store interface
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document by id, `None` if absent
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>>;

    /// Create or replace a document
    async fn set(&self, collection: &str, id: &str, doc: Value) -> Result<()>;

    /// Merge top-level fields into an existing document. `NotFound` if absent.
    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<()>;

    /// Atomically add a value to an array field unless already present
    async fn array_union(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: Value,
    ) -> Result<()>;

    /// Atomically add `delta` to a numeric field, creating it at `delta`
    async fn increment(&self, collection: &str, id: &str, field: &str, delta: i64) -> Result<()>;

    /// Remove a document. Removing an absent document is a no-op.
    async fn delete(&self, collection: &str, id: &str) -> Result<()>;

    /// Filtered, optionally ordered collection scan
    async fn query(
        &self,
        collection: &str,
        filters: &[Filter],
        order_by: Option<OrderBy>,
    ) -> Result<Vec<Value>>;

    /// Apply a batch atomically. Any failed precondition aborts every write.
    async fn commit(&self, batch: WriteBatch) -> Result<()>;
}

/// Shared handle to the store implementation behind the trait
pub type StoreHandle = Arc<dyn DocumentStore>;
