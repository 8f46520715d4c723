//! Test search engines — mock `SearchEngine` implementations for tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use eventsearch_core::engine::SearchEngine;
use eventsearch_core::error::DomainError;
use serde_json::{Value, json};

/// Default hit count when a query body carries no `size`.
const DEFAULT_SIZE: usize = 10;

#[derive(Debug, Clone)]
struct StoredIndex {
    mapping: Value,
    documents: BTreeMap<String, Value>,
}

/// An in-memory engine that records index creations and stores upserted
/// documents.
///
/// Search understands only `{"query": {"match": {field: text}}}`: a document
/// matches when any whitespace-separated, case-folded term of `text` equals a
/// term of the value found at the dotted `field` path. Arrays along the path
/// are searched element by element. As with the real engine, a plain match
/// never sees fields below a `nested` object in the index mapping.
#[derive(Debug)]
pub struct InMemorySearchEngine {
    indices: Mutex<BTreeMap<String, StoredIndex>>,
    create_calls: Mutex<Vec<String>>,
    rejected_ids: Mutex<BTreeSet<String>>,
    reachable: AtomicBool,
}

impl Default for InMemorySearchEngine {
    fn default() -> Self {
        Self {
            indices: Mutex::new(BTreeMap::new()),
            create_calls: Mutex::new(Vec::new()),
            rejected_ids: Mutex::new(BTreeSet::new()),
            reachable: AtomicBool::new(true),
        }
    }
}

impl InMemorySearchEngine {
    /// Create an empty, reachable engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later call behave as if the engine went down (or came
    /// back).
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Makes later upserts of document `id` fail with `BadRequest`, as the
    /// engine does for a document it cannot parse.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn reject_document(&self, id: &str) {
        self.rejected_ids.lock().unwrap().insert(id.to_owned());
    }

    /// Names passed to `create_index`, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn create_calls(&self) -> Vec<String> {
        self.create_calls.lock().unwrap().clone()
    }

    /// The mapping `index` was created with.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn mapping(&self, index: &str) -> Option<Value> {
        self.indices
            .lock()
            .unwrap()
            .get(index)
            .map(|i| i.mapping.clone())
    }

    /// The document stored under `id` in `index`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn document(&self, index: &str, id: &str) -> Option<Value> {
        self.indices
            .lock()
            .unwrap()
            .get(index)
            .and_then(|i| i.documents.get(id).cloned())
    }

    /// Every document in `index`, ordered by id.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn documents(&self, index: &str) -> Vec<(String, Value)> {
        self.indices
            .lock()
            .unwrap()
            .get(index)
            .map(|i| {
                i.documents
                    .iter()
                    .map(|(id, doc)| (id.clone(), doc.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn ensure_reachable(&self) -> Result<(), DomainError> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DomainError::IndexUnavailable("connection refused".into()))
        }
    }
}

fn terms(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

fn collect_leaves<'a>(value: &'a Value, path: &[&str], out: &mut Vec<&'a Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_leaves(item, path, out);
            }
        }
        _ => match path.split_first() {
            None => out.push(value),
            Some((head, rest)) => {
                if let Some(child) = value.get(*head) {
                    collect_leaves(child, rest, out);
                }
            }
        },
    }
}

/// Returns `true` if any object along `field` is mapped as `nested`.
fn crosses_nested(mapping: &Value, field: &str) -> bool {
    let mut properties = &mapping["mappings"]["properties"];
    for segment in field.split('.') {
        let property = &properties[segment];
        if property["type"] == "nested" {
            return true;
        }
        properties = &property["properties"];
    }
    false
}

fn matches(document: &Value, field: &str, query: &str) -> bool {
    let path: Vec<&str> = field.split('.').collect();
    let mut leaves = Vec::new();
    collect_leaves(document, &path, &mut leaves);

    let wanted = terms(query);
    leaves.into_iter().any(|leaf| {
        let text = match leaf {
            Value::String(s) => s.clone(),
            Value::Null => return false,
            other => other.to_string(),
        };
        let found = terms(&text);
        wanted.iter().any(|w| found.contains(w))
    })
}

#[async_trait]
impl SearchEngine for InMemorySearchEngine {
    async fn ping(&self) -> bool {
        self.reachable.load(Ordering::SeqCst)
    }

    async fn index_exists(&self, index: &str) -> Result<bool, DomainError> {
        self.ensure_reachable()?;
        Ok(self.indices.lock().unwrap().contains_key(index))
    }

    async fn create_index(&self, index: &str, mapping: &Value) -> Result<(), DomainError> {
        self.ensure_reachable()?;
        self.create_calls.lock().unwrap().push(index.to_owned());
        let mut indices = self.indices.lock().unwrap();
        if indices.contains_key(index) {
            return Err(DomainError::BadRequest(format!(
                "resource_already_exists_exception: index [{index}] already exists"
            )));
        }
        indices.insert(
            index.to_owned(),
            StoredIndex {
                mapping: mapping.clone(),
                documents: BTreeMap::new(),
            },
        );
        Ok(())
    }

    async fn upsert(&self, index: &str, id: &str, document: &Value) -> Result<Value, DomainError> {
        self.ensure_reachable()?;
        if self.rejected_ids.lock().unwrap().contains(id) {
            return Err(DomainError::BadRequest(format!(
                "mapper_parsing_exception: failed to parse document [{id}]"
            )));
        }
        let mut indices = self.indices.lock().unwrap();
        // Like the real engine, writing to a missing index creates it
        // without a mapping.
        let stored = indices.entry(index.to_owned()).or_insert_with(|| StoredIndex {
            mapping: Value::Null,
            documents: BTreeMap::new(),
        });
        let result = if stored
            .documents
            .insert(id.to_owned(), document.clone())
            .is_some()
        {
            "updated"
        } else {
            "created"
        };
        Ok(json!({ "_index": index, "_id": id, "result": result }))
    }

    async fn search(&self, index: &str, body: &Value) -> Result<Vec<Value>, DomainError> {
        self.ensure_reachable()?;
        let indices = self.indices.lock().unwrap();
        let stored = indices
            .get(index)
            .ok_or_else(|| DomainError::BadRequest(format!("no such index [{index}]")))?;

        let Some((field, query)) = body["query"]["match"]
            .as_object()
            .and_then(|m| m.iter().next())
        else {
            return Err(DomainError::BadRequest("unsupported query".into()));
        };
        let query = query.as_str().unwrap_or_default();
        let size = body["size"]
            .as_u64()
            .and_then(|s| usize::try_from(s).ok())
            .unwrap_or(DEFAULT_SIZE);
        if crosses_nested(&stored.mapping, field) {
            return Ok(Vec::new());
        }

        Ok(stored
            .documents
            .iter()
            .filter(|(_, doc)| matches(doc, field, query))
            .take(size)
            .map(|(id, doc)| json!({ "_index": index, "_id": id, "_score": 1.0, "_source": doc }))
            .collect())
    }
}

/// An engine that is never reachable. Useful for testing error paths.
#[derive(Debug)]
pub struct UnreachableSearchEngine;

#[async_trait]
impl SearchEngine for UnreachableSearchEngine {
    async fn ping(&self) -> bool {
        false
    }

    async fn index_exists(&self, _index: &str) -> Result<bool, DomainError> {
        Err(DomainError::IndexUnavailable("connection refused".into()))
    }

    async fn create_index(&self, _index: &str, _mapping: &Value) -> Result<(), DomainError> {
        Err(DomainError::IndexUnavailable("connection refused".into()))
    }

    async fn upsert(
        &self,
        _index: &str,
        _id: &str,
        _document: &Value,
    ) -> Result<Value, DomainError> {
        Err(DomainError::IndexUnavailable("connection refused".into()))
    }

    async fn search(&self, _index: &str, _body: &Value) -> Result<Vec<Value>, DomainError> {
        Err(DomainError::IndexUnavailable("connection refused".into()))
    }
}
