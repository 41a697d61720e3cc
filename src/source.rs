//! The seam to the host's data layer.
//!
//! A [`ChangelistSource`] hands the changelist the full stored object set
//! for a model as `serde_json::Value`s; filtering, searching, ordering,
//! and pagination all happen on top, in the changelist itself, so the
//! interactive page and every export render from exactly the same
//! pipeline. [`InMemorySource`] is the bundled implementation for tests
//! and development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::AdminError;
use crate::model_admin::ModelAdmin;

/// Supplies the stored objects behind a model's changelist.
///
/// Implementations bridge to whatever actually holds the data: a SQL
/// backend, a remote API, or the in-memory store below. The trait is
/// object-safe so sites can hold it as `Arc<dyn ChangelistSource>`.
#[async_trait]
pub trait ChangelistSource: Send + Sync {
    /// Returns every stored object for the model, in storage order.
    async fn objects(&self, admin: &ModelAdmin) -> Result<Vec<serde_json::Value>, AdminError>;
}

/// Storage for one model's objects.
#[derive(Debug, Clone)]
struct ModelTable {
    objects: Vec<serde_json::Value>,
    next_id: u64,
}

impl ModelTable {
    const fn new() -> Self {
        Self {
            objects: Vec::new(),
            next_id: 1,
        }
    }
}

/// In-memory [`ChangelistSource`] with auto-incrementing primary keys.
///
/// Thread-safe via `Arc<RwLock<...>>`; clones share the same tables.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use exportable_admin::model_admin::ModelAdmin;
/// use exportable_admin::source::InMemorySource;
///
/// let source = InMemorySource::new();
/// let admin = ModelAdmin::new("shop", "order");
/// let mut data = HashMap::new();
/// data.insert("customer".to_string(), serde_json::json!("Acme"));
/// let stored = source.insert(&admin, &data);
/// assert_eq!(stored["id"], 1);
/// ```
#[derive(Debug, Clone)]
pub struct InMemorySource {
    tables: Arc<RwLock<HashMap<String, ModelTable>>>,
}

impl InMemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Stores an object, assigning the next primary key, and returns the
    /// stored value.
    pub fn insert(
        &self,
        admin: &ModelAdmin,
        data: &HashMap<String, serde_json::Value>,
    ) -> serde_json::Value {
        let pk_field = Self::pk_field(admin);
        let mut tables = self.tables.write().unwrap();
        let table = tables
            .entry(admin.model_key())
            .or_insert_with(ModelTable::new);

        let mut obj = serde_json::Map::new();
        let id = table.next_id;
        table.next_id += 1;
        obj.insert(pk_field, serde_json::json!(id));
        for (key, value) in data {
            obj.insert(key.clone(), value.clone());
        }

        let value = serde_json::Value::Object(obj);
        table.objects.push(value.clone());
        value
    }

    /// Returns the number of objects stored for a model.
    pub fn count(&self, model_key: &str) -> usize {
        let tables = self.tables.read().unwrap();
        tables.get(model_key).map_or(0, |t| t.objects.len())
    }

    /// Removes all objects from all tables.
    pub fn clear(&self) {
        let mut tables = self.tables.write().unwrap();
        tables.clear();
    }

    /// Finds the primary-key field name from the admin configuration.
    fn pk_field(admin: &ModelAdmin) -> String {
        admin
            .fields_schema
            .iter()
            .find(|f| f.primary_key)
            .map_or_else(|| "id".to_string(), |f| f.name.clone())
    }
}

impl Default for InMemorySource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChangelistSource for InMemorySource {
    async fn objects(&self, admin: &ModelAdmin) -> Result<Vec<serde_json::Value>, AdminError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .get(&admin.model_key())
            .map_or_else(Vec::new, |t| t.objects.clone()))
    }
}
