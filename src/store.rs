//! Almacenamiento en memoria detrás de una interfaz `Store`.
//!
//! Sólo lo usa el feed de publicaciones; el pipeline de tests no lo toca.

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registro identificable por `id`.
pub trait Record: Clone + Send + Sync {
    fn id(&self) -> &str;
}

pub trait Store<T: Record>: Send + Sync {
    fn find(&self, predicate: &dyn Fn(&T) -> bool) -> Vec<T>;
    fn insert(&self, record: T) -> T;
    /// Devuelve el registro actualizado o `None` si el `id` no existe.
    fn update(&self, id: &str, apply: &mut dyn FnMut(&mut T)) -> Option<T>;
}

#[derive(Debug)]
pub struct InMemoryStore<T> {
    records: RwLock<Vec<T>>,
}

impl<T> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Record> InMemoryStore<T> {
    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

impl<T: Record> Store<T> for InMemoryStore<T> {
    fn find(&self, predicate: &dyn Fn(&T) -> bool) -> Vec<T> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        records.iter().filter(|r| predicate(r)).cloned().collect()
    }

    fn insert(&self, record: T) -> T {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        records.push(record.clone());
        record
    }

    fn update(&self, id: &str, apply: &mut dyn FnMut(&mut T)) -> Option<T> {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        let record = records.iter_mut().find(|r| r.id() == id)?;
        apply(record);
        Some(record.clone())
    }
}

/// Publicación del feed de la comunidad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub content: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
}

impl Record for Post {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Post {
    pub fn new(author_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            author_id: author_id.into(),
            created_at: Utc::now(),
        }
    }
}

/// Publicaciones, las más recientes primero; opcionalmente de un único autor.
pub fn list_posts(store: &dyn Store<Post>, author_id: Option<&str>) -> Vec<Post> {
    let mut posts = store.find(&|post: &Post| author_id.map_or(true, |a| post.author_id == a));
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    posts
}
