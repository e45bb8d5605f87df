//! In-memory storage backend.
//!
//! Used when no DATABASE_URL is configured, and by the test suites.

use super::{StorageError, traits::DiagramStore};
use crate::models::{Diagram, DiagramFields, DiagramId, UserId};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::Mutex;

/// Diagram store kept in process memory.
pub struct InMemoryDiagramStore {
    diagrams: Mutex<HashMap<DiagramId, Diagram>>,
    next_id: AtomicI64,
}

impl InMemoryDiagramStore {
    /// Create an empty store; the first diagram gets id 1.
    pub fn new() -> Self {
        Self {
            diagrams: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Insert a fully-formed diagram, keeping its id. Later allocations skip past it.
    pub async fn seed(&self, diagram: Diagram) {
        self.next_id.fetch_max(diagram.id + 1, Ordering::SeqCst);
        self.diagrams.lock().await.insert(diagram.id, diagram);
    }

    /// Number of stored diagrams
    pub async fn len(&self) -> usize {
        self.diagrams.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.diagrams.lock().await.is_empty()
    }
}

impl Default for InMemoryDiagramStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DiagramStore for InMemoryDiagramStore {
    async fn load_diagram(&self, id: DiagramId) -> Result<Option<Diagram>, StorageError> {
        Ok(self.diagrams.lock().await.get(&id).cloned())
    }

    async fn persist_diagram(
        &self,
        id: Option<DiagramId>,
        fields: &DiagramFields,
    ) -> Result<DiagramId, StorageError> {
        let now = Utc::now();
        let mut diagrams = self.diagrams.lock().await;

        match id {
            Some(id) => {
                let diagram = diagrams
                    .get_mut(&id)
                    .ok_or_else(|| StorageError::diagram_not_found(id))?;
                diagram.name = fields.name.clone();
                diagram.is_public = fields.is_public;
                diagram.graph_json = fields.graph_json.clone();
                diagram.updated_at = now;
                Ok(id)
            }
            None => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                diagrams.insert(
                    id,
                    Diagram {
                        id,
                        owner_id: fields.owner_id,
                        name: fields.name.clone(),
                        is_public: fields.is_public,
                        graph_json: fields.graph_json.clone(),
                        created_at: now,
                        updated_at: now,
                    },
                );
                Ok(id)
            }
        }
    }

    async fn list_diagrams_by_owner(&self, owner_id: UserId) -> Result<Vec<Diagram>, StorageError> {
        let mut owned: Vec<Diagram> = self
            .diagrams
            .lock()
            .await
            .values()
            .filter(|d| d.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by_key(|d| d.id);
        Ok(owned)
    }
}
