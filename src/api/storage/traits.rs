//! Storage trait definitions for the diagram storage backends.

use crate::models::{Diagram, DiagramFields, DiagramId, UserId};

/// Storage backend trait for diagram persistence.
///
/// Backends provide their own durability and row-level consistency; callers
/// perform at most one load and one persist per request.
#[async_trait::async_trait]
pub trait DiagramStore: Send + Sync {
    /// Load a diagram by ID
    async fn load_diagram(&self, id: DiagramId) -> Result<Option<Diagram>, super::StorageError>;

    /// Create (`id == None`) or update a diagram, returning its ID.
    ///
    /// Updates write name, visibility and payload only; `owner_id` is set once on insert.
    async fn persist_diagram(
        &self,
        id: Option<DiagramId>,
        fields: &DiagramFields,
    ) -> Result<DiagramId, super::StorageError>;

    /// List diagrams owned by a user, ordered by ID
    async fn list_diagrams_by_owner(
        &self,
        owner_id: UserId,
    ) -> Result<Vec<Diagram>, super::StorageError>;
}
