//! Diagram model.
//!
//! Represents user-owned diagrams: a name, a visibility flag and an opaque graph payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identifier assigned by storage on first persist.
pub type DiagramId = i64;

/// Identifier of an authenticated user.
pub type UserId = i64;

/// Serialized graph as sent by the client.
///
/// Never parsed or validated here; the service only checks that it is not empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct GraphPayload(String);

impl GraphPayload {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for GraphPayload {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// Diagram model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Diagram {
    /// Unique identifier for the diagram
    pub id: DiagramId,
    /// User who created the diagram
    pub owner_id: UserId,
    /// Diagram name
    pub name: String,
    /// Whether other users may read the diagram
    pub is_public: bool,
    /// Opaque serialized graph
    #[schema(value_type = String)]
    pub graph_json: GraphPayload,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Validated field set written on every persist.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramFields {
    pub owner_id: UserId,
    pub name: String,
    pub is_public: bool,
    pub graph_json: GraphPayload,
}

/// Form body of the save endpoint (form-url-encoded)
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct SaveDiagramForm {
    /// Existing diagram id; blank or absent creates a new diagram
    pub diagram_id: Option<String>,
    /// Diagram name
    pub name: Option<String>,
    /// Serialized graph
    pub graph_json: Option<String>,
    /// Visibility flag ("1"/"0", "true"/"false", "on"/"off", "yes"/"no")
    pub public: Option<String>,
}

/// Response of a successful save
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SaveDiagramResponse {
    /// Id of the created or updated diagram
    pub id: DiagramId,
    /// True when the request created a new diagram
    pub created: bool,
}

/// Listing entry, without the graph payload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DiagramSummary {
    pub id: DiagramId,
    pub name: String,
    pub is_public: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<&Diagram> for DiagramSummary {
    fn from(diagram: &Diagram) -> Self {
        Self {
            id: diagram.id,
            name: diagram.name.clone(),
            is_public: diagram.is_public,
            updated_at: diagram.updated_at,
        }
    }
}
