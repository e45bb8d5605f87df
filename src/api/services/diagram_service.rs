//! Diagram upsert service.
//!
//! Creates a new diagram or updates one owned by the caller. The caller id is
//! always an explicit argument; this module never looks at request state.
//!
//! Flow for a write:
//! 1. `name` and `graph_json` must be non-empty, otherwise `Validation` with no storage access
//! 2. no `diagram_id` creates a diagram owned by the caller
//! 3. a `diagram_id` is loaded and must be owned by the caller, otherwise `Unauthorized`
//! 4. exactly one persist call writes the validated fields

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::models::{Diagram, DiagramFields, DiagramId, GraphPayload, SaveDiagramForm, UserId};
use crate::storage::{DiagramStore, StorageError};

/// Errors surfaced by the diagram service.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiagramServiceError {
    /// Required field missing/empty or malformed input
    #[error("Invalid request: {0}")]
    Validation(String),
    /// Caller may not access the referenced diagram (or it does not exist)
    #[error("Not authorized to access this diagram")]
    Unauthorized,
    /// Storage collaborator failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Decoded upsert input.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertDiagram {
    pub diagram_id: Option<DiagramId>,
    pub name: String,
    pub graph_json: GraphPayload,
    pub is_public: Option<bool>,
}

impl UpsertDiagram {
    /// Decode the transport form.
    ///
    /// Required-field checks are left to [`DiagramService::upsert`] so that every
    /// entry point shares them.
    pub fn from_form(form: SaveDiagramForm) -> Result<Self, DiagramServiceError> {
        let diagram_id = match form.diagram_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<DiagramId>().map_err(|_| {
                DiagramServiceError::Validation(format!("diagram_id '{}' is not a number", raw))
            })?),
        };

        Ok(Self {
            diagram_id,
            name: form.name.unwrap_or_default(),
            graph_json: GraphPayload::new(form.graph_json.unwrap_or_default()),
            is_public: parse_visibility(form.public.as_deref())?,
        })
    }
}

/// Result of a successful upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub diagram_id: DiagramId,
    pub created: bool,
}

/// Parse the boolean-like visibility flag. Blank means omitted.
pub fn parse_visibility(raw: Option<&str>) -> Result<Option<bool>, DiagramServiceError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(Some(true)),
        "0" | "false" | "off" | "no" => Ok(Some(false)),
        _ => Err(DiagramServiceError::Validation(format!(
            "public flag '{}' is not a boolean",
            raw
        ))),
    }
}

/// Only the owner may write a diagram.
pub fn can_write(caller: UserId, diagram: &Diagram) -> bool {
    diagram.owner_id == caller
}

/// Owners and anyone for public diagrams may read.
pub fn can_read(caller: UserId, diagram: &Diagram) -> bool {
    diagram.is_public || can_write(caller, diagram)
}

/// Service wrapping the storage collaborator.
#[derive(Clone)]
pub struct DiagramService {
    storage: Arc<dyn DiagramStore>,
}

impl DiagramService {
    pub fn new(storage: Arc<dyn DiagramStore>) -> Self {
        Self { storage }
    }

    /// Create or update a diagram on behalf of `caller`.
    ///
    /// An omitted visibility flag stores `false` on both create and update.
    pub async fn upsert(
        &self,
        caller: UserId,
        request: UpsertDiagram,
    ) -> Result<UpsertOutcome, DiagramServiceError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(DiagramServiceError::Validation(
                "name is required".to_string(),
            ));
        }
        if request.graph_json.is_empty() {
            return Err(DiagramServiceError::Validation(
                "graph_json is required".to_string(),
            ));
        }
        // Postgres TEXT columns cannot hold NUL
        if name.contains('\0') || request.graph_json.as_str().contains('\0') {
            return Err(DiagramServiceError::Validation(
                "name and graph_json must not contain NUL characters".to_string(),
            ));
        }

        if let Some(id) = request.diagram_id {
            // Missing and foreign diagrams look the same to the caller
            let Some(existing) = self.storage.load_diagram(id).await? else {
                warn!("User {} attempted to update missing diagram {}", caller, id);
                return Err(DiagramServiceError::Unauthorized);
            };
            if !can_write(caller, &existing) {
                warn!(
                    "User {} attempted to update diagram {} owned by {}",
                    caller, id, existing.owner_id
                );
                return Err(DiagramServiceError::Unauthorized);
            }
        }

        let fields = DiagramFields {
            owner_id: caller,
            name: name.to_string(),
            is_public: request.is_public.unwrap_or(false),
            graph_json: request.graph_json,
        };

        let diagram_id = self
            .storage
            .persist_diagram(request.diagram_id, &fields)
            .await?;
        let created = request.diagram_id.is_none();

        info!(
            "{} diagram {} for user {} ({} bytes, public: {})",
            if created { "Created" } else { "Updated" },
            diagram_id,
            caller,
            fields.graph_json.len(),
            fields.is_public
        );

        Ok(UpsertOutcome {
            diagram_id,
            created,
        })
    }

    /// Fetch a diagram the caller may read.
    pub async fn get(
        &self,
        caller: UserId,
        id: DiagramId,
    ) -> Result<Diagram, DiagramServiceError> {
        match self.storage.load_diagram(id).await? {
            Some(diagram) if can_read(caller, &diagram) => Ok(diagram),
            _ => {
                warn!("User {} denied read of diagram {}", caller, id);
                Err(DiagramServiceError::Unauthorized)
            }
        }
    }

    /// Diagrams owned by the caller, ordered by id.
    pub async fn list_owned(&self, caller: UserId) -> Result<Vec<Diagram>, DiagramServiceError> {
        Ok(self.storage.list_diagrams_by_owner(caller).await?)
    }
}
