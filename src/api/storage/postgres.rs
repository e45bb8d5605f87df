//! PostgreSQL storage backend implementation.
//!
//! Uses sqlx for database operations and implements the DiagramStore trait.

use super::{StorageError, traits::DiagramStore};
use crate::models::{Diagram, DiagramFields, DiagramId, GraphPayload, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Row shape of the `diagrams` table
#[derive(sqlx::FromRow)]
struct DiagramRow {
    id: i64,
    owner_id: i64,
    name: String,
    is_public: bool,
    graph_json: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DiagramRow> for Diagram {
    fn from(row: DiagramRow) -> Self {
        Self {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            is_public: row.is_public,
            graph_json: GraphPayload::from(row.graph_json),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL storage backend implementation.
pub struct PostgresDiagramStore {
    pool: PgPool,
}

impl PostgresDiagramStore {
    /// Create a new PostgreSQL storage backend.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply pending schema migrations.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::ConnectionError(format!("Migration failed: {}", e)))
    }
}

#[async_trait]
impl DiagramStore for PostgresDiagramStore {
    async fn load_diagram(&self, id: DiagramId) -> Result<Option<Diagram>, StorageError> {
        let row = sqlx::query_as::<_, DiagramRow>(
            r#"
            SELECT id, owner_id, name, is_public, graph_json, created_at, updated_at
            FROM diagrams
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Diagram::from))
    }

    async fn persist_diagram(
        &self,
        id: Option<DiagramId>,
        fields: &DiagramFields,
    ) -> Result<DiagramId, StorageError> {
        let now = Utc::now();

        match id {
            None => {
                let id = sqlx::query_scalar::<_, i64>(
                    r#"
                    INSERT INTO diagrams (owner_id, name, is_public, graph_json, created_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5, $5)
                    RETURNING id
                    "#,
                )
                .bind(fields.owner_id)
                .bind(&fields.name)
                .bind(fields.is_public)
                .bind(fields.graph_json.as_str())
                .bind(now)
                .fetch_one(&self.pool)
                .await?;

                Ok(id)
            }
            Some(id) => {
                // owner_id is immutable after insert
                let updated = sqlx::query_scalar::<_, i64>(
                    r#"
                    UPDATE diagrams
                    SET name = $2, is_public = $3, graph_json = $4, updated_at = $5
                    WHERE id = $1
                    RETURNING id
                    "#,
                )
                .bind(id)
                .bind(&fields.name)
                .bind(fields.is_public)
                .bind(fields.graph_json.as_str())
                .bind(now)
                .fetch_optional(&self.pool)
                .await?;

                updated.ok_or_else(|| StorageError::diagram_not_found(id))
            }
        }
    }

    async fn list_diagrams_by_owner(&self, owner_id: UserId) -> Result<Vec<Diagram>, StorageError> {
        let rows = sqlx::query_as::<_, DiagramRow>(
            r#"
            SELECT id, owner_id, name, is_public, graph_json, created_at, updated_at
            FROM diagrams
            WHERE owner_id = $1
            ORDER BY id
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Diagram::from).collect())
    }
}
