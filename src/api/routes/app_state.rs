//! Application state management.
//!
//! Defines the AppState struct that holds all shared application state including
//! the diagram service, session store, token service and database pool.

use crate::config::ApiConfig;
use crate::middleware::rate_limit::{RateLimiterState, create_rate_limiter};
use crate::services::{DiagramService, JwtService, SharedJwtService};
use crate::storage::{DiagramStore, InMemoryDiagramStore, PostgresDiagramStore, StorageError};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

use super::auth::{SessionStore, new_session_store};

/// Application state shared across all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// Upsert/read logic over the storage backend
    pub diagram_service: DiagramService,
    /// Registered sessions (session_id -> metadata)
    pub session_store: SessionStore,
    /// Token signing and validation
    pub jwt_service: SharedJwtService,
    /// PostgreSQL database connection pool (optional)
    pub database: Option<PgPool>,
    /// Shared request quota
    pub rate_limiter: RateLimiterState,
}

impl AppState {
    /// Create application state backed by in-memory storage.
    pub fn new(config: &ApiConfig) -> Self {
        Self::with_storage(Arc::new(InMemoryDiagramStore::new()), config)
    }

    /// Create application state over an explicit storage backend.
    pub fn with_storage(storage: Arc<dyn DiagramStore>, config: &ApiConfig) -> Self {
        Self {
            diagram_service: DiagramService::new(storage),
            session_store: new_session_store(),
            jwt_service: Arc::new(JwtService::new(&config.jwt_secret)),
            database: None,
            rate_limiter: create_rate_limiter(config.rate_limit_per_minute),
        }
    }

    /// Initialize storage backend from configuration.
    ///
    /// Connects to PostgreSQL and runs migrations if DATABASE_URL is set,
    /// otherwise keeps the in-memory store.
    pub async fn init_storage(&mut self, config: &ApiConfig) -> Result<(), StorageError> {
        let Some(database_url) = config.database_url.as_deref() else {
            info!("DATABASE_URL not set, using in-memory diagram storage");
            return Ok(());
        };

        let pool = PgPool::connect(database_url).await.map_err(|e| {
            StorageError::ConnectionError(format!("Failed to connect to database: {}", e))
        })?;

        let backend = PostgresDiagramStore::new(pool.clone());
        backend.migrate().await?;
        info!("Connected to PostgreSQL diagram storage");

        let storage: Arc<dyn DiagramStore> = Arc::new(backend);
        self.diagram_service = DiagramService::new(storage);
        self.database = Some(pool);
        Ok(())
    }

    /// Check if PostgreSQL storage is enabled
    pub fn is_postgres(&self) -> bool {
        self.database.is_some()
    }
}
