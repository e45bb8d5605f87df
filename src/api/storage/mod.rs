//! Storage module for the API.
//!
//! Provides diagram storage backends for PostgreSQL and process memory.

pub mod error;
pub mod traits;

// Storage backend implementations
pub mod memory;
pub mod postgres;

pub use error::StorageError;
pub use memory::InMemoryDiagramStore;
pub use postgres::PostgresDiagramStore;
pub use traits::DiagramStore;
