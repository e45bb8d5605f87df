//! Services module - contains the diagram upsert logic and token handling.

pub mod diagram_service;
pub mod jwt_service;

// Re-export for convenience
pub use diagram_service::{
    DiagramService, DiagramServiceError, UpsertDiagram, UpsertOutcome, can_read, can_write,
};
pub use jwt_service::{Claims, JwtService, SharedJwtService, TokenPair, TokenType};
