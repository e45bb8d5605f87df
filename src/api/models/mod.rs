// Models module - contains the Diagram record and its request/response shapes

pub mod diagram;

pub use diagram::{
    Diagram, DiagramFields, DiagramId, DiagramSummary, GraphPayload, SaveDiagramForm,
    SaveDiagramResponse, UserId,
};
