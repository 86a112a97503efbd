use thiserror::Error;

use crate::document::NodeId;

pub type EmailResult<T> = Result<T, EmailError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmailError {
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    // --- validator errors ---

    #[error("Duplicate id {id}: node ids must be unique within the document")]
    DuplicateId { id: NodeId },

    #[error("Id 0 is reserved for the document root but is used by a {kind}")]
    ReservedId { kind: String },

    #[error("Invalid {property} '{value}' on cell {cell}")]
    InvalidAlignment {
        cell: NodeId,
        property: String,
        value: String,
    },

    #[error("Block {block} has format '{format}' which expects {expected} cells, found {found}")]
    CellCountMismatch {
        block: NodeId,
        format: String,
        expected: usize,
        found: usize,
    },
}

impl From<serde_json::Error> for EmailError {
    fn from(err: serde_json::Error) -> Self {
        EmailError::MalformedDocument(err.to_string())
    }
}
