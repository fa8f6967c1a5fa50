use thiserror::Error;

mod domain_types;
mod ids;
mod records;

pub use domain_types::*;
pub use ids::*;
pub use records::*;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Token cannot be empty")]
    EmptyToken,

    #[error("Invalid token format: {0}")]
    InvalidToken(String),

    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Empty required field: {0}")]
    EmptyField(&'static str),

    #[error("Invalid sheet range: {0}")]
    InvalidSheetRange(String),

    #[error("Webhook registry must contain a \"default\" entry")]
    MissingDefaultWebhook,

    #[error("Chunk size must be at least 1")]
    ZeroChunkSize,

    #[error("Row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid key=value pair: {0}")]
    InvalidAssignment(String),
}
