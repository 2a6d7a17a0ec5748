//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("Model response is not valid JSON: {detail}")]
    ResponseParse {
        detail: String,
        /// Raw model output, retained for diagnostics.
        raw: String,
    },

    #[error("Model response failed schema validation: {detail}")]
    SchemaValidation {
        detail: String,
        /// Offending JSON payload, retained for diagnostics.
        raw: String,
    },

    #[error("Slide continuity violated after {stage}: missing ids {missing:?}")]
    SlideContinuity {
        stage: String,
        missing: Vec<String>,
    },

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }

    /// The raw model payload attached to this error, if any
    pub fn raw_payload(&self) -> Option<&str> {
        match self {
            DomainError::ResponseParse { raw, .. } | DomainError::SchemaValidation { raw, .. } => {
                Some(raw)
            }
            _ => None,
        }
    }
}
