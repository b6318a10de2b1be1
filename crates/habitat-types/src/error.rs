use thiserror::Error;

use crate::validation::ValidationErrors;

/// Errors produced while decoding or validating entities.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    /// The payload is not valid JSON for the requested kind.
    #[error("unable to parse {kind}, {reason}")]
    Parse { kind: &'static str, reason: String },

    /// The payload decoded but one or more fields break the field rules.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("unknown direction: {0}")]
    InvalidDirection(String),
}

impl TypeError {
    pub(crate) fn parse(kind: &'static str, err: serde_json::Error) -> Self {
        Self::Parse {
            kind,
            reason: err.to_string(),
        }
    }
}
