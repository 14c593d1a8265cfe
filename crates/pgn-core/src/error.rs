//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PgnError {
    #[error("Invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("Exercise catalogue error: {0}")]
    Catalogue(#[from] serde_json::Error),
}

impl PgnError {
    pub fn invalid_fen(fen: &str, reason: impl ToString) -> Self {
        Self::InvalidFen {
            fen: fen.to_string(),
            reason: reason.to_string(),
        }
    }
}
