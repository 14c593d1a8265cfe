//! Viewer error types

use std::path::PathBuf;

use pgn_core::PgnError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Configuration error: {0}")]
    Config(&'static str),

    #[error("Cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Core(#[from] PgnError),

    #[error("Unknown command '{0}', type 'help'")]
    UnknownCommand(String),

    #[error("No exercise numbered {0} in the current list")]
    NoSuchExercise(usize),
}

impl ViewerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
