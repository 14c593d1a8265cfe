//! Viewer configuration from environment variables and the command line

use std::env;
use std::path::PathBuf;

use crate::error::ViewerError;

const DEFAULT_SCROLL_HEIGHT: usize = 12;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewerConfig {
    /// Exercises JSON or a `.pgn` file
    pub source: PathBuf,

    /// Search term; the first matching exercise is opened on start
    pub exercise: Option<String>,

    /// Visible move-list lines
    pub scroll_height: usize,

    /// Print sanitized markup instead of the text move list
    pub markup: bool,

    /// Where `download` writes PGN files
    pub download_dir: PathBuf,
}

impl ViewerConfig {
    /// Load configuration from the environment. A source path given on the
    /// command line wins over `PGN_VIEWER_SOURCE`.
    pub fn from_env(cli_source: Option<String>) -> Result<Self, ViewerError> {
        Self::from_lookup(cli_source, |key| env::var(key).ok())
    }

    pub fn from_lookup(
        cli_source: Option<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ViewerError> {
        let source = cli_source
            .or_else(|| lookup("PGN_VIEWER_SOURCE"))
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .ok_or(ViewerError::Config(
                "PGN_VIEWER_SOURCE not set and no file given",
            ))?;

        let exercise = lookup("PGN_VIEWER_EXERCISE").filter(|s| !s.trim().is_empty());

        let scroll_height = lookup("PGN_VIEWER_SCROLL_HEIGHT")
            .and_then(|v| v.trim().parse().ok())
            .filter(|&h: &usize| h > 0)
            .unwrap_or(DEFAULT_SCROLL_HEIGHT);

        let markup = lookup("PGN_VIEWER_MARKUP")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true"))
            .unwrap_or(false);

        let download_dir = lookup("PGN_VIEWER_DOWNLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            source,
            exercise,
            scroll_height,
            markup,
            download_dir,
        })
    }
}
