//! Loads the exercise list from disk.

use std::fs;
use std::path::Path;

use pgn_core::exercise::{Exercise, ExerciseCatalog};
use tracing::info;

use crate::error::ViewerError;

/// Read a catalogue: `.pgn` files hold one or more games, anything else is
/// parsed as exercises JSON.
pub fn load_catalog(path: &Path) -> Result<ExerciseCatalog, ViewerError> {
    let text = fs::read_to_string(path).map_err(|e| ViewerError::io(path, e))?;

    let is_pgn = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pgn"));

    let catalog = if is_pgn {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("game");
        catalog_from_pgn(stem, &text)
    } else {
        ExerciseCatalog::from_json(&text)?
    };

    info!(path = %path.display(), exercises = catalog.len(), "Catalogue loaded");
    Ok(catalog)
}

/// One exercise per game. Games are titled after the file, numbered when
/// there is more than one.
pub fn catalog_from_pgn(stem: &str, text: &str) -> ExerciseCatalog {
    let games = split_games(text);
    let numbered = games.len() > 1;

    let exercises = games
        .iter()
        .enumerate()
        .map(|(i, game)| {
            let title = if numbered {
                format!("{stem} {}", i + 1)
            } else {
                stem.to_string()
            };
            Exercise::from_pgn(Some(title), game)
        })
        .collect();

    ExerciseCatalog::new(exercises)
}

/// Split a multi-game PGN file: a tag-pair line after movetext starts a new
/// game. Lines inside a multi-line comment never do.
pub fn split_games(text: &str) -> Vec<String> {
    let mut games = Vec::new();
    let mut current = String::new();
    let mut seen_movetext = false;
    let mut in_comment = false;

    for line in text.lines() {
        let trimmed = line.trim_start();
        if !in_comment && trimmed.starts_with('[') {
            if seen_movetext {
                games.push(std::mem::take(&mut current));
                seen_movetext = false;
            }
        } else if !trimmed.is_empty() {
            seen_movetext = true;
        }
        for ch in line.chars() {
            match ch {
                '{' => in_comment = true,
                '}' => in_comment = false,
                _ => {}
            }
        }
        current.push_str(line);
        current.push('\n');
    }

    if !current.trim().is_empty() {
        games.push(current);
    }
    games
}
