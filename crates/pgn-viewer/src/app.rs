//! Interactive viewer: applies commands and renders the resulting screen.

use std::fs;
use std::path::PathBuf;

use pgn_core::exercise::ExerciseCatalog;
use pgn_core::scroll::ScrollViewport;
use pgn_core::{BoardSession, ViewUpdate, Viewer};
use serde_json::json;
use tracing::{debug, info};

use crate::commands::{Command, HELP};
use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::sanitize::AllowListSanitizer;
use crate::text_view::{board_diagram, MoveList};

/// Lines from the bottom edge that already count as out of view.
const SCROLL_MARGIN_LINES: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue(String),
    Quit,
}

pub struct App {
    catalog: ExerciseCatalog,
    /// Catalogue indices currently listed.
    filtered: Vec<usize>,
    viewer: Viewer,
    viewport: ScrollViewport,
    markup: bool,
    download_dir: PathBuf,
}

impl App {
    pub fn new(catalog: ExerciseCatalog, config: &ViewerConfig) -> Self {
        let filtered = catalog.filter("");
        Self {
            catalog,
            filtered,
            viewer: Viewer::new(),
            viewport: ScrollViewport::new(config.scroll_height as f64)
                .with_margin(SCROLL_MARGIN_LINES),
            markup: config.markup,
            download_dir: config.download_dir.clone(),
        }
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    /// First screen: the first exercise matching `term`, or the list.
    pub fn start(&mut self, term: Option<&str>) -> String {
        if let Some(term) = term {
            self.filtered = self.catalog.filter(term);
            if !self.filtered.is_empty() {
                return self.select(1).unwrap_or_default();
            }
            info!(term = %term, "No exercise matches the start filter");
        }
        self.list()
    }

    pub fn handle_line(&mut self, line: &str) -> Result<Outcome, ViewerError> {
        if line.trim().is_empty() {
            return Ok(Outcome::Continue(String::new()));
        }
        self.handle(line.parse()?)
    }

    pub fn handle(&mut self, command: Command) -> Result<Outcome, ViewerError> {
        debug!(command = ?command, "Handling command");

        let output = match command {
            Command::Previous => {
                let update = self.viewer.previous_move();
                self.apply(update)
            }
            Command::Next => {
                let update = self.viewer.next_move();
                self.apply(update)
            }
            Command::Reset => {
                let update = self.viewer.reset_board();
                self.apply(update)
            }
            Command::End => {
                let update = self.viewer.last_move();
                self.apply(update)
            }
            Command::GoToMove(ply) => {
                let update = self.viewer.go_to_move(ply);
                self.apply(update)
            }
            Command::Click(id) => {
                let update = self.viewer.on_variation_move_clicked(id);
                self.apply(update)
            }
            Command::Toggle(block) => match self.viewer.on_toggle_clicked(block) {
                Some(_) => self.screen(),
                None => String::new(),
            },
            Command::List => self.list(),
            Command::Search(term) => {
                self.filtered = self.catalog.filter(&term);
                self.list()
            }
            Command::Select(n) => self.select(n)?,
            Command::Close => {
                self.viewer.hide();
                "Board closed.".to_string()
            }
            Command::Board => self.screen(),
            Command::State => self.state(),
            Command::Download => self.download()?,
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Outcome::Quit),
        };

        Ok(Outcome::Continue(output))
    }

    fn select(&mut self, n: usize) -> Result<String, ViewerError> {
        let exercise = n
            .checked_sub(1)
            .and_then(|pos| self.filtered.get(pos))
            .and_then(|&idx| self.catalog.get(idx))
            .cloned()
            .ok_or(ViewerError::NoSuchExercise(n))?;

        self.viewer.show(exercise);
        self.viewport.scroll_top = 0.0;
        Ok(self.screen())
    }

    /// Render after a command; a no-op prints nothing.
    fn apply(&mut self, update: Option<ViewUpdate>) -> String {
        let Some(update) = update else {
            return String::new();
        };

        if update.scroll_to_active {
            if let Some(line) = self.move_list().and_then(|list| list.active_line) {
                let relative_top = line as f64 - self.viewport.scroll_top;
                if self.viewport.scroll_into_view(relative_top) {
                    debug!(scroll_top = self.viewport.scroll_top, "Move list scrolled");
                }
            }
        }
        self.screen()
    }

    fn move_list(&self) -> Option<MoveList> {
        let session = self.viewer.session()?;
        Some(MoveList::build(
            session.tree(),
            session.active_move(),
            session.expanded(),
        ))
    }

    fn screen(&self) -> String {
        let Some(session) = self.viewer.session() else {
            return "No exercise open. Type 'list' and 'select <n>'.".to_string();
        };

        let mut out = String::new();
        if let Some(heading) = self.viewer.heading() {
            out.push_str(&heading.title);
            out.push('\n');
            if !heading.subtitle.is_empty() {
                out.push_str(&heading.subtitle);
                out.push('\n');
            }
            out.push('\n');
        }

        out.push_str(&board_diagram(session.position(), session.last_move()));
        out.push('\n');
        out.push_str(&status_line(session));
        out.push('\n');

        if self.markup {
            out.push_str(&self.viewer.render_markup(&AllowListSanitizer));
            out.push('\n');
        } else if let Some(list) = self.move_list() {
            for line in list.window(&self.viewport) {
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }

    fn list(&self) -> String {
        if self.filtered.is_empty() {
            return "No exercises found.".to_string();
        }
        self.catalog
            .labels(&self.filtered)
            .into_iter()
            .map(|(_, text)| text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn state(&self) -> String {
        match self.viewer.session() {
            Some(session) => json!({
                "exercise": self.viewer.exercise().and_then(|e| e.title.clone()),
                "current_move_index": session.current_move_index(),
                "mainline_length": session.mainline().len(),
                "in_variation": session.is_in_variation(),
                "fen": session.position(),
                "buttons": session.buttons(),
            })
            .to_string(),
            None => json!({ "open": false }).to_string(),
        }
    }

    fn download(&self) -> Result<String, ViewerError> {
        let Some((filename, pgn)) = self.viewer.download() else {
            return Ok("Nothing to download.".to_string());
        };
        let path = self.download_dir.join(filename);
        fs::write(&path, pgn).map_err(|e| ViewerError::io(&path, e))?;
        info!(path = %path.display(), "PGN saved");
        Ok(format!("Saved {}", path.display()))
    }
}

fn status_line(session: &BoardSession) -> String {
    let buttons = session.buttons();
    format!(
        "{} move {}/{}{} {}",
        if buttons.previous_enabled { "[<]" } else { "[ ]" },
        session.current_move_index(),
        session.mainline().len(),
        if session.is_in_variation() { " (variation)" } else { "" },
        if buttons.next_enabled { "[>]" } else { "[ ]" },
    )
}
