//! The board view: at most one open exercise and its session.
//!
//! Every command is a no-op while no board is shown.

use tracing::info;

use crate::exercise::{Exercise, Heading};
use crate::navigation::{BoardSession, ViewUpdate};
use crate::render::{MarkupSanitizer, NO_MOVES_MARKUP};
use crate::rules::{ChessRules, ShakmatyRules};
use crate::tree::{BlockId, MoveId};

pub struct Viewer<R = ShakmatyRules> {
    open: Option<(Exercise, BoardSession<R>)>,
}

impl<R: ChessRules + Default> Default for Viewer<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ChessRules + Default> Viewer<R> {
    pub fn new() -> Self {
        Self { open: None }
    }

    /// Open `exercise`, discarding whatever was shown before.
    pub fn show(&mut self, exercise: Exercise) -> ViewUpdate {
        self.hide();
        let session = BoardSession::<R>::open(exercise.pgn());
        info!(
            id = ?exercise.id,
            title = exercise.title.as_deref().unwrap_or(""),
            plies = session.mainline().len(),
            "Exercise opened"
        );
        let update = session.view(false);
        self.open = Some((exercise, session));
        update
    }

    pub fn hide(&mut self) {
        if let Some((_, session)) = self.open.take() {
            session.close();
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn exercise(&self) -> Option<&Exercise> {
        self.open.as_ref().map(|(exercise, _)| exercise)
    }

    pub fn session(&self) -> Option<&BoardSession<R>> {
        self.open.as_ref().map(|(_, session)| session)
    }

    pub fn heading(&self) -> Option<Heading> {
        self.exercise().map(Exercise::heading)
    }

    /// File name and PGN text of the open exercise.
    pub fn download(&self) -> Option<(String, &str)> {
        self.exercise()?.download()
    }

    pub fn render_markup(&self, sanitizer: &dyn MarkupSanitizer) -> String {
        match self.session() {
            Some(session) => session.render_markup(sanitizer),
            None => NO_MOVES_MARKUP.to_string(),
        }
    }

    pub fn on_move_clicked(&mut self, ply: usize) -> Option<ViewUpdate> {
        self.session_mut()?.on_move_clicked(ply)
    }

    pub fn on_variation_move_clicked(&mut self, id: MoveId) -> Option<ViewUpdate> {
        self.session_mut()?.on_variation_move_clicked(id)
    }

    pub fn on_toggle_clicked(&mut self, block: BlockId) -> Option<bool> {
        self.session_mut()?.on_toggle_clicked(block)
    }

    pub fn previous_move(&mut self) -> Option<ViewUpdate> {
        self.session_mut()?.previous_move()
    }

    pub fn next_move(&mut self) -> Option<ViewUpdate> {
        self.session_mut()?.next_move()
    }

    pub fn reset_board(&mut self) -> Option<ViewUpdate> {
        self.session_mut()?.reset()
    }

    pub fn last_move(&mut self) -> Option<ViewUpdate> {
        self.session_mut()?.jump_to_end()
    }

    pub fn go_to_move(&mut self, ply: usize) -> Option<ViewUpdate> {
        self.session_mut()?.go_to_ply(ply)
    }

    pub fn go_to_position(&mut self, fen: &str, source: Option<MoveId>) -> Option<ViewUpdate> {
        self.session_mut()?.go_to_position(fen, source)
    }

    fn session_mut(&mut self) -> Option<&mut BoardSession<R>> {
        self.open.as_mut().map(|(_, session)| session)
    }
}
