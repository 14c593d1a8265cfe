//! Board session: the navigation state machine over one opened game.
//!
//! The viewer is either on the mainline at `current_move_index` (0 = start
//! position) or on an arbitrary variation position. Every command returns the
//! [`ViewUpdate`] the UI should apply, or `None` when it was a no-op.

use std::collections::BTreeSet;
use std::marker::PhantomData;

use serde::Serialize;
use shakmaty::Square;
use tracing::debug;

use crate::mainline::MainlineRecord;
use crate::parser::parse_game;
use crate::render::{render_sanitized, MarkupSanitizer, RenderState};
use crate::rules::{ChessRules, ShakmatyRules};
use crate::tree::{BlockId, MoveId, MoveTree, Node};

/// Enabled state of the previous/next buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct NavButtons {
    pub previous_enabled: bool,
    pub next_enabled: bool,
}

/// Everything the UI has to refresh after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewUpdate {
    pub fen: String,
    /// From/to squares of the move that led to `fen`, if known.
    pub last_move: Option<(Square, Square)>,
    pub active_move: Option<MoveId>,
    pub buttons: NavButtons,
    /// Bring the active move into view.
    pub scroll_to_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub current_move_index: usize,
    pub in_variation: bool,
    /// Variation move currently shown, if any.
    pub last_clicked: Option<MoveId>,
}

/// Both passes over one game's PGN.
#[derive(Debug, Clone)]
pub struct LoadedGame {
    pub tree: MoveTree,
    pub mainline: MainlineRecord,
}

impl LoadedGame {
    pub fn load<R: ChessRules + Default>(pgn: &str) -> Self {
        Self {
            mainline: MainlineRecord::build::<R>(pgn),
            tree: parse_game::<R>(pgn),
        }
    }
}

pub struct BoardSession<R = ShakmatyRules> {
    game: LoadedGame,
    state: NavigationState,
    position: String,
    last_move: Option<(Square, Square)>,
    expanded: BTreeSet<BlockId>,
    _rules: PhantomData<fn() -> R>,
}

impl<R: ChessRules + Default> BoardSession<R> {
    pub fn open(pgn: &str) -> Self {
        let game = LoadedGame::load::<R>(pgn);
        let position = game.mainline.start_fen().to_string();
        debug!(
            plies = game.mainline.len(),
            variations = game.tree.block_count(),
            "Board session opened"
        );

        Self {
            game,
            state: NavigationState::default(),
            position,
            last_move: None,
            expanded: BTreeSet::new(),
            _rules: PhantomData,
        }
    }

    pub fn close(self) {
        debug!(index = self.state.current_move_index, "Board session closed");
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn current_move_index(&self) -> usize {
        self.state.current_move_index
    }

    pub fn is_in_variation(&self) -> bool {
        self.state.in_variation
    }

    /// FEN currently on the board.
    pub fn position(&self) -> &str {
        &self.position
    }

    pub fn last_move(&self) -> Option<(Square, Square)> {
        self.last_move
    }

    pub fn tree(&self) -> &MoveTree {
        &self.game.tree
    }

    pub fn mainline(&self) -> &MainlineRecord {
        &self.game.mainline
    }

    pub fn buttons(&self) -> NavButtons {
        NavButtons {
            previous_enabled: !(self.state.current_move_index == 0 && !self.state.in_variation),
            next_enabled: self.state.current_move_index < self.game.mainline.len(),
        }
    }

    /// The highlighted move element: the clicked move inside a variation,
    /// otherwise the mainline move that led to the current position.
    pub fn active_move(&self) -> Option<MoveId> {
        if self.state.in_variation {
            if let Some(id) = self.state.last_clicked {
                return Some(id);
            }
        }
        let ply = self.state.current_move_index.checked_sub(1)?;
        self.game.tree.mainline_move(ply).map(|m| m.id)
    }

    pub fn is_expanded(&self, block: BlockId) -> bool {
        self.expanded.contains(&block)
    }

    pub fn expanded(&self) -> &BTreeSet<BlockId> {
        &self.expanded
    }

    pub fn view(&self, scroll_to_active: bool) -> ViewUpdate {
        ViewUpdate {
            fen: self.position.clone(),
            last_move: self.last_move,
            active_move: self.active_move(),
            buttons: self.buttons(),
            scroll_to_active,
        }
    }

    /// Jump to mainline ply `ply` (0-based), showing the position after it.
    pub fn go_to_ply(&mut self, ply: usize) -> Option<ViewUpdate> {
        if ply >= self.game.mainline.len() {
            return None;
        }
        self.state.current_move_index = ply + 1;
        self.leave_variation();
        self.show_mainline();
        Some(self.view(true))
    }

    /// Show an arbitrary position, typically a clicked variation move.
    pub fn go_to_position(&mut self, fen: &str, source: Option<MoveId>) -> Option<ViewUpdate> {
        if fen.is_empty() {
            return None;
        }
        if let Some(id) = source {
            self.game.tree.find_move(id)?;
        }

        self.position = fen.to_string();
        self.state.in_variation = true;
        self.state.last_clicked = source;
        self.last_move = source.and_then(|id| self.replay_squares(id));
        debug!(fen = %fen, source = ?source, "Entered variation position");
        Some(self.view(source.is_some()))
    }

    pub fn previous_move(&mut self) -> Option<ViewUpdate> {
        if self.state.in_variation {
            self.leave_variation();
            self.show_mainline();
            return Some(self.view(false));
        }
        if self.state.current_move_index == 0 {
            return None;
        }
        self.state.current_move_index -= 1;
        self.show_mainline();
        Some(self.view(true))
    }

    /// Step forward. Inside a variation this first returns to the mainline at
    /// the current index. No-op at the end of the mainline, variation or not.
    pub fn next_move(&mut self) -> Option<ViewUpdate> {
        if self.state.current_move_index >= self.game.mainline.len() {
            return None;
        }
        self.leave_variation();
        self.state.current_move_index += 1;
        self.show_mainline();
        Some(self.view(true))
    }

    pub fn reset(&mut self) -> Option<ViewUpdate> {
        self.state.current_move_index = 0;
        self.leave_variation();
        self.show_mainline();
        Some(self.view(false))
    }

    pub fn jump_to_end(&mut self) -> Option<ViewUpdate> {
        if self.game.mainline.is_empty() {
            return None;
        }
        self.state.current_move_index = self.game.mainline.len();
        self.leave_variation();
        self.show_mainline();
        Some(self.view(true))
    }

    /// Flip a variation between collapsed and expanded. Returns the new
    /// state, or `None` for an unknown block.
    pub fn toggle_variation(&mut self, block: BlockId) -> Option<bool> {
        self.game.tree.find_block(block)?;
        let expanded = if self.expanded.remove(&block) {
            false
        } else {
            self.expanded.insert(block);
            true
        };
        debug!(block = %block, expanded, "Variation toggled");
        Some(expanded)
    }

    pub fn on_move_clicked(&mut self, ply: usize) -> Option<ViewUpdate> {
        self.go_to_ply(ply)
    }

    /// A click on any rendered move. Mainline moves stay on the mainline.
    pub fn on_variation_move_clicked(&mut self, id: MoveId) -> Option<ViewUpdate> {
        let fen = match self.game.tree.find_move(id)? {
            Node::VariationMove(m) => m.fen.clone(),
            Node::MainlineMove(m) => {
                let ply = m.ply;
                return self.go_to_ply(ply);
            }
            _ => return None,
        };
        self.go_to_position(&fen, Some(id))
    }

    pub fn on_toggle_clicked(&mut self, block: BlockId) -> Option<bool> {
        self.toggle_variation(block)
    }

    pub fn render_markup(&self, sanitizer: &dyn MarkupSanitizer) -> String {
        render_sanitized(
            &self.game.tree,
            RenderState {
                active: self.active_move(),
                expanded: &self.expanded,
            },
            sanitizer,
        )
    }

    fn leave_variation(&mut self) {
        self.state.in_variation = false;
        self.state.last_clicked = None;
    }

    fn show_mainline(&mut self) {
        let index = self.state.current_move_index;
        if let Some(fen) = self.game.mainline.fen(index) {
            self.position = fen.to_string();
        }
        self.last_move = index
            .checked_sub(1)
            .and_then(|ply| self.game.mainline.move_squares(ply));
    }

    /// Squares of a clicked move, by replaying it from its parent position.
    fn replay_squares(&self, id: MoveId) -> Option<(Square, Square)> {
        let Node::VariationMove(m) = self.game.tree.find_move(id)? else {
            debug!(move_id = %id, "No parent position to highlight from");
            return None;
        };
        let mut rules = R::default();
        rules.load_position(&m.parent_fen).ok()?;
        let applied = rules.apply_move(&m.san)?;
        Some((applied.from, applied.to))
    }
}
