//! Plain-text rendering of the board and the move list.

use std::collections::BTreeSet;

use pgn_core::scroll::ScrollViewport;
use pgn_core::tree::{BlockId, MoveId, Node};
use pgn_core::MoveTree;
use shakmaty::{Board, File, Rank, Square};

const LINE_WIDTH: usize = 64;
const INDENT: &str = "  ";

/// Eight ranks, white at the bottom. The squares of the last move are
/// bracketed.
pub fn board_diagram(fen: &str, last_move: Option<(Square, Square)>) -> String {
    let board = fen
        .split_whitespace()
        .next()
        .and_then(|placement| placement.parse::<Board>().ok());
    let Some(board) = board else {
        return format!("(unreadable position: {fen})\n");
    };

    let highlighted = |sq: Square| last_move.is_some_and(|(from, to)| sq == from || sq == to);

    let mut out = String::new();
    for rank in Rank::ALL.into_iter().rev() {
        out.push_str(&format!("{} ", rank.char()));
        for file in File::ALL {
            let sq = Square::from_coords(file, rank);
            let piece = board.piece_at(sq).map(|p| p.char()).unwrap_or('.');
            if highlighted(sq) {
                out.push_str(&format!("[{piece}]"));
            } else {
                out.push_str(&format!(" {piece} "));
            }
        }
        out.push('\n');
    }
    out.push_str("   a  b  c  d  e  f  g  h\n");
    out
}

/// The move list as display lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveList {
    pub lines: Vec<String>,
    /// Line holding the active move, when it is visible.
    pub active_line: Option<usize>,
}

impl MoveList {
    pub fn build(tree: &MoveTree, active: Option<MoveId>, expanded: &BTreeSet<BlockId>) -> Self {
        if !tree.has_movetext {
            return Self {
                lines: vec!["No moves".to_string()],
                active_line: None,
            };
        }

        let mut builder = Builder {
            list: Self::default(),
            line: String::new(),
            depth: 0,
            active,
            expanded,
        };
        builder.nodes(&tree.nodes);
        builder.flush();
        builder.list
    }

    /// Lines visible through `viewport`, measured in lines.
    pub fn window(&self, viewport: &ScrollViewport) -> &[String] {
        let height = viewport.client_height.max(1.0) as usize;
        let max_start = self.lines.len().saturating_sub(height);
        let start = (viewport.scroll_top.max(0.0) as usize).min(max_start);
        let end = (start + height).min(self.lines.len());
        &self.lines[start..end]
    }
}

struct Builder<'a> {
    list: MoveList,
    line: String,
    depth: usize,
    active: Option<MoveId>,
    expanded: &'a BTreeSet<BlockId>,
}

impl Builder<'_> {
    fn nodes(&mut self, nodes: &[Node]) {
        for node in nodes {
            match node {
                Node::MoveNumber(label) => self.word(&label.to_string()),
                Node::Comment(text) => self.word(&format!("{{{text}}}")),
                Node::Nag(symbol) => self.word(symbol),
                Node::MainlineMove(m) => {
                    self.move_word(m.id, format!("{}{}", m.san, m.glyphs));
                }
                Node::VariationMove(m) => {
                    self.move_word(m.id, format!("{}{}<{}>", m.san, m.glyphs, m.id));
                }
                Node::InvalidMove(m) => self.word(&format!("~{}{}~", m.san, m.glyphs)),
                Node::Variation(block) => {
                    self.flush();
                    let open = self.expanded.contains(&block.id);
                    let marker = if open { '-' } else { '+' };
                    self.depth += 1;
                    self.word(&format!("[{marker}{}] {}", block.id, block.preview));
                    self.flush();
                    if open {
                        self.depth += 1;
                        self.nodes(&block.nodes);
                        self.flush();
                        self.depth -= 1;
                    }
                    self.depth -= 1;
                }
            }
        }
    }

    fn move_word(&mut self, id: MoveId, text: String) {
        if self.active == Some(id) {
            self.word(&format!("*{text}*"));
            self.list.active_line = Some(self.list.lines.len());
        } else {
            self.word(&text);
        }
    }

    fn word(&mut self, text: &str) {
        if !self.line.is_empty() && self.line.len() + text.len() + 1 > LINE_WIDTH {
            self.flush();
        }
        if self.line.is_empty() {
            self.line.push_str(&INDENT.repeat(self.depth));
        } else {
            self.line.push(' ');
        }
        self.line.push_str(text);
    }

    fn flush(&mut self) {
        if !self.line.trim().is_empty() {
            self.list.lines.push(std::mem::take(&mut self.line));
        }
        self.line.clear();
    }
}
