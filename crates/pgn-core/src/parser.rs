//! Recursive-descent movetext parser.
//!
//! Each call of [`Parser::parse_scope`] owns a scratch rules engine holding
//! the position of that line. Variations recurse with the position from
//! before the last move played in the enclosing scope, which is the move the
//! variation replaces.

use std::marker::PhantomData;

use tracing::{debug, warn};

use crate::notation::{self, nag_symbol};
use crate::rules::{ChessRules, STANDARD_START_FEN};
use crate::tokenizer::{Token, Tokenizer};
use crate::tree::{
    BlockId, InvalidMove, MainlineMove, MoveId, MoveNumberLabel, MoveTree, Node, VariationBlock,
    VariationMove,
};

const PREVIEW_FALLBACK_CHARS: usize = 20;

/// Parse full PGN text (headers allowed) into a move tree.
pub fn parse_game<R: ChessRules + Default>(pgn: &str) -> MoveTree {
    let movetext = notation::strip_headers(pgn);
    if movetext.is_empty() {
        return MoveTree::empty();
    }

    let mut parser = Parser::<R>::new();
    let nodes = parser.parse_scope(&movetext, false, STANDARD_START_FEN);
    debug!(
        moves = parser.next_move,
        variations = parser.next_block,
        "Movetext parsed"
    );

    MoveTree {
        nodes,
        has_movetext: true,
    }
}

/// Hands out move and block ids across all scopes of one game.
pub struct Parser<R> {
    next_move: usize,
    next_block: usize,
    _rules: PhantomData<fn() -> R>,
}

struct Scope<R> {
    /// `None` when the starting FEN could not be loaded.
    rules: Option<R>,
    is_variation: bool,
    ply: usize,
    last_shown_number: u32,
    last_move_before_fen: String,
}

impl<R: ChessRules + Default> Scope<R> {
    fn open(starting_fen: &str, is_variation: bool) -> Self {
        let mut rules = R::default();
        let rules = match rules.load_position(starting_fen) {
            Ok(()) => Some(rules),
            Err(e) => {
                warn!(error = %e, "Cannot load line start position; its moves stay inactive");
                None
            }
        };

        Self {
            rules,
            is_variation,
            ply: 0,
            last_shown_number: 0,
            last_move_before_fen: starting_fen.to_string(),
        }
    }
}

impl<R: ChessRules + Default> Default for Parser<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ChessRules + Default> Parser<R> {
    pub fn new() -> Self {
        Self {
            next_move: 0,
            next_block: 0,
            _rules: PhantomData,
        }
    }

    /// Parse one line of movetext starting from `starting_fen`.
    pub fn parse_scope(&mut self, text: &str, is_variation: bool, starting_fen: &str) -> Vec<Node> {
        let mut scope = Scope::<R>::open(starting_fen, is_variation);
        let mut nodes = Vec::new();
        let mut tokens = Tokenizer::new(text);

        while let Some(token) = tokens.advance() {
            match token {
                Token::Comment(raw) => {
                    let text = notation::clean_comment(raw);
                    if !text.is_empty() {
                        nodes.push(Node::Comment(text));
                    }
                }
                Token::Variation(body) => {
                    if let Some(block) = self.parse_variation(body.trim(), &scope) {
                        nodes.push(Node::Variation(block));
                    }
                }
                Token::MoveNumber(number) => {
                    let value = number.number();
                    if number.is_black_continuation() {
                        nodes.push(Node::MoveNumber(MoveNumberLabel {
                            number: value,
                            black: true,
                        }));
                    } else if value != scope.last_shown_number {
                        nodes.push(Node::MoveNumber(MoveNumberLabel {
                            number: value,
                            black: false,
                        }));
                        scope.last_shown_number = value;
                    }
                }
                Token::Result(_) => {}
                Token::Nag(code) => {
                    if let Some(symbol) = nag_symbol(code) {
                        nodes.push(Node::Nag(symbol));
                    }
                }
                Token::San { san, glyphs } => {
                    nodes.push(self.play(&mut scope, san, glyphs));
                }
                Token::Unknown(_) => {}
            }
        }

        nodes
    }

    fn parse_variation(&mut self, body: &str, scope: &Scope<R>) -> Option<VariationBlock> {
        if body.is_empty() {
            return None;
        }

        let id = BlockId(self.next_block);
        self.next_block += 1;

        // Captured by value: later moves in the enclosing scope must not move
        // the branch point.
        let parent_fen = scope.last_move_before_fen.clone();
        let nodes = self.parse_scope(body, true, &parent_fen);

        Some(VariationBlock {
            id,
            preview: variation_preview(body),
            parent_fen,
            nodes,
        })
    }

    fn play(&mut self, scope: &mut Scope<R>, san: &str, glyphs: &str) -> Node {
        let id = MoveId(self.next_move);
        self.next_move += 1;

        let Some(rules) = scope.rules.as_mut() else {
            return invalid(id, san, glyphs);
        };

        let before = rules.fen();
        let Some(applied) = rules.apply_move(san) else {
            warn!(san = %san, variation = scope.is_variation, "Invalid move rendered inactive");
            return invalid(id, san, glyphs);
        };
        scope.last_move_before_fen = before;

        if scope.is_variation {
            Node::VariationMove(VariationMove {
                id,
                san: applied.san,
                glyphs: glyphs.to_string(),
                fen: applied.fen,
                parent_fen: scope.last_move_before_fen.clone(),
            })
        } else {
            let ply = scope.ply;
            scope.ply += 1;
            Node::MainlineMove(MainlineMove {
                id,
                ply,
                san: applied.san,
                glyphs: glyphs.to_string(),
                fen: applied.fen,
            })
        }
    }
}

fn invalid(id: MoveId, san: &str, glyphs: &str) -> Node {
    Node::InvalidMove(InvalidMove {
        id,
        san: san.to_string(),
        glyphs: glyphs.to_string(),
    })
}

/// Label shown on a collapsed variation: `1. d4`, `3... Nf6!?`, `12. Bb5±`.
///
/// Without a leading move number the bare first move is used; failing that,
/// the start of the body.
pub fn variation_preview(body: &str) -> String {
    let mut tokens = Tokenizer::new(body);

    match tokens.advance() {
        Some(Token::MoveNumber(number)) => {
            if let Some(Token::San { san, glyphs }) = tokens.advance() {
                let nag = if glyphs.is_empty() {
                    match tokens.peek() {
                        Some(Token::Nag(code)) => nag_symbol(code).unwrap_or(""),
                        _ => "",
                    }
                } else {
                    ""
                };
                return format!("{}{} {san}{nag}{glyphs}", number.digits, number.dots);
            }
        }
        Some(Token::San { san, .. }) => return san.to_string(),
        _ => {}
    }

    let head: String = body.chars().take(PREVIEW_FALLBACK_CHARS).collect();
    format!("{head}...")
}
