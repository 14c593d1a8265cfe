//! Mainline extraction: the flat list of mainline SAN moves and the board
//! position reached after each of them.
//!
//! This pass never recurses. Variations and comments are dropped while
//! scanning, then NAGs and the game result are stripped and the remaining
//! text is matched against the shared SAN pattern.

use std::sync::LazyLock;

use regex::Regex;
use shakmaty::Square;
use tracing::{debug, warn};

use crate::notation::{self, SAN_PATTERN};
use crate::rules::ChessRules;

static NAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\d+").unwrap());

static TRAILING_RESULT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*(?:1-0|0-1|1/2-1/2|\*)\s*$").unwrap());

static NUMBERED_MOVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?:\d+\.+\s*)?({SAN_PATTERN})")).unwrap());

/// Extract the mainline SAN moves from PGN text (headers allowed).
///
/// Unbalanced structure is tolerated: the scan keeps whatever depth/comment
/// state it was in, so a stray `)` drops the rest of the text.
pub fn extract_mainline_san(pgn: &str) -> Vec<String> {
    let text = notation::strip_headers(pgn);

    let mut kept = String::with_capacity(text.len());
    let mut depth: i32 = 0;
    let mut in_comment = false;

    for ch in text.chars() {
        match ch {
            '{' if !in_comment => in_comment = true,
            '}' if in_comment => {
                in_comment = false;
                kept.push(' ');
            }
            _ if in_comment => {}
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                kept.push(' ');
            }
            _ if depth == 0 => kept.push(ch),
            _ => {}
        }
    }

    let no_nags = NAG_RE.replace_all(&kept, " ");
    let no_result = TRAILING_RESULT_RE.replace(&no_nags, "");
    let collapsed = no_result.split_whitespace().collect::<Vec<_>>().join(" ");

    NUMBERED_MOVE_RE
        .captures_iter(&collapsed)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Mainline moves that the rules engine accepted, with the position after
/// each one. `fens[0]` is the starting position, `fens[k]` the position after
/// move `k` (1-based), so `fens.len() == moves.len() + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainlineRecord {
    moves: Vec<String>,
    fens: Vec<String>,
    squares: Vec<(Square, Square)>,
}

impl MainlineRecord {
    /// Replay the extracted mainline from the standard initial position.
    /// Rejected moves are skipped and do not count as plies.
    pub fn build<R: ChessRules + Default>(pgn: &str) -> Self {
        let mut rules = R::default();
        let mut record = Self {
            moves: Vec::new(),
            fens: vec![rules.fen()],
            squares: Vec::new(),
        };

        for san in extract_mainline_san(pgn) {
            match rules.apply_move(&san) {
                Some(applied) => {
                    record.moves.push(applied.san);
                    record.fens.push(applied.fen);
                    record.squares.push((applied.from, applied.to));
                }
                None => {
                    warn!(san = %san, ply = record.moves.len(), "Invalid mainline move skipped");
                }
            }
        }

        debug!(plies = record.moves.len(), "Mainline record built");
        record
    }

    /// Number of accepted mainline moves.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    pub fn fens(&self) -> &[String] {
        &self.fens
    }

    /// Position at `index` (0 = start, `len()` = final position).
    pub fn fen(&self, index: usize) -> Option<&str> {
        self.fens.get(index).map(String::as_str)
    }

    pub fn start_fen(&self) -> &str {
        &self.fens[0]
    }

    pub fn final_fen(&self) -> &str {
        &self.fens[self.fens.len() - 1]
    }

    /// From/to squares of mainline move `ply` (0-based).
    pub fn move_squares(&self, ply: usize) -> Option<(Square, Square)> {
        self.squares.get(ply).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{ShakmatyRules, STANDARD_START_FEN};

    #[test]
    fn test_extract_simple_mainline() {
        assert_eq!(extract_mainline_san("1. e4 e5 2. Nf3"), vec!["e4", "e5", "Nf3"]);
    }

    #[test]
    fn test_extract_skips_headers_comments_variations() {
        let pgn = r#"[Event "Club"]
[White "A"]

1. e4 {best by test} e5 (1... c5 2. Nf3 (2. c3) d6) 2. Nf3 $1 Nc6 1-0"#;
        assert_eq!(extract_mainline_san(pgn), vec!["e4", "e5", "Nf3", "Nc6"]);
    }

    #[test]
    fn test_parens_inside_comment_do_not_nest() {
        let pgn = "1. e4 {note (see also) here} e5 {smile :)} 2. Nf3";
        assert_eq!(extract_mainline_san(pgn), vec!["e4", "e5", "Nf3"]);
    }

    #[test]
    fn test_black_continuation_numbers_are_noise() {
        let pgn = "1. e4 {comment} 1... e5 2. Nf3";
        assert_eq!(extract_mainline_san(pgn), vec!["e4", "e5", "Nf3"]);
    }

    #[test]
    fn test_glyphs_are_not_part_of_the_move() {
        assert_eq!(extract_mainline_san("1. e4!? e5?! 2. Qh5??"), vec!["e4", "e5", "Qh5"]);
    }

    #[test]
    fn test_promotion_with_check_is_one_token() {
        assert_eq!(extract_mainline_san("57. e8=Q+ Kd7 58. Qe7#"), vec!["e8=Q+", "Kd7", "Qe7#"]);
    }

    #[test]
    fn test_unterminated_comment_swallows_rest() {
        assert_eq!(extract_mainline_san("1. e4 e5 {unfinished 2. Nf3 Nc6"), vec!["e4", "e5"]);
    }

    #[test]
    fn test_stray_close_paren_drops_rest() {
        assert_eq!(extract_mainline_san("1. e4 ) e5 2. Nf3"), vec!["e4"]);
    }

    #[test]
    fn test_unclosed_variation_drops_rest() {
        assert_eq!(extract_mainline_san("1. e4 (1. d4 d5 e5"), vec!["e4"]);
    }

    #[test]
    fn test_record_fen_list_length() {
        let record = MainlineRecord::build::<ShakmatyRules>("1. e4 e5 2. Nf3");
        assert_eq!(record.len(), 3);
        assert_eq!(record.fens().len(), 4);
        assert_eq!(record.start_fen(), STANDARD_START_FEN);
        assert_eq!(
            record.fen(2),
            Some("rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2")
        );
        assert_eq!(
            record.final_fen(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2"
        );
    }

    #[test]
    fn test_record_skips_illegal_moves() {
        let record = MainlineRecord::build::<ShakmatyRules>("1. e4 e5 2. Qh8#??");
        assert_eq!(record.moves(), ["e4", "e5"]);
        assert_eq!(record.fens().len(), 3);
    }

    #[test]
    fn test_record_keeps_later_legal_moves_after_a_rejection() {
        let record = MainlineRecord::build::<ShakmatyRules>("1. e4 Ke3 e5 2. Nf3");
        assert_eq!(record.moves(), ["e4", "e5", "Nf3"]);
    }

    #[test]
    fn test_record_normalizes_san() {
        let record = MainlineRecord::build::<ShakmatyRules>("1. e4 f5 2. Qh5");
        assert_eq!(record.moves(), ["e4", "f5", "Qh5+"]);
        assert_eq!(record.move_squares(2), Some((Square::D1, Square::H5)));
        assert_eq!(record.move_squares(3), None);
    }

    #[test]
    fn test_empty_pgn_has_only_start_position() {
        let record = MainlineRecord::build::<ShakmatyRules>("");
        assert!(record.is_empty());
        assert_eq!(record.fens(), [STANDARD_START_FEN]);
        assert_eq!(record.final_fen(), STANDARD_START_FEN);
    }
}
