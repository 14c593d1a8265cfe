//! Chess-rules adapter: move legality and FEN generation, backed by shakmaty.

use shakmaty::{
    fen::Fen,
    san::{San, SanPlus},
    CastlingMode, Chess, EnPassantMode, File, Move, Position, Square,
};

use crate::error::PgnError;

pub const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A move the rules engine accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMove {
    /// Normalized SAN including the check/mate suffix.
    pub san: String,
    pub from: Square,
    /// King destination for castling, not the rook square.
    pub to: Square,
    /// Position after the move.
    pub fen: String,
}

/// Legality and position tracking used by the parser and the navigator.
///
/// `Default` must produce the standard initial position.
pub trait ChessRules {
    /// Replace the current position.
    fn load_position(&mut self, fen: &str) -> Result<(), PgnError>;

    /// Play a SAN move on the current position. `None` if the text is not
    /// SAN or the move is illegal; the position is left untouched then.
    fn apply_move(&mut self, san: &str) -> Option<AppliedMove>;

    /// FEN of the current position.
    fn fen(&self) -> String;
}

#[derive(Debug, Clone, Default)]
pub struct ShakmatyRules {
    pos: Chess,
}

impl ShakmatyRules {
    pub fn from_fen(fen: &str) -> Result<Self, PgnError> {
        let mut rules = Self::default();
        rules.load_position(fen)?;
        Ok(rules)
    }
}

impl ChessRules for ShakmatyRules {
    fn load_position(&mut self, fen: &str) -> Result<(), PgnError> {
        let parsed: Fen = fen
            .trim()
            .parse()
            .map_err(|e| PgnError::invalid_fen(fen, e))?;
        self.pos = parsed
            .into_position::<Chess>(CastlingMode::Standard)
            .map_err(|e| PgnError::invalid_fen(fen, e))?;
        Ok(())
    }

    fn apply_move(&mut self, san: &str) -> Option<AppliedMove> {
        let san_plus: SanPlus = san.parse().ok()?;
        let mv = san_plus.san.to_move(&self.pos).ok()?;
        let (from, to) = move_squares(&mv)?;

        let normalized = San::from_move(&self.pos, mv.clone()).to_string();
        self.pos.play_unchecked(mv);

        let suffix = if self.pos.is_checkmate() {
            "#"
        } else if self.pos.is_check() {
            "+"
        } else {
            ""
        };

        Some(AppliedMove {
            san: format!("{normalized}{suffix}"),
            from,
            to,
            fen: self.fen(),
        })
    }

    fn fen(&self) -> String {
        Fen::from_position(&self.pos, EnPassantMode::Legal).to_string()
    }
}

fn move_squares(mv: &Move) -> Option<(Square, Square)> {
    match *mv {
        Move::Normal { from, to, .. } => Some((from, to)),
        Move::EnPassant { from, to } => Some((from, to)),
        Move::Castle { king, rook } => {
            let file = if rook.file() > king.file() { File::G } else { File::C };
            Some((king, Square::from_coords(file, king.rank())))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_start_position() {
        assert_eq!(ShakmatyRules::default().fen(), STANDARD_START_FEN);
    }

    #[test]
    fn test_apply_move_reports_squares_and_fen() {
        let mut rules = ShakmatyRules::default();
        let applied = rules.apply_move("e4").expect("legal");
        assert_eq!(applied.san, "e4");
        assert_eq!(applied.from, Square::E2);
        assert_eq!(applied.to, Square::E4);
        assert_eq!(
            applied.fen,
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
        );
        assert_eq!(rules.fen(), applied.fen);
    }

    #[test]
    fn test_illegal_move_leaves_position() {
        let mut rules = ShakmatyRules::default();
        assert!(rules.apply_move("e5").is_none());
        assert!(rules.apply_move("Zz9").is_none());
        assert_eq!(rules.fen(), STANDARD_START_FEN);
    }

    #[test]
    fn test_check_suffix_is_added() {
        let mut rules = ShakmatyRules::default();
        for san in ["e4", "f5"] {
            rules.apply_move(san).expect("legal");
        }
        let applied = rules.apply_move("Qh5").expect("legal");
        assert_eq!(applied.san, "Qh5+");
    }

    #[test]
    fn test_mate_suffix_is_added() {
        let mut rules = ShakmatyRules::default();
        for san in ["f3", "e5", "g4"] {
            rules.apply_move(san).expect("legal");
        }
        assert_eq!(rules.apply_move("Qh4").expect("legal").san, "Qh4#");
    }

    #[test]
    fn test_castling_reports_king_destination() {
        let mut rules =
            ShakmatyRules::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("valid fen");
        let applied = rules.apply_move("O-O").expect("legal");
        assert_eq!(applied.from, Square::E1);
        assert_eq!(applied.to, Square::G1);

        let applied = rules.apply_move("O-O-O").expect("legal");
        assert_eq!(applied.from, Square::E8);
        assert_eq!(applied.to, Square::C8);
    }

    #[test]
    fn test_invalid_fen_is_an_error() {
        let mut rules = ShakmatyRules::default();
        assert!(rules.load_position("not a fen").is_err());
        assert_eq!(rules.fen(), STANDARD_START_FEN);
    }
}
