//! Parsed move tree: what the parser produces and the renderer walks.

use std::fmt;

/// Identifies a rendered move. Assigned in document order across the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MoveId(pub usize);

/// Identifies a variation block. Assigned in document order across the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub usize);

impl fmt::Display for MoveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveNumberLabel {
    pub number: u32,
    pub black: bool,
}

impl fmt::Display for MoveNumberLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.black {
            write!(f, "{}...", self.number)
        } else {
            write!(f, "{}.", self.number)
        }
    }
}

/// A legal move of the top-level line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainlineMove {
    pub id: MoveId,
    /// Zero-based ply among the accepted mainline moves.
    pub ply: usize,
    pub san: String,
    pub glyphs: String,
    pub fen: String,
}

/// A legal move inside a variation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariationMove {
    pub id: MoveId,
    pub san: String,
    pub glyphs: String,
    pub fen: String,
    /// Position the move was played from.
    pub parent_fen: String,
}

/// A move the rules engine rejected. Shown, never clickable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMove {
    pub id: MoveId,
    pub san: String,
    pub glyphs: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariationBlock {
    pub id: BlockId,
    /// First move number, first move and its annotation, e.g. `3... Nf6!?`.
    pub preview: String,
    /// Position the variation branches from.
    pub parent_fen: String,
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    MoveNumber(MoveNumberLabel),
    Comment(String),
    Nag(&'static str),
    MainlineMove(MainlineMove),
    VariationMove(VariationMove),
    InvalidMove(InvalidMove),
    Variation(VariationBlock),
}

impl Node {
    pub fn move_id(&self) -> Option<MoveId> {
        match self {
            Node::MainlineMove(m) => Some(m.id),
            Node::VariationMove(m) => Some(m.id),
            Node::InvalidMove(m) => Some(m.id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveTree {
    pub nodes: Vec<Node>,
    /// False when the PGN had no movetext at all.
    pub has_movetext: bool,
}

impl MoveTree {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Pre-order walk over every node, descending into variations.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![self.nodes.iter()],
        }
    }

    pub fn find_move(&self, id: MoveId) -> Option<&Node> {
        self.walk().find(|node| node.move_id() == Some(id))
    }

    pub fn find_block(&self, id: BlockId) -> Option<&VariationBlock> {
        self.walk().find_map(|node| match node {
            Node::Variation(block) if block.id == id => Some(block),
            _ => None,
        })
    }

    /// Top-level move with the given ply.
    pub fn mainline_move(&self, ply: usize) -> Option<&MainlineMove> {
        self.nodes.iter().find_map(|node| match node {
            Node::MainlineMove(m) if m.ply == ply => Some(m),
            _ => None,
        })
    }

    pub fn block_count(&self) -> usize {
        self.walk()
            .filter(|node| matches!(node, Node::Variation(_)))
            .count()
    }
}

pub struct Walk<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(node) => {
                    if let Node::Variation(block) = node {
                        self.stack.push(block.nodes.iter());
                    }
                    return Some(node);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variation_move(id: usize) -> Node {
        Node::VariationMove(VariationMove {
            id: MoveId(id),
            san: "d4".into(),
            glyphs: String::new(),
            fen: format!("fen{id}"),
            parent_fen: "start".into(),
        })
    }

    fn sample() -> MoveTree {
        MoveTree {
            nodes: vec![
                Node::MoveNumber(MoveNumberLabel { number: 1, black: false }),
                Node::MainlineMove(MainlineMove {
                    id: MoveId(0),
                    ply: 0,
                    san: "e4".into(),
                    glyphs: String::new(),
                    fen: "fen0".into(),
                }),
                Node::Variation(VariationBlock {
                    id: BlockId(0),
                    preview: "1. d4".into(),
                    parent_fen: "start".into(),
                    nodes: vec![
                        variation_move(1),
                        Node::Variation(VariationBlock {
                            id: BlockId(1),
                            preview: "1. c4".into(),
                            parent_fen: "start".into(),
                            nodes: vec![variation_move(2)],
                        }),
                    ],
                }),
                Node::Comment("after".into()),
            ],
            has_movetext: true,
        }
    }

    #[test]
    fn test_walk_is_preorder() {
        let tree = sample();
        let ids: Vec<Option<MoveId>> = tree.walk().map(Node::move_id).collect();
        assert_eq!(
            ids,
            vec![None, Some(MoveId(0)), None, Some(MoveId(1)), None, Some(MoveId(2)), None]
        );
    }

    #[test]
    fn test_lookups() {
        let tree = sample();
        assert!(matches!(tree.find_move(MoveId(2)), Some(Node::VariationMove(_))));
        assert!(tree.find_move(MoveId(9)).is_none());
        assert_eq!(tree.find_block(BlockId(1)).map(|b| b.preview.as_str()), Some("1. c4"));
        assert_eq!(tree.mainline_move(0).map(|m| m.id), Some(MoveId(0)));
        assert!(tree.mainline_move(1).is_none());
        assert_eq!(tree.block_count(), 2);
    }

    #[test]
    fn test_move_number_label() {
        assert_eq!(MoveNumberLabel { number: 4, black: false }.to_string(), "4.");
        assert_eq!(MoveNumberLabel { number: 4, black: true }.to_string(), "4...");
    }
}
