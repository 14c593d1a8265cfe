//! PGN exercise viewer core.
//!
//! Two passes run over every opened game: [`mainline`] flattens the mainline
//! into a list of positions, [`parser`] builds the annotated move tree with
//! nested variations. [`navigation`] drives the board over both, and
//! [`render`] turns the tree into interactive markup.

pub mod error;
pub mod exercise;
pub mod mainline;
pub mod navigation;
pub mod notation;
pub mod parser;
pub mod render;
pub mod rules;
pub mod scroll;
pub mod tokenizer;
pub mod tree;
pub mod viewer;

pub use error::PgnError;
pub use exercise::{Exercise, ExerciseCatalog, Heading};
pub use navigation::{BoardSession, NavButtons, NavigationState, ViewUpdate};
pub use rules::{ChessRules, ShakmatyRules};
pub use tree::{BlockId, MoveId, MoveTree, Node};
pub use viewer::Viewer;
