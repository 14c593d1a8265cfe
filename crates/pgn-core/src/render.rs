//! Markup rendering of a move tree.
//!
//! Output is plain HTML-like markup with `class` and `data-*` attributes for
//! event delegation; no inline handlers. It is always handed to a
//! [`MarkupSanitizer`] before it leaves the crate.

use std::collections::BTreeSet;

use crate::notation::escape_html;
use crate::tree::{BlockId, MoveId, MoveTree, Node, VariationBlock};

pub const NO_MOVES_MARKUP: &str = r#"<p class="no-moves">No moves</p>"#;

/// What a sanitizer must let through for the move list to stay interactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkupPolicy {
    pub tags: &'static [&'static str],
    pub attributes: &'static [&'static str],
}

pub const CHESS_MARKUP: MarkupPolicy = MarkupPolicy {
    tags: &["span", "div", "br", "strong", "em", "p"],
    attributes: &[
        "class",
        "data-move",
        "data-fen",
        "data-index",
        "data-parent-fen",
        "data-block",
    ],
};

/// External HTML sanitizer.
pub trait MarkupSanitizer {
    fn sanitize(&self, markup: &str, policy: &MarkupPolicy) -> String;
}

impl<F> MarkupSanitizer for F
where
    F: Fn(&str, &MarkupPolicy) -> String,
{
    fn sanitize(&self, markup: &str, policy: &MarkupPolicy) -> String {
        self(markup, policy)
    }
}

/// Highlight and expand/collapse state the markup reflects.
#[derive(Debug, Clone, Copy)]
pub struct RenderState<'a> {
    pub active: Option<MoveId>,
    pub expanded: &'a BTreeSet<BlockId>,
}

pub fn render_markup(tree: &MoveTree, state: RenderState<'_>) -> String {
    if !tree.has_movetext {
        return NO_MOVES_MARKUP.to_string();
    }

    let mut out = String::new();
    render_nodes(&tree.nodes, state, &mut out);
    out
}

pub fn render_sanitized(
    tree: &MoveTree,
    state: RenderState<'_>,
    sanitizer: &dyn MarkupSanitizer,
) -> String {
    sanitizer.sanitize(&render_markup(tree, state), &CHESS_MARKUP)
}

fn render_nodes(nodes: &[Node], state: RenderState<'_>, out: &mut String) {
    for node in nodes {
        match node {
            Node::MoveNumber(label) => {
                out.push_str(&format!(r#"<span class="move-number">{label}</span>"#));
            }
            Node::Comment(text) => {
                out.push_str(&format!(
                    r#"<span class="move-comment">{}</span> "#,
                    escape_html(text)
                ));
            }
            Node::Nag(symbol) => {
                out.push_str(&format!(r#"<span class="move-nag">{symbol}</span>"#));
            }
            Node::MainlineMove(m) => {
                out.push_str(&format!(
                    r#"<span class="move-link{}" data-move="{}" data-index="{}" data-fen="{}">{}{}</span> "#,
                    active_class(state, m.id),
                    m.id,
                    m.ply,
                    escape_html(&m.fen),
                    escape_html(&m.san),
                    escape_html(&m.glyphs),
                ));
            }
            Node::VariationMove(m) => {
                out.push_str(&format!(
                    r#"<span class="variation-move clickable{}" data-move="{}" data-fen="{}" data-parent-fen="{}">{}{}</span> "#,
                    active_class(state, m.id),
                    m.id,
                    escape_html(&m.fen),
                    escape_html(&m.parent_fen),
                    escape_html(&m.san),
                    escape_html(&m.glyphs),
                ));
            }
            Node::InvalidMove(m) => {
                out.push_str(&format!(
                    r#"<span class="variation-move invalid">{}{}</span> "#,
                    escape_html(&m.san),
                    escape_html(&m.glyphs),
                ));
            }
            Node::Variation(block) => render_block(block, state, out),
        }
    }
}

fn render_block(block: &VariationBlock, state: RenderState<'_>, out: &mut String) {
    let expanded = state.expanded.contains(&block.id);
    let (toggle, modifier) = if expanded { ("−", " expanded") } else { ("+", "") };

    out.push_str(r#"<div class="variation-line">"#);
    out.push_str(&format!(
        r#"<span class="variation-toggle{modifier}" data-block="{}">{toggle}</span>"#,
        block.id
    ));
    out.push_str(&format!(
        r#"<span class="variation-header">{}</span>"#,
        escape_html(&block.preview)
    ));
    out.push_str(&format!(r#"<div class="variation-content{modifier}">"#));
    render_nodes(&block.nodes, state, out);
    out.push_str("</div></div>");
}

fn active_class(state: RenderState<'_>, id: MoveId) -> &'static str {
    if state.active == Some(id) {
        " active"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_game;
    use crate::rules::ShakmatyRules;

    fn markup(pgn: &str, active: Option<MoveId>, expanded: &BTreeSet<BlockId>) -> String {
        let tree = parse_game::<ShakmatyRules>(pgn);
        render_markup(&tree, RenderState { active, expanded })
    }

    #[test]
    fn test_empty_pgn_placeholder() {
        assert_eq!(markup("", None, &BTreeSet::new()), NO_MOVES_MARKUP);
    }

    #[test]
    fn test_mainline_markup() {
        let html = markup("1. e4!", Some(MoveId(0)), &BTreeSet::new());
        assert_eq!(
            html,
            concat!(
                r#"<span class="move-number">1.</span>"#,
                r#"<span class="move-link active" data-move="0" data-index="0" "#,
                r#"data-fen="rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1">e4!</span> "#,
            )
        );
    }

    #[test]
    fn test_variation_markup_collapsed_and_expanded() {
        let collapsed = markup("1. e4 (1. d4) e5", None, &BTreeSet::new());
        assert!(collapsed.contains(r#"<span class="variation-toggle" data-block="0">+</span>"#));
        assert!(collapsed.contains(r#"<span class="variation-header">1. d4</span>"#));
        assert!(collapsed.contains(r#"<div class="variation-content">"#));
        assert!(collapsed.contains(r#"class="variation-move clickable" data-move="1""#));
        assert!(collapsed.contains(r#"data-parent-fen="rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1""#));

        let expanded: BTreeSet<BlockId> = [BlockId(0)].into_iter().collect();
        let open = markup("1. e4 (1. d4) e5", None, &expanded);
        assert!(open.contains(r#"<span class="variation-toggle expanded" data-block="0">−</span>"#));
        assert!(open.contains(r#"<div class="variation-content expanded">"#));
    }

    #[test]
    fn test_invalid_move_is_not_clickable() {
        let html = markup("1. e4 e5 2. Qh8#??", None, &BTreeSet::new());
        assert!(html.contains(r#"<span class="variation-move invalid">Qh8#??</span>"#));
    }

    #[test]
    fn test_comment_is_escaped() {
        let html = markup("1. e4 {<b>bold</b> & more}", None, &BTreeSet::new());
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt; &amp; more"));
    }

    #[test]
    fn test_sanitizer_receives_markup_and_policy() {
        let tree = parse_game::<ShakmatyRules>("1. e4");
        let expanded = BTreeSet::new();
        let sanitizer = |markup: &str, policy: &MarkupPolicy| {
            assert!(policy.attributes.contains(&"data-parent-fen"));
            markup.replace("move-link", "clean")
        };
        let html = render_sanitized(&tree, RenderState { active: None, expanded: &expanded }, &sanitizer);
        assert!(html.contains(r#"class="clean""#));
    }
}
