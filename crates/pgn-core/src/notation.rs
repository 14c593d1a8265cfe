//! Lexical pieces shared by the mainline extractor and the tokenizer.

use std::sync::LazyLock;

use regex::Regex;

/// One SAN move: piece, disambiguation, capture, destination, promotion,
/// check marker, or castling. Both passes match moves with this pattern.
pub const SAN_PATTERN: &str = r"[NBRQK]?[a-h]?[1-8]?x?[a-h][1-8](?:=[NBRQ])?[+#]?|O-O-O|O-O";

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]+\]\s*").unwrap());

static DIRECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[%(?:evp|csl|cal)[^\]]*\]").unwrap());

/// Remove tag pairs (`[White "..."]`) and any other bracket groups.
pub fn strip_headers(pgn: &str) -> String {
    HEADER_RE.replace_all(pgn, "").trim().to_string()
}

/// Comment text without embedded board-annotation directives.
pub fn clean_comment(text: &str) -> String {
    DIRECTIVE_RE.replace_all(text.trim(), "").trim().to_string()
}

/// Display glyph for a NAG code (the digits after `$`).
pub fn nag_symbol(code: &str) -> Option<&'static str> {
    let symbol = match code.parse::<u32>().ok()? {
        1 => "!",
        2 => "?",
        3 => "!!",
        4 => "??",
        5 => "!?",
        6 => "?!",
        10 | 11 => "=",
        13 => "∞",
        14 => "⩲",
        15 => "⩱",
        16 => "±",
        17 => "∓",
        18 => "+−",
        19 => "−+",
        22 => "⨀",
        32 => "⟳",
        36 => "→",
        40 => "↑",
        44 => "=∞",
        132 => "⇆",
        138 => "⨁",
        _ => return None,
    };
    Some(symbol)
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
