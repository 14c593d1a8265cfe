//! Movetext tokenizer with a peek/advance cursor.
//!
//! Comments and variation bodies come out as single tokens carrying their raw
//! inner text; the parser recurses into variation bodies itself.

use std::sync::LazyLock;

use regex::Regex;

use crate::notation::SAN_PATTERN;

static MOVE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)(\.+)\s*").unwrap());

static RESULT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:1-0|0-1|1/2-1/2|\*)").unwrap());

static NAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\$(\d+)").unwrap());

static SAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^({SAN_PATTERN})([!?]+)?")).unwrap());

/// `12.` or `12...` as written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveNumber<'a> {
    pub digits: &'a str,
    pub dots: &'a str,
}

impl MoveNumber<'_> {
    pub fn number(&self) -> u32 {
        self.digits.parse().unwrap_or(u32::MAX)
    }

    /// More than one dot marks a black-to-move continuation.
    pub fn is_black_continuation(&self) -> bool {
        self.dots.len() > 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    MoveNumber(MoveNumber<'a>),
    /// Text between `{` and the next `}` (or the end of input).
    Comment(&'a str),
    /// Text between `(` and its matching `)` (or the end of input).
    Variation(&'a str),
    /// NAG digits without the `$`.
    Nag(&'a str),
    Result(&'a str),
    San { san: &'a str, glyphs: &'a str },
    Unknown(char),
}

pub struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
    peeked: Option<Option<Token<'a>>>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            peeked: None,
        }
    }

    pub fn peek(&mut self) -> Option<&Token<'a>> {
        if self.peeked.is_none() {
            self.peeked = Some(self.scan());
        }
        self.peeked.as_ref().and_then(Option::as_ref)
    }

    pub fn advance(&mut self) -> Option<Token<'a>> {
        match self.peeked.take() {
            Some(token) => token,
            None => self.scan(),
        }
    }

    fn scan(&mut self) -> Option<Token<'a>> {
        let rest = &self.src[self.pos..];
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
        let rest = trimmed;

        let first = rest.chars().next()?;

        if first == '{' {
            let body = &rest[1..];
            let (text, consumed) = match body.find('}') {
                Some(end) => (&body[..end], end + 2),
                None => (body, rest.len()),
            };
            self.pos += consumed;
            return Some(Token::Comment(text));
        }

        if first == '(' {
            let (body, consumed) = match matching_paren(rest) {
                Some(end) => (&rest[1..end], end + 1),
                None => (&rest[1..], rest.len()),
            };
            self.pos += consumed;
            return Some(Token::Variation(body));
        }

        if let Some(cap) = MOVE_NUMBER_RE.captures(rest) {
            self.pos += cap[0].len();
            let digits = cap.get(1).map_or("", |m| m.as_str());
            let dots = cap.get(2).map_or("", |m| m.as_str());
            return Some(Token::MoveNumber(MoveNumber { digits, dots }));
        }

        if let Some(m) = RESULT_RE.find(rest) {
            self.pos += m.end();
            return Some(Token::Result(m.as_str()));
        }

        if let Some(cap) = NAG_RE.captures(rest) {
            self.pos += cap[0].len();
            return Some(Token::Nag(cap.get(1).map_or("", |m| m.as_str())));
        }

        if let Some(cap) = SAN_RE.captures(rest) {
            self.pos += cap[0].len();
            let san = cap.get(1).map_or("", |m| m.as_str());
            let glyphs = cap.get(2).map_or("", |m| m.as_str());
            return Some(Token::San { san, glyphs });
        }

        self.pos += first.len_utf8();
        Some(Token::Unknown(first))
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        self.advance()
    }
}

/// Byte offset of the `)` closing the `(` at the start of `text`.
/// Parentheses inside `{...}` comments are ignored.
fn matching_paren(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_comment = false;

    for (i, ch) in text.char_indices() {
        match ch {
            '{' if !in_comment => in_comment = true,
            '}' if in_comment => in_comment = false,
            _ if in_comment => {}
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
