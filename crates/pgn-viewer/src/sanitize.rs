//! Allow-list markup sanitizer for printing the HTML move list.

use std::sync::LazyLock;

use pgn_core::render::{MarkupPolicy, MarkupSanitizer};
use regex::{Captures, Regex};

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9]*)([^>]*)>").unwrap());

static ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([A-Za-z][A-Za-z0-9\-]*)\s*=\s*"([^"]*)""#).unwrap());

/// Drops tags outside the policy and strips disallowed attributes from the
/// rest. Text content is left as is; the renderer escapes it already.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowListSanitizer;

impl MarkupSanitizer for AllowListSanitizer {
    fn sanitize(&self, markup: &str, policy: &MarkupPolicy) -> String {
        TAG_RE
            .replace_all(markup, |cap: &Captures| {
                let closing = &cap[1];
                let tag = cap[2].to_ascii_lowercase();
                if !policy.tags.contains(&tag.as_str()) {
                    return String::new();
                }
                if !closing.is_empty() {
                    return format!("</{tag}>");
                }

                let attrs: String = ATTR_RE
                    .captures_iter(&cap[3])
                    .filter(|a| policy.attributes.contains(&a[1].to_ascii_lowercase().as_str()))
                    .map(|a| format!(r#" {}="{}""#, a[1].to_ascii_lowercase(), &a[2]))
                    .collect();
                format!("<{tag}{attrs}>")
            })
            .into_owned()
    }
}
