//! Wikitext markup stripping.
//!
//! Turns the raw wikitext of an article into plain prose. Internal links are
//! rendered as their canonical target title so that mentions of artists
//! written as `[[the Beatles|Beatles]]` survive as `The Beatles`.

use regex::{Captures, Regex};

use crate::error::{MusictreeError, Result};

/// Namespace prefixes whose links carry no prose (images, categories, ...).
const FOREIGN_NAMESPACES: &[&str] = &[
    "file", "image", "category", "template", "help", "wikipedia", "wp", "portal",
    "media", "special", "user", "talk", "wikt", "wiktionary", "commons", "draft",
    "module",
];

/// Innermost links are resolved per pass; captions nest only a few levels deep.
const MAX_LINK_PASSES: usize = 8;

/// Compiled markup rules, built once and shared by every normalizer task
pub struct MarkupStripper {
    comments: Regex,
    self_closing_refs: Regex,
    refs: Regex,
    references_heading: Regex,
    internal_link: Regex,
    external_link: Regex,
    emphasis: Regex,
    heading: Regex,
    html_tag: Regex,
    whitespace: Regex,
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| MusictreeError::Parse(format!("invalid markup pattern {}: {}", pattern, e)))
}

impl MarkupStripper {
    pub fn new() -> Result<Self> {
        Ok(Self {
            comments: compile(r"(?s)<!--.*?-->")?,
            self_closing_refs: compile(r"(?i)<ref\b[^>]*/>")?,
            refs: compile(r"(?is)<ref\b[^>]*>.*?</ref\s*>")?,
            references_heading: compile(r"=+[ \t]*References[ \t]*=+")?,
            internal_link: compile(r"\[\[([^\[\]]*)\]\]")?,
            external_link: compile(r"\[(?:(?:https?|ftp):)?//[^\s\]]+(?:\s+([^\]]*))?\]")?,
            emphasis: compile(r"'{2,}")?,
            heading: compile(r"(?m)^[ \t]*=+[ \t]*(.*?)[ \t]*=+[ \t]*$")?,
            html_tag: compile(r"</?[A-Za-z][A-Za-z0-9]*\b[^>]*>")?,
            whitespace: compile(r"\s+")?,
        })
    }

    /// Strip markup from one article body, returning single-spaced prose.
    pub fn strip(&self, wikitext: &str) -> String {
        let text = self.comments.replace_all(wikitext, "");
        let text = self.self_closing_refs.replace_all(&text, "");
        let text = self.refs.replace_all(&text, "");

        let text = match self.references_heading.find(&text) {
            Some(m) => &text[..m.start()],
            None => &text[..],
        };

        let text = strip_nested(text, "{{", "}}");
        let mut text = strip_nested(&text, "{|", "|}");

        for _ in 0..MAX_LINK_PASSES {
            if !self.internal_link.is_match(&text) {
                break;
            }
            text = self
                .internal_link
                .replace_all(&text, |caps: &Captures| render_link(&caps[1]))
                .into_owned();
        }

        let text = self.external_link.replace_all(&text, |caps: &Captures| {
            caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default()
        });
        let text = self.emphasis.replace_all(&text, "");
        let text = self.heading.replace_all(&text, "$1");
        let text = self.html_tag.replace_all(&text, " ");
        let text = text.replace("&nbsp;", " ");

        self.whitespace.replace_all(&text, " ").trim().to_string()
    }
}

/// Remove every `open ... close` span, honouring nesting. An unterminated
/// span swallows the rest of the text.
fn strip_nested(text: &str, open: &str, close: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    let mut rest = text;

    while let Some(ch) = rest.chars().next() {
        if rest.starts_with(open) {
            depth += 1;
            rest = &rest[open.len()..];
        } else if depth > 0 && rest.starts_with(close) {
            depth -= 1;
            rest = &rest[close.len()..];
        } else {
            if depth == 0 {
                out.push(ch);
            }
            rest = &rest[ch.len_utf8()..];
        }
    }

    out
}

/// Render the inside of `[[...]]`.
fn render_link(inner: &str) -> String {
    let (target, label) = match inner.split_once('|') {
        Some((target, label)) => (target.trim(), Some(label.trim())),
        None => (inner.trim(), None),
    };

    if let Some(section) = target.strip_prefix('#') {
        return label.unwrap_or(section).to_string();
    }
    if is_foreign_link(target) {
        return String::new();
    }

    canonical_title(target.trim_start_matches(':'))
}

fn is_foreign_link(target: &str) -> bool {
    let target = target.trim_start_matches(':');
    let Some((prefix, _)) = target.split_once(':') else {
        return false;
    };
    let prefix = prefix.trim();

    let is_namespace = FOREIGN_NAMESPACES
        .iter()
        .any(|ns| ns.eq_ignore_ascii_case(prefix));
    let is_language = (2..=3).contains(&prefix.len())
        && prefix.chars().all(|c| c.is_ascii_lowercase());

    is_namespace || is_language
}

/// Canonical form of a link target as MediaWiki resolves it: no section
/// anchor, underscores as spaces, single spacing, upper-case first letter.
pub fn canonical_title(target: &str) -> String {
    let target = target.split_once('#').map_or(target, |(page, _)| page);
    let spaced = target.replace('_', " ");
    let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut chars = collapsed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
