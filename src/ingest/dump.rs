//! MediaWiki export dump parsing.

use serde::Deserialize;

use crate::error::{MusictreeError, Result};

/// One `<page>` of an export dump, before any cleaning
#[derive(Debug, Clone, PartialEq)]
pub struct RawArticle {
    pub title: Option<String>,
    pub namespace: Option<i64>,
    /// Wikitext of the last revision. `None` when the page carries no
    /// `<text>` element at all.
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MediaWikiXml {
    #[serde(rename = "page", default)]
    pages: Vec<PageXml>,
}

#[derive(Debug, Deserialize)]
struct PageXml {
    title: Option<String>,
    ns: Option<i64>,
    #[serde(rename = "revision", default)]
    revisions: Vec<RevisionXml>,
}

#[derive(Debug, Deserialize)]
struct RevisionXml {
    text: Option<TextXml>,
}

#[derive(Debug, Deserialize)]
struct TextXml {
    #[serde(rename = "$text", default)]
    value: String,
}

/// Parse an export dump into its pages.
///
/// Fails only when the document itself is not readable; missing titles or
/// bodies are reported per page by the normalizer.
pub fn parse_dump(content: &str, path: &str) -> Result<Vec<RawArticle>> {
    let dump: MediaWikiXml = quick_xml::de::from_str(content).map_err(|e| {
        MusictreeError::Parse(format!("XML parse error in {}: {}", path, e))
    })?;

    let articles = dump
        .pages
        .into_iter()
        .map(|page| RawArticle {
            title: page.title,
            namespace: page.ns,
            text: page
                .revisions
                .into_iter()
                .last()
                .and_then(|rev| rev.text)
                .map(|t| t.value),
        })
        .collect();

    Ok(articles)
}
