//! Thin query layer over `scraper`: attribute-keyed element lookup and
//! text extraction. Absence is never an error here; only unusable markup
//! and malformed selectors are.

use crate::utils::error::{EtlError, Result};
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

/// A tag plus one `attribute="value"` pair, e.g. `span[data-test-id="order-id-value"]`.
///
/// The CSS form is compiled on first use and cached, so declare long-lived
/// selectors as `static` items.
#[derive(Debug)]
pub struct ElementSelector {
    pub tag: &'static str,
    pub attribute: &'static str,
    pub value: &'static str,
    compiled: OnceLock<std::result::Result<Selector, String>>,
}

impl ElementSelector {
    pub const fn new(tag: &'static str, attribute: &'static str, value: &'static str) -> Self {
        Self {
            tag,
            attribute,
            value,
            compiled: OnceLock::new(),
        }
    }

    pub fn css(&self) -> String {
        format!(r#"{}[{}="{}"]"#, self.tag, self.attribute, self.value)
    }

    pub fn compile(&self) -> Result<&Selector> {
        let compiled = self
            .compiled
            .get_or_init(|| Selector::parse(&self.css()).map_err(|e| e.to_string()));
        compiled.as_ref().map_err(|message| EtlError::SelectorError {
            selector: self.css(),
            message: message.clone(),
        })
    }
}

/// Parsed markup of one page. Owned by the call that parsed it.
pub struct MarkupDocument {
    html: Html,
}

impl MarkupDocument {
    pub fn parse(markup: &str) -> Result<Self> {
        Self::parse_named("<inline>", markup)
    }

    /// 解析頁面；空白內容或含 NUL 的內容視為無法解析
    pub fn parse_named(source_name: &str, markup: &str) -> Result<Self> {
        if markup.trim().is_empty() {
            return Err(EtlError::markup(source_name, "markup is empty"));
        }
        if markup.contains('\0') {
            return Err(EtlError::markup(source_name, "markup contains NUL bytes"));
        }

        let html = Html::parse_document(markup);
        tracing::trace!(
            source = source_name,
            recoverable_errors = html.errors.len(),
            "Parsed markup"
        );
        Ok(Self { html })
    }

    pub fn find_first(&self, selector: &ElementSelector) -> Result<Option<ElementRef<'_>>> {
        Ok(self.html.select(selector.compile()?).next())
    }

    pub fn find_all(&self, selector: &ElementSelector) -> Result<Vec<ElementRef<'_>>> {
        Ok(self.html.select(selector.compile()?).collect())
    }

    /// Text of the first match, or an empty string when nothing matches.
    pub fn first_text(&self, selector: &ElementSelector) -> Result<String> {
        Ok(self
            .find_first(selector)?
            .map(|element| text(element, false))
            .unwrap_or_default())
    }
}

/// Trimmed text of an element. With `direct_children_only` only the
/// element's own text nodes are read; nested elements are ignored.
pub fn text(element: ElementRef<'_>, direct_children_only: bool) -> String {
    if direct_children_only {
        element
            .children()
            .filter_map(|node| node.value().as_text())
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect()
    } else {
        stripped_strings(element).concat()
    }
}

/// Every descendant text node, trimmed, empties dropped, in document order.
pub fn stripped_strings(element: ElementRef<'_>) -> Vec<String> {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

pub fn child_elements<'a>(element: ElementRef<'a>, tag: &str) -> Vec<ElementRef<'a>> {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name().eq_ignore_ascii_case(tag))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    static ITEM: ElementSelector = ElementSelector::new("div", "data-test-id", "item");

    #[test]
    fn test_css_rendering() {
        assert_eq!(ITEM.css(), r#"div[data-test-id="item"]"#);
    }

    #[test]
    fn test_compile_is_cached() {
        let first = ITEM.compile().unwrap();
        let second = ITEM.compile().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_malformed_selector_reports_css() {
        let broken = ElementSelector::new("div", "data test", "x");
        for _ in 0..2 {
            match broken.compile() {
                Err(EtlError::SelectorError { selector, .. }) => {
                    assert_eq!(selector, r#"div[data test="x"]"#)
                }
                other => panic!("expected SelectorError, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_parse_rejects_blank_markup() {
        assert!(matches!(
            MarkupDocument::parse("   \n\t"),
            Err(EtlError::MarkupError { .. })
        ));
        assert!(MarkupDocument::parse("").is_err());
        assert!(MarkupDocument::parse("<p>a\0b</p>").is_err());
    }

    #[test]
    fn test_parse_tolerates_broken_tags() {
        let doc = MarkupDocument::parse(r#"<div data-test-id="item"><span>open"#).unwrap();
        assert_eq!(doc.first_text(&ITEM).unwrap(), "open");
    }

    #[test]
    fn test_find_first_absent_is_none() {
        let doc = MarkupDocument::parse("<html><body><p>nothing</p></body></html>").unwrap();
        assert!(doc.find_first(&ITEM).unwrap().is_none());
        assert!(doc.find_all(&ITEM).unwrap().is_empty());
        assert_eq!(doc.first_text(&ITEM).unwrap(), "");
    }

    #[test]
    fn test_find_all_in_document_order() {
        let doc = MarkupDocument::parse(
            r#"<div data-test-id="item">a</div><div data-test-id="other">x</div><div data-test-id="item">b</div>"#,
        )
        .unwrap();
        let found: Vec<String> = doc
            .find_all(&ITEM)
            .unwrap()
            .into_iter()
            .map(|e| text(e, false))
            .collect();
        assert_eq!(found, vec!["a", "b"]);
    }

    #[test]
    fn test_text_direct_versus_descendant() {
        let doc = MarkupDocument::parse(
            r#"<div data-test-id="item">  own <span> nested </span> tail </div>"#,
        )
        .unwrap();
        let element = doc.find_first(&ITEM).unwrap().unwrap();
        assert_eq!(text(element, true), "owntail");
        assert_eq!(text(element, false), "ownnestedtail");
        assert_eq!(stripped_strings(element), vec!["own", "nested", "tail"]);
    }

    #[test]
    fn test_child_elements_skips_grandchildren() {
        let doc = MarkupDocument::parse(
            r#"<div data-test-id="item"><span>1</span><p><span>deep</span></p><span>2</span></div>"#,
        )
        .unwrap();
        let element = doc.find_first(&ITEM).unwrap().unwrap();
        let spans: Vec<String> = child_elements(element, "span")
            .into_iter()
            .map(|e| text(e, false))
            .collect();
        assert_eq!(spans, vec!["1", "2"]);
    }
}
