use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html};

use crate::encoding::decode_html;

/// An element of a parsed page.
pub type Node<'a> = ElementRef<'a>;

lazy_static! {
    static ref RE_BR_TAG: Regex = Regex::new(r"(?i)<br\s*/?>").unwrap();
}

/// A parsed HTML page.
///
/// Parsing never fails, html5ever recovers from malformed or partial markup
/// and the queries below only ever report absence.
pub struct Document {
    html: Html,
    had_decode_errors: bool,
}

impl Document {
    pub fn parse(markup: &str) -> Self {
        Document {
            html: Html::parse_document(markup),
            had_decode_errors: false,
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::from_bytes_with(bytes, false)
    }

    /// Decode the bytes, optionally reinserting the line breaks that some
    /// pages only carry as `<br>` tags, then parse.
    pub fn from_bytes_with(bytes: &[u8], line_breaks: bool) -> Self {
        let page = decode_html(bytes);
        let markup = if line_breaks {
            reinsert_line_breaks(&page.text)
        } else {
            page.text
        };
        let mut doc = Self::parse(&markup);
        doc.had_decode_errors = page.had_errors;
        doc
    }

    pub fn had_decode_errors(&self) -> bool {
        self.had_decode_errors
    }

    /// All elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = Node<'_>> {
        self.html.root_element().descendants().filter_map(ElementRef::wrap)
    }

    pub fn find_all(&self, tag: &str) -> Vec<Node<'_>> {
        let tag = tag.to_ascii_lowercase();
        self.elements().filter(|e| e.value().name() == tag).collect()
    }

    pub fn first(&self, tag: &str) -> Option<Node<'_>> {
        let tag = tag.to_ascii_lowercase();
        self.elements().find(|e| e.value().name() == tag)
    }

    pub fn find_by_class(&self, class: &str) -> Vec<Node<'_>> {
        self.elements()
            .filter(|e| e.value().classes().any(|c| c == class))
            .collect()
    }

    /// The trimmed text of the `<title>` element.
    pub fn title(&self) -> Option<String> {
        self.first("title").map(|t| self.text_of(t).trim().to_string())
    }

    /// Visible text of the whole page, line breaks preserved.
    pub fn text(&self) -> String {
        self.html.root_element().text().collect()
    }

    pub fn text_of(&self, node: Node<'_>) -> String {
        node.text().collect()
    }

    pub fn attr<'a>(&self, node: Node<'a>, name: &str) -> Option<&'a str> {
        node.value().attr(name)
    }

    /// The first bold descendant of a node, used to spot chapter headings.
    pub fn find_emphasis_child<'a>(&self, node: Node<'a>) -> Option<Node<'a>> {
        node.descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .find(|e| matches!(e.value().name(), "b" | "strong"))
    }
}

/// Append a newline after every `<br>` tag in raw markup.
pub fn reinsert_line_breaks(markup: &str) -> String {
    RE_BR_TAG.replace_all(markup, "$0\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queries() {
        let doc = Document::parse(r#"<html><head><title> Statius: Silvae I </title></head>
<body><h1>STATIUS</h1><h1 class="date">(c. 45 - c. 96 A.D.)</h1>
<p>one</p><p><b>Ecloga</b> two</p><a href="statius/silvae1.shtml">Silvae I</a></body></html>"#);

        assert_eq!(doc.title().as_deref(), Some("Statius: Silvae I"));
        assert_eq!(doc.find_all("h1").len(), 2);
        assert_eq!(doc.find_all("P").len(), 2);

        let date = doc.find_by_class("date");
        assert_eq!(date.len(), 1);
        assert_eq!(doc.text_of(date[0]), "(c. 45 - c. 96 A.D.)");

        let a = doc.first("a").unwrap();
        assert_eq!(doc.attr(a, "href"), Some("statius/silvae1.shtml"));

        let ps = doc.find_all("p");
        assert!(doc.find_emphasis_child(ps[0]).is_none());
        let b = doc.find_emphasis_child(ps[1]).unwrap();
        assert_eq!(doc.text_of(b), "Ecloga");
    }

    #[test]
    fn test_text_keeps_line_breaks() {
        let doc = Document::parse("<html><head><title>T</title></head><body><p>\nalpha<i>beta</i>\ngamma\n</p></body></html>");
        let p = doc.first("p").unwrap();
        assert_eq!(doc.text_of(p), "\nalphabeta\ngamma\n");
        assert_eq!(doc.text(), "T\nalphabeta\ngamma\n");
    }

    #[test]
    fn test_malformed_markup_does_not_fail() {
        let doc = Document::parse("<p>unclosed <b>bold<p>next</td></table>");
        assert_eq!(doc.find_all("p").len(), 2);
        assert!(doc.title().is_none());
    }

    #[test]
    fn test_reinsert_line_breaks() {
        assert_eq!(
            reinsert_line_breaks("arma<br>virum<BR>cano<br/>"),
            "arma<br>\nvirum<BR>\ncano<br/>\n"
        );
        let doc = Document::from_bytes_with(b"<html><body><p>a<br>b</p></body></html>", true);
        assert_eq!(doc.text_of(doc.first("p").unwrap()), "a\nb");
    }

    #[test]
    fn test_from_bytes_replaces_bad_bytes() {
        let doc = Document::from_bytes(b"<html><body><p>Tr\xF3ia</p></body></html>");
        assert!(doc.had_decode_errors());
        assert_eq!(doc.text_of(doc.first("p").unwrap()), "Tr\u{FFFD}ia");
    }
}
