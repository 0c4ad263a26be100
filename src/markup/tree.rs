//! Tolerant fragment parser producing a small typed tree.
//!
//! Content strings are hand-written or generated and are frequently not
//! well formed: there is no single root, end tags may be missing or
//! mismatched, attribute values may be unquoted, and void elements such as
//! `<br>` are not self-closed. The parser accepts all of that:
//!
//! - an end tag closes the nearest open element with the same name (and
//!   everything opened after it); an end tag with no open match is ignored;
//! - elements still open at the end of input are closed there;
//! - comments, processing instructions and doctypes are dropped;
//! - element and attribute names are lower-cased;
//! - a `<` that cannot start a tag (`5 < 6`, `<3`) is text;
//! - HTML named and numeric character references are decoded; an unknown
//!   or unterminated reference is kept literally.
//!
//! Input that the underlying reader still cannot tokenize (for example an
//! unterminated tag) degrades to a single text node holding the input with
//! its complete tags stripped.

use std::borrow::Cow;

use quick_xml::escape::resolve_html5_entity;
use quick_xml::events::{BytesStart, Event};

/// Elements that never have content.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// An element with its attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lower-cased tag name
    pub name: String,
    /// Attributes in source order, keys lower-cased
    pub attrs: Vec<(String, String)>,
    /// Child nodes in document order
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element without attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Get an attribute value.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Check if an attribute is present (with or without a value).
    pub fn has_attr(&self, key: &str) -> bool {
        self.attrs.iter().any(|(k, _)| k == key)
    }

    /// Text content with all tags stripped.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

/// A node of a parsed fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Element(Element),
}

impl Node {
    /// Text content with all tags stripped.
    pub fn text(&self) -> String {
        match self {
            Node::Text(t) => t.clone(),
            Node::Element(e) => e.text(),
        }
    }

    /// The element, if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) => collect_text(&e.children, out),
        }
    }
}

fn find_in<'a>(nodes: &'a [Node], name: &str) -> Option<&'a Element> {
    nodes.iter().find_map(|node| match node {
        Node::Element(e) if e.name == name => Some(e),
        Node::Element(e) => find_in(&e.children, name),
        Node::Text(_) => None,
    })
}

fn unwrap_in(nodes: &mut Vec<Node>, name: &str) -> Option<Vec<(String, String)>> {
    for i in 0..nodes.len() {
        let Node::Element(e) = &mut nodes[i] else {
            continue;
        };
        if e.name != name {
            if let Some(attrs) = unwrap_in(&mut e.children, name) {
                return Some(attrs);
            }
            continue;
        }

        let children = std::mem::take(&mut e.children);
        let attrs = std::mem::take(&mut e.attrs);
        nodes.splice(i..=i, children);
        merge_adjacent_text(nodes);
        return Some(attrs);
    }
    None
}

fn merge_adjacent_text(nodes: &mut Vec<Node>) {
    let mut merged: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in nodes.drain(..) {
        match node {
            Node::Text(t) => match merged.last_mut() {
                Some(Node::Text(prev)) => prev.push_str(&t),
                _ => merged.push(Node::Text(t)),
            },
            element => merged.push(element),
        }
    }
    *nodes = merged;
}

/// A parsed markup fragment: a forest of top-level nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    nodes: Vec<Node>,
}

impl Fragment {
    /// Parse a markup fragment.
    pub fn parse(input: &str) -> Self {
        match TreeBuilder::default().parse(&escape_stray_lt(input)) {
            Ok(fragment) => fragment,
            Err(e) => {
                tracing::warn!(error = %e, "markup not tokenizable, using plain text");
                Self::plain(input)
            }
        }
    }

    fn plain(input: &str) -> Self {
        let text = decode_entities(&strip_tags(input)).into_owned();
        let nodes = if text.is_empty() { Vec::new() } else { vec![Node::Text(text)] };
        Self { nodes }
    }

    /// Top-level nodes in document order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// First element with the given name, in document order, at any depth.
    pub fn find_first(&self, name: &str) -> Option<&Element> {
        find_in(&self.nodes, name)
    }

    /// Check if an element with the given name exists at any depth.
    pub fn contains(&self, name: &str) -> bool {
        self.find_first(name).is_some()
    }

    /// Replace the first element with the given name by its children, in
    /// place, and return its attributes.
    pub fn unwrap_first(&mut self, name: &str) -> Option<Vec<(String, String)>> {
        unwrap_in(&mut self.nodes, name)
    }

    /// Text content with all tags stripped.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.nodes, &mut out);
        out
    }
}

#[derive(Default)]
struct TreeBuilder {
    root: Vec<Node>,
    open: Vec<Element>,
}

impl TreeBuilder {
    fn parse(mut self, input: &str) -> std::result::Result<Fragment, String> {
        let mut reader = quick_xml::Reader::from_str(input);
        let config = reader.config_mut();
        config.trim_text(false);
        config.check_end_names = false;
        config.allow_unmatched_ends = true;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    let element = element(&e);
                    if VOID_ELEMENTS.contains(&element.name.as_str()) {
                        self.push(Node::Element(element));
                    } else {
                        self.open.push(element);
                    }
                }
                Ok(Event::Empty(e)) => self.push(Node::Element(element(&e))),
                Ok(Event::End(e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_lowercase();
                    match self.open.iter().rposition(|el| el.name == name) {
                        Some(depth) => self.close_to(depth),
                        None => tracing::debug!(tag = %name, "ignoring unmatched end tag"),
                    }
                }
                Ok(Event::Text(t)) => {
                    let raw = String::from_utf8_lossy(&t);
                    self.push_text(decode_entities(&raw).into_owned());
                }
                Ok(Event::CData(t)) => {
                    self.push_text(String::from_utf8_lossy(&t).into_owned());
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(format!("at byte {}: {}", reader.error_position(), e)),
                _ => {}
            }
        }

        self.close_to(0);
        Ok(Fragment { nodes: self.root })
    }

    fn siblings(&mut self) -> &mut Vec<Node> {
        match self.open.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut self.root,
        }
    }

    fn push(&mut self, node: Node) {
        self.siblings().push(node);
    }

    fn push_text(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        let siblings = self.siblings();
        match siblings.last_mut() {
            Some(Node::Text(prev)) => prev.push_str(&text),
            _ => siblings.push(Node::Text(text)),
        }
    }

    fn close_to(&mut self, depth: usize) {
        while self.open.len() > depth {
            if let Some(element) = self.open.pop() {
                self.push(Node::Element(element));
            }
        }
    }
}

fn element(start: &BytesStart<'_>) -> Element {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()).to_lowercase());
    for attr in start.html_attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_lowercase();
        if element.has_attr(&key) {
            continue;
        }
        let raw = String::from_utf8_lossy(&attr.value);
        element.attrs.push((key, decode_entities(&raw).into_owned()));
    }
    element
}

/// Whether `<` followed by `next` can open a tag, comment or declaration.
fn opens_tag(next: Option<char>) -> bool {
    next.is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
}

/// Escape every `<` that cannot open a tag so the reader sees it as text.
fn escape_stray_lt(input: &str) -> Cow<'_, str> {
    let mut chars = input.char_indices().peekable();
    let mut out: Option<String> = None;
    let mut copied = 0;

    while let Some((i, c)) = chars.next() {
        if c == '<' && !opens_tag(chars.peek().map(|&(_, n)| n)) {
            let buf = out.get_or_insert_with(|| String::with_capacity(input.len() + 8));
            buf.push_str(&input[copied..i]);
            buf.push_str("&lt;");
            copied = i + 1;
        }
    }

    match out {
        Some(mut buf) => {
            buf.push_str(&input[copied..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(input),
    }
}

/// Drop complete tags, keeping any `<` that does not start one.
fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('<') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        match tail.find('>') {
            Some(end) if opens_tag(tail.chars().next()) => rest = &tail[end + 1..],
            _ => {
                out.push('<');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decode character references one at a time.
fn decode_entities(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        let reference = tail
            .find(';')
            .filter(|&end| end > 0)
            .and_then(|end| resolve_reference(&tail[..end]).map(|decoded| (end, decoded)));
        match reference {
            Some((end, decoded)) => {
                out.push_str(&decoded);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn resolve_reference(name: &str) -> Option<Cow<'static, str>> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse().ok()?,
        };
        return char::from_u32(code).map(|c| Cow::Owned(c.to_string()));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    resolve_html5_entity(name).map(Cow::Borrowed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element_names(nodes: &[Node]) -> Vec<String> {
        nodes
            .iter()
            .map(|n| match n {
                Node::Text(t) => format!("#{}", t),
                Node::Element(e) => e.name.clone(),
            })
            .collect()
    }

    #[test]
    fn test_plain_text() {
        let fragment = Fragment::parse("plain text");
        assert_eq!(fragment.nodes(), &[Node::Text("plain text".to_string())]);
    }

    #[test]
    fn test_multiple_roots() {
        let fragment = Fragment::parse("a<b>bold</b>c<i>it</i>");
        assert_eq!(element_names(fragment.nodes()), vec!["#a", "b", "#c", "i"]);
        assert_eq!(fragment.text(), "aboldcit");
    }

    #[test]
    fn test_attributes() {
        let fragment =
            Fragment::parse(r#"<SPAN Style="color:#FF0000" data-link='https://x?a=1&amp;b=2'>t</SPAN>"#);
        let span = fragment.find_first("span").unwrap();
        assert_eq!(span.attr("style"), Some("color:#FF0000"));
        assert_eq!(span.attr("data-link"), Some("https://x?a=1&b=2"));
        assert!(!span.has_attr("class"));
    }

    #[test]
    fn test_unquoted_attribute() {
        let fragment = Fragment::parse("<p level=2>Hi</p>");
        assert_eq!(fragment.find_first("p").unwrap().attr("level"), Some("2"));
    }

    #[test]
    fn test_unclosed_elements_close_at_end() {
        let fragment = Fragment::parse("<p>one <span>two");
        let p = fragment.find_first("p").unwrap();
        assert_eq!(p.text(), "one two");
        assert_eq!(fragment.nodes().len(), 1);
    }

    #[test]
    fn test_mismatched_end_tags() {
        let fragment = Fragment::parse("<b>x<i>y</b>z</i>");
        assert_eq!(element_names(fragment.nodes()), vec!["b", "#z"]);
        assert_eq!(fragment.text(), "xyz");
    }

    #[test]
    fn test_void_elements() {
        let fragment = Fragment::parse("a<br>b<img src=x>c");
        assert_eq!(element_names(fragment.nodes()), vec!["#a", "br", "#b", "img", "#c"]);
    }

    #[test]
    fn test_comments_dropped_and_text_merged() {
        let fragment = Fragment::parse("a<!-- note -->b");
        assert_eq!(fragment.nodes(), &[Node::Text("ab".to_string())]);
    }

    #[test]
    fn test_entities() {
        let fragment = Fragment::parse("a &amp; b &lt; c");
        assert_eq!(fragment.text(), "a & b < c");

        let fragment = Fragment::parse("fish & chips");
        assert_eq!(fragment.text(), "fish & chips");
    }

    #[test]
    fn test_unwrap_first() {
        let mut fragment = Fragment::parse(r#"x<p level="1">a<span>b</span></p><p>c</p>"#);
        let attrs = fragment.unwrap_first("p").unwrap();
        assert_eq!(attrs, vec![("level".to_string(), "1".to_string())]);
        assert_eq!(element_names(fragment.nodes()), vec!["#xa", "span", "p"]);

        let mut nested = Fragment::parse("<div><p>in</p></div>");
        assert!(nested.unwrap_first("p").is_some());
        let div = nested.find_first("div").unwrap();
        assert_eq!(div.children, vec![Node::Text("in".to_string())]);

        assert!(Fragment::parse("none").unwrap_first("p").is_none());
    }

    #[test]
    fn test_unterminated_tag_degrades_to_text() {
        let fragment = Fragment::parse("a <b>bold</b> <span style=\"x\"");
        assert_eq!(fragment.nodes(), &[Node::Text("a bold <span style=\"x\"".to_string())]);
        assert_eq!(Fragment::parse("a<b").text(), "a<b");
        assert_eq!(Fragment::parse("<br").text(), "<br");
    }

    #[test]
    fn test_stray_less_than_is_text() {
        assert_eq!(Fragment::parse("Revenue grew 5 < 6").text(), "Revenue grew 5 < 6");
        assert_eq!(Fragment::parse("x < y and y > z").text(), "x < y and y > z");
        assert_eq!(Fragment::parse("ends with <").text(), "ends with <");

        let fragment = Fragment::parse(r#"<p level="1">Growth <3 team</p>"#);
        assert_eq!(element_names(fragment.nodes()), vec!["p"]);
        assert_eq!(fragment.text(), "Growth <3 team");

        let fragment = Fragment::parse("<span>1 < 2</span> rest");
        assert_eq!(fragment.find_first("span").unwrap().text(), "1 < 2");
        assert_eq!(fragment.text(), "1 < 2 rest");
    }

    #[test]
    fn test_html_entities() {
        let fragment = Fragment::parse("Price&nbsp;now &copy; 2024 &amp; more");
        assert_eq!(fragment.text(), "Price\u{a0}now \u{a9} 2024 & more");

        let fragment = Fragment::parse("<span>A &amp; B &bogus; C &#65;&#x42;</span>");
        assert_eq!(fragment.text(), "A & B &bogus; C AB");

        let fragment = Fragment::parse(r#"<span data-link="https://x?a=1&amp;b=2&c">t</span>"#);
        assert_eq!(fragment.find_first("span").unwrap().attr("data-link"), Some("https://x?a=1&b=2&c"));
    }
}
