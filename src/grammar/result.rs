//! Capture trees produced by successful grammar matches.

use crate::token::Token;

/// A tree of named, non-overlapping captured token spans.
///
/// Interior nodes come from composites and named groups; leaves are the token
/// spans consumed by leaf elements. Sibling spans are sequential and never
/// overlap — composites only ever append captures left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    name: Option<String>,
    start: usize,
    end: usize,
    children: Vec<ParseResult>,
}

impl ParseResult {
    /// An unnamed leaf covering `start..end`.
    pub(crate) fn span(start: usize, end: usize) -> Self {
        ParseResult {
            name: None,
            start,
            end,
            children: Vec::new(),
        }
    }

    /// A zero-width placeholder (hidden or optional-empty match).
    pub(crate) fn empty(at: usize) -> Self {
        ParseResult::span(at, at)
    }

    /// An unnamed interior node with the given captures.
    pub(crate) fn node(start: usize, end: usize, children: Vec<ParseResult>) -> Self {
        ParseResult {
            name: None,
            start,
            end,
            children,
        }
    }

    /// A named capture node.
    pub(crate) fn named(
        name: String,
        start: usize,
        end: usize,
        children: Vec<ParseResult>,
    ) -> Self {
        ParseResult {
            name: Some(name),
            start,
            end,
            children,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// First token index covered by this capture.
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last token index covered by this capture.
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn children(&self) -> &[ParseResult] {
        &self.children
    }

    pub(crate) fn into_children(self) -> Vec<ParseResult> {
        self.children
    }

    /// Depth-first search for the first capture with the given name.
    pub fn first(&self, name: &str) -> Option<&ParseResult> {
        if self.name.as_deref() == Some(name) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.first(name))
    }

    /// All captures with the given name, in document order.
    pub fn all<'r>(&'r self, name: &str) -> Vec<&'r ParseResult> {
        let mut found = Vec::new();
        self.collect_named(name, &mut found);
        found
    }

    fn collect_named<'r>(&'r self, name: &str, found: &mut Vec<&'r ParseResult>) {
        if self.name.as_deref() == Some(name) {
            found.push(self);
        }
        for child in &self.children {
            child.collect_named(name, found);
        }
    }

    /// Surface text of the covered tokens, joined with single spaces.
    pub fn text(&self, tokens: &[Token]) -> String {
        tokens[self.start..self.end]
            .iter()
            .map(Token::text)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sentence;

    #[test]
    fn first_finds_nested_captures() {
        let inner = ParseResult::named("value".to_string(), 2, 3, vec![]);
        let outer = ParseResult::named("prop".to_string(), 0, 3, vec![inner]);
        let root = ParseResult::node(0, 3, vec![outer]);
        assert_eq!(root.first("value").map(|r| r.start()), Some(2));
        assert!(root.first("missing").is_none());
    }

    #[test]
    fn all_returns_captures_in_order() {
        let root = ParseResult::node(
            0,
            4,
            vec![
                ParseResult::named("item".to_string(), 0, 1, vec![]),
                ParseResult::named("item".to_string(), 2, 3, vec![]),
            ],
        );
        let items = root.all("item");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].start(), 0);
        assert_eq!(items[1].start(), 2);
    }

    #[test]
    fn text_joins_covered_tokens() {
        let s = sentence("the melting point was high");
        let capture = ParseResult::span(1, 3);
        assert_eq!(capture.text(s.tokens()), "melting point");
    }
}
