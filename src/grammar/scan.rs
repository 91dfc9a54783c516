//! Lazy whole-sentence scanning for un-anchored grammars.

use super::element::ParseElement;
use super::result::ParseResult;
use crate::token::Token;

/// Iterator over every match of a grammar in a token sequence.
///
/// Start positions are tried left to right; after a successful match the
/// scan resumes at the match end, so one grammar never reports overlapping
/// matches. The iterator holds only its cursor — the element and tokens are
/// borrowed immutably, and scanning the same input twice yields the same
/// sequence.
pub struct Scan<'g, 't> {
    element: &'g ParseElement,
    tokens: &'t [Token],
    pos: usize,
}

impl<'g, 't> Scan<'g, 't> {
    pub(crate) fn new(element: &'g ParseElement, tokens: &'t [Token]) -> Self {
        Scan {
            element,
            tokens,
            pos: 0,
        }
    }
}

impl Iterator for Scan<'_, '_> {
    type Item = (usize, usize, ParseResult);

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.tokens.len() {
            let start = self.pos;
            match self.element.match_at(self.tokens, start) {
                Some((end, result)) => {
                    // Guard against zero-width top-level matches looping.
                    self.pos = end.max(start + 1);
                    return Some((start, end, result));
                }
                None => self.pos += 1,
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::grammar::{lit, re, ParseElement};
    use crate::testing::sentence;

    #[test]
    fn scan_tries_every_start_position() {
        let s = sentence("a number 42 then 7 more");
        let digits = re(r"^\d+$").unwrap();
        let matches: Vec<_> = digits.scan(s.tokens()).collect();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].0, 2);
        assert_eq!(matches[1].0, 4);
    }

    #[test]
    fn scan_resumes_after_match_end() {
        let s = sentence("x x x x");
        let pair: ParseElement = lit("x").unwrap() + lit("x").unwrap();
        let matches: Vec<_> = pair.scan(s.tokens()).collect();
        // Non-overlapping: (0,2) and (2,4), never (1,3).
        assert_eq!(matches.len(), 2);
        assert_eq!((matches[0].0, matches[0].1), (0, 2));
        assert_eq!((matches[1].0, matches[1].1), (2, 4));
    }

    #[test]
    fn scan_matches_or_via_second_alternative_from_start() {
        let s = sentence("melting point");
        let element = lit("mp").unwrap() | lit("melting point").unwrap();
        let matches: Vec<_> = element.scan(s.tokens()).collect();
        assert_eq!(matches.len(), 1);
        assert_eq!((matches[0].0, matches[0].1), (0, 2));
    }
}
