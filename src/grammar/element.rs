//! The closed set of grammar pattern kinds and their matching semantics.

use std::ops::{Add, BitOr};

use regex::Regex;

use super::result::ParseResult;
use super::scan::Scan;
use crate::error::GrammarError;
use crate::token::Token;

/// A node in a composable grammar tree.
///
/// The variant set is closed on purpose: a new pattern kind is a new explicit
/// case in this enum, never an open class hierarchy. Trees are acyclic by
/// construction (children are owned) and never mutated after they are built.
#[derive(Debug, Clone)]
pub enum ParseElement {
    /// Matches consecutive tokens whose surface text equals the phrase words.
    Literal { phrase: Vec<String> },
    /// Matches consecutive tokens whose normalized text equals the phrase
    /// words (phrase is lowercased at construction).
    CaselessLiteral { phrase: Vec<String> },
    /// Matches one token whose text matches a pattern compiled exactly once
    /// at construction time.
    Regex { pattern: String, regex: Regex },
    /// Sequential composition; the first failing child aborts the match.
    And { children: Vec<ParseElement> },
    /// Ordered alternative: first-match-wins in declaration order. This is a
    /// deliberate precedence rule, not longest-match.
    Or { children: Vec<ParseElement> },
    /// Tries the child; on failure succeeds consuming zero tokens.
    Optional { child: Box<ParseElement> },
    /// Greedy repetition, zero or more times.
    ZeroOrMore { child: Box<ParseElement> },
    /// Greedy repetition, at least once.
    OneOrMore { child: Box<ParseElement> },
    /// Matches normally but contributes nothing to the result tree.
    Hide { child: Box<ParseElement> },
    /// Consumes tokens until the child matches, bundling the skipped tokens
    /// into an anonymous capture.
    SkipTo { child: Box<ParseElement> },
    /// Names the child's capture for structured lookup.
    Group {
        name: String,
        child: Box<ParseElement>,
    },
}

impl ParseElement {
    /// Attempt a match starting exactly at `at`.
    ///
    /// Returns the end index (one past the last consumed token) and the
    /// capture tree, or `None` when the element does not match here. Pure
    /// function of `(self, tokens, at)`; restartable at any position.
    pub fn match_at(&self, tokens: &[Token], at: usize) -> Option<(usize, ParseResult)> {
        match self {
            ParseElement::Literal { phrase } => match_phrase(tokens, at, phrase, false),
            ParseElement::CaselessLiteral { phrase } => match_phrase(tokens, at, phrase, true),
            ParseElement::Regex { regex, .. } => {
                let token = tokens.get(at)?;
                if regex.is_match(token.text()) {
                    Some((at + 1, ParseResult::span(at, at + 1)))
                } else {
                    None
                }
            }
            ParseElement::And { children } => {
                let mut pos = at;
                let mut captures = Vec::new();
                for child in children {
                    let (end, result) = child.match_at(tokens, pos)?;
                    pos = end;
                    push_captures(&mut captures, result);
                }
                Some((pos, ParseResult::node(at, pos, captures)))
            }
            ParseElement::Or { children } => {
                children.iter().find_map(|child| child.match_at(tokens, at))
            }
            ParseElement::Optional { child } => child
                .match_at(tokens, at)
                .or_else(|| Some((at, ParseResult::empty(at)))),
            ParseElement::ZeroOrMore { child } => {
                Some(match_repeated(child, tokens, at, 0)?)
            }
            ParseElement::OneOrMore { child } => match_repeated(child, tokens, at, 1),
            ParseElement::Hide { child } => {
                let (end, _) = child.match_at(tokens, at)?;
                Some((end, ParseResult::empty(end)))
            }
            ParseElement::SkipTo { child } => {
                for skip in 0..=tokens.len().saturating_sub(at) {
                    if let Some((end, result)) = child.match_at(tokens, at + skip) {
                        let mut captures = Vec::new();
                        if skip > 0 {
                            captures.push(ParseResult::span(at, at + skip));
                        }
                        push_captures(&mut captures, result);
                        return Some((end, ParseResult::node(at, end, captures)));
                    }
                }
                None
            }
            ParseElement::Group { name, child } => {
                let (end, result) = child.match_at(tokens, at)?;
                let children = into_captures(result);
                Some((end, ParseResult::named(name.clone(), at, end, children)))
            }
        }
    }

    /// Lazily try every start position, yielding `(start, end, result)`.
    ///
    /// After a successful match the next attempt resumes at the match end, so
    /// overlapping matches of one grammar are not reported twice.
    pub fn scan<'g, 't>(&'g self, tokens: &'t [Token]) -> Scan<'g, 't> {
        Scan::new(self, tokens)
    }
}

/// Match a multi-word phrase against consecutive tokens.
fn match_phrase(
    tokens: &[Token],
    at: usize,
    phrase: &[String],
    caseless: bool,
) -> Option<(usize, ParseResult)> {
    let end = at.checked_add(phrase.len())?;
    if end > tokens.len() {
        return None;
    }
    for (offset, word) in phrase.iter().enumerate() {
        let token = &tokens[at + offset];
        let matched = if caseless {
            token.normalized() == word
        } else {
            token.text() == word
        };
        if !matched {
            return None;
        }
    }
    Some((end, ParseResult::span(at, end)))
}

/// Greedy repetition with a zero-width progress guard.
fn match_repeated(
    child: &ParseElement,
    tokens: &[Token],
    at: usize,
    min: usize,
) -> Option<(usize, ParseResult)> {
    let mut pos = at;
    let mut count = 0;
    let mut captures = Vec::new();
    while let Some((end, result)) = child.match_at(tokens, pos) {
        if end == pos {
            // Zero-width child match would never terminate; stop here.
            break;
        }
        pos = end;
        count += 1;
        push_captures(&mut captures, result);
    }
    if count < min {
        return None;
    }
    Some((pos, ParseResult::node(at, pos, captures)))
}

/// Append a child result to a capture list, concatenating unnamed composites
/// and dropping empty placeholders (hidden or zero-width matches).
fn push_captures(captures: &mut Vec<ParseResult>, result: ParseResult) {
    for capture in into_captures(result) {
        captures.push(capture);
    }
}

/// Normalize a child result into the captures it contributes to its parent.
fn into_captures(result: ParseResult) -> Vec<ParseResult> {
    if result.name().is_some() {
        return vec![result];
    }
    if result.children().is_empty() {
        if result.start() == result.end() {
            // Hidden or zero-width: no capture.
            return Vec::new();
        }
        return vec![result];
    }
    result.into_children()
}

/// A literal phrase matcher over token surface text.
///
/// Multi-word text is split on whitespace at construction and matches the
/// same number of consecutive tokens.
pub fn lit(text: &str) -> Result<ParseElement, GrammarError> {
    let phrase: Vec<String> = text.split_whitespace().map(str::to_string).collect();
    if phrase.is_empty() {
        return Err(GrammarError::EmptyLiteral);
    }
    Ok(ParseElement::Literal { phrase })
}

/// A case-insensitive literal phrase matcher over normalized token text.
pub fn caseless(text: &str) -> Result<ParseElement, GrammarError> {
    let phrase: Vec<String> = text
        .split_whitespace()
        .map(|word| word.to_lowercase())
        .collect();
    if phrase.is_empty() {
        return Err(GrammarError::EmptyLiteral);
    }
    Ok(ParseElement::CaselessLiteral { phrase })
}

/// A single-token regex matcher. The pattern is compiled here, exactly once;
/// a bad pattern is a construction-time error, never a match-time one.
pub fn re(pattern: &str) -> Result<ParseElement, GrammarError> {
    let regex = Regex::new(pattern).map_err(|err| GrammarError::InvalidPattern {
        pattern: pattern.to_string(),
        message: err.to_string(),
    })?;
    Ok(ParseElement::Regex {
        pattern: pattern.to_string(),
        regex,
    })
}

/// Sequential composition of the given children, in order.
pub fn seq(children: Vec<ParseElement>) -> Result<ParseElement, GrammarError> {
    if children.is_empty() {
        return Err(GrammarError::EmptyComposite { kind: "sequence" });
    }
    Ok(ParseElement::And { children })
}

/// Ordered alternative over the given children; first match wins.
pub fn first(children: Vec<ParseElement>) -> Result<ParseElement, GrammarError> {
    if children.is_empty() {
        return Err(GrammarError::EmptyComposite { kind: "alternative" });
    }
    Ok(ParseElement::Or { children })
}

pub fn opt(child: ParseElement) -> ParseElement {
    ParseElement::Optional {
        child: Box::new(child),
    }
}

pub fn zero_or_more(child: ParseElement) -> ParseElement {
    ParseElement::ZeroOrMore {
        child: Box::new(child),
    }
}

pub fn one_or_more(child: ParseElement) -> ParseElement {
    ParseElement::OneOrMore {
        child: Box::new(child),
    }
}

/// Match the child but exclude its capture from the result tree.
pub fn hide(child: ParseElement) -> ParseElement {
    ParseElement::Hide {
        child: Box::new(child),
    }
}

/// Consume tokens until the child matches.
pub fn skip_to(child: ParseElement) -> ParseElement {
    ParseElement::SkipTo {
        child: Box::new(child),
    }
}

/// Name the child's capture for structured lookup in the result tree.
pub fn group(name: &str, child: ParseElement) -> ParseElement {
    ParseElement::Group {
        name: name.to_string(),
        child: Box::new(child),
    }
}

impl Add for ParseElement {
    type Output = ParseElement;

    /// `a + b` is sequential composition; nested sequences flatten so that
    /// declaration order is preserved as a single child list.
    fn add(self, rhs: ParseElement) -> ParseElement {
        let mut children = match self {
            ParseElement::And { children } => children,
            other => vec![other],
        };
        match rhs {
            ParseElement::And {
                children: mut tail,
            } => children.append(&mut tail),
            other => children.push(other),
        }
        ParseElement::And { children }
    }
}

impl BitOr for ParseElement {
    type Output = ParseElement;

    /// `a | b` is an ordered alternative; left operands keep precedence.
    fn bitor(self, rhs: ParseElement) -> ParseElement {
        let mut children = match self {
            ParseElement::Or { children } => children,
            other => vec![other],
        };
        match rhs {
            ParseElement::Or {
                children: mut tail,
            } => children.append(&mut tail),
            other => children.push(other),
        }
        ParseElement::Or { children }
    }
}
