//! Test support: a minimal tokenizer and document builders.
//!
//! Real deployments feed the engine tokens from a proper NLP front-end; for
//! tests a whitespace-and-punctuation lexer is enough to exercise grammar and
//! merging behavior on literal strings.

use logos::Logos;

use crate::document::{DocumentTree, UnitId, UnitKind};
use crate::token::{Sentence, Token};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
    #[regex(r#"[^\s.,;:!?()\[\]{}"']+"#)]
    Word,
    #[regex(r#"[.,;:!?()\[\]{}"']"#)]
    Punct,
}

/// Tokenize a plain string into a [`Sentence`].
pub fn sentence(text: &str) -> Sentence {
    let mut tokens = Vec::new();
    let mut lexer = RawToken::lexer(text);
    while let Some(result) = lexer.next() {
        if result.is_err() {
            continue;
        }
        let span = lexer.span();
        tokens.push(Token::new(lexer.slice(), span.start, span.end, tokens.len()));
    }
    Sentence::new(text, tokens, 0)
}

/// A document with one paragraph holding the given sentences, returning the
/// sentence unit ids in order.
pub fn single_paragraph(sentences: &[&str]) -> (DocumentTree, Vec<UnitId>) {
    let mut tree = DocumentTree::new();
    let paragraph = tree.add_unit(UnitKind::Paragraph, tree.root());
    let units = sentences
        .iter()
        .map(|text| tree.add_sentence(paragraph, sentence(text)))
        .collect();
    (tree, units)
}
