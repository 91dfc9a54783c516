//! Immutable token and sentence input model.
//!
//! Tokens are produced by an external NLP front-end (tokenization, sentence
//! splitting and tagging are not this crate's concern). The engine consumes
//! them read-only: every matching and extraction pass is a pure function of
//! the token sequence.

/// A single token of a sentence.
///
/// Carries the surface text, a normalized form (lowercased by convention),
/// optional part-of-speech and named-entity tags assigned by an external
/// tagger, byte offsets into the sentence text, and the token's index within
/// its sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    text: String,
    normalized: String,
    pos_tag: Option<String>,
    ner_tag: Option<String>,
    start: usize,
    end: usize,
    index: usize,
}

impl Token {
    /// Create a token. The normalized form defaults to the lowercased text.
    pub fn new(text: impl Into<String>, start: usize, end: usize, index: usize) -> Self {
        let text = text.into();
        let normalized = text.to_lowercase();
        Token {
            text,
            normalized,
            pos_tag: None,
            ner_tag: None,
            start,
            end,
            index,
        }
    }

    /// Override the normalized form (e.g. Unicode-folded by the front-end).
    pub fn with_normalized(mut self, normalized: impl Into<String>) -> Self {
        self.normalized = normalized.into();
        self
    }

    pub fn with_pos_tag(mut self, tag: impl Into<String>) -> Self {
        self.pos_tag = Some(tag.into());
        self
    }

    pub fn with_ner_tag(mut self, tag: impl Into<String>) -> Self {
        self.ner_tag = Some(tag.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn pos_tag(&self) -> Option<&str> {
        self.pos_tag.as_deref()
    }

    pub fn ner_tag(&self) -> Option<&str> {
        self.ner_tag.as_deref()
    }

    /// Byte offset of the token start within the sentence text.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset one past the token end within the sentence text.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Index of this token within its sentence.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// An ordered sequence of tokens with the sentence's surface text.
///
/// Owned by exactly one structural unit once attached to a document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    text: String,
    tokens: Vec<Token>,
    start: usize,
}

impl Sentence {
    /// Build a sentence from pre-tokenized input.
    ///
    /// `start` is the character offset of the sentence within its document,
    /// zero when unknown.
    pub fn new(text: impl Into<String>, tokens: Vec<Token>, start: usize) -> Self {
        Sentence {
            text: text.into(),
            tokens,
            start,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_defaults_to_lowercase() {
        let token = Token::new("Melting", 0, 7, 0);
        assert_eq!(token.text(), "Melting");
        assert_eq!(token.normalized(), "melting");
    }

    #[test]
    fn builder_tags_are_preserved() {
        let token = Token::new("H2O", 0, 3, 0)
            .with_pos_tag("NN")
            .with_ner_tag("CM");
        assert_eq!(token.pos_tag(), Some("NN"));
        assert_eq!(token.ner_tag(), Some("CM"));
    }
}
