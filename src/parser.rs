//! Parsers: a grammar plus the interpretation that turns matches into
//! records.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::grammar::{ParseElement, ParseResult};
use crate::model::{ModelDescriptor, Record};
use crate::token::Sentence;
use crate::trigger::TriggerIndex;

/// Builds records from a grammar match.
///
/// Receives the match tree and the sentence it matched in, with the matched
/// token span. Returning an empty vector rejects the match as semantically
/// implausible even though it parsed.
pub type Interpret =
    Box<dyn Fn(&ParseResult, &Sentence, usize, usize) -> Vec<Record> + Send + Sync>;

/// One registered extraction rule: target model, grammar, interpretation and
/// optional admission index.
pub struct Parser {
    model: Arc<ModelDescriptor>,
    grammar: ParseElement,
    interpret: Interpret,
    trigger: Option<TriggerIndex>,
}

impl Parser {
    pub fn new(
        model: Arc<ModelDescriptor>,
        grammar: ParseElement,
        interpret: Interpret,
        trigger: Option<TriggerIndex>,
    ) -> Self {
        Parser {
            model,
            grammar,
            interpret,
            trigger,
        }
    }

    pub fn model(&self) -> &Arc<ModelDescriptor> {
        &self.model
    }

    pub fn grammar(&self) -> &ParseElement {
        &self.grammar
    }

    pub fn trigger(&self) -> Option<&TriggerIndex> {
        self.trigger.as_ref()
    }

    /// Whether the admission filter lets this sentence through. Parsers
    /// without an index admit everything.
    pub fn admits(&self, sentence: &Sentence) -> bool {
        match &self.trigger {
            Some(index) => index.might_match(sentence),
            None => true,
        }
    }

    /// Scan the sentence with the grammar and interpret every match.
    ///
    /// The result is exactly what an unfiltered scan would produce; admission
    /// control is the caller's concern.
    pub fn parse_sentence(&self, sentence: &Sentence) -> Vec<Record> {
        let mut records = Vec::new();
        for (start, end, result) in self.grammar.scan(sentence.tokens()) {
            let interpreted = (self.interpret)(&result, sentence, start, end);
            if interpreted.is_empty() {
                trace!(
                    model = %self.model.name,
                    start,
                    end,
                    "match rejected by interpretation"
                );
            }
            records.extend(interpreted);
        }
        records
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("model", &self.model.name)
            .field("grammar", &self.grammar)
            .field("triggered", &self.trigger.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{caseless, group, hide, re, skip_to};
    use crate::model::{FieldDescriptor, Quantity};
    use crate::testing::sentence;

    fn melting_point_parser(trigger: Option<TriggerIndex>) -> Parser {
        let model = Arc::new(
            ModelDescriptor::new("melting_point")
                .with_field(FieldDescriptor::quantity("value").required()),
        );
        let grammar = hide(
            caseless("melting point").unwrap() | caseless("mp").unwrap(),
        ) + skip_to(group("value", re(r"^\d").unwrap()));
        let target = Arc::clone(&model);
        let interpret: Interpret = Box::new(move |result, s, _, _| {
            let raw = match result.first("value") {
                Some(node) => node.text(s.tokens()),
                None => return Vec::new(),
            };
            let mut record = Record::new(Arc::clone(&target));
            record.set_quantity(
                "value",
                Quantity {
                    raw: raw.clone(),
                    values: crate::quantity::extract_values(&raw),
                    error: None,
                    unit: None,
                },
            );
            vec![record]
        });
        Parser::new(model, grammar, interpret, trigger)
    }

    #[test]
    fn parse_sentence_interprets_matches() {
        let parser = melting_point_parser(None);
        let records = parser.parse_sentence(&sentence("the melting point was 89"));
        assert_eq!(records.len(), 1);
        assert!(records[0].is_bound("value"));
    }

    #[test]
    fn admission_defaults_to_open_without_index() {
        let parser = melting_point_parser(None);
        assert!(parser.admits(&sentence("nothing relevant here")));
    }

    #[test]
    fn admission_rejects_sentences_without_trigger_words() {
        let index = TriggerIndex::from_phrases(["melting point", "mp"], 1024, 3);
        let parser = melting_point_parser(index);
        assert!(parser.admits(&sentence("the melting point was 89")));
        assert!(parser.admits(&sentence("an mp of 89")));
        assert!(!parser.admits(&sentence("water boils readily")));
    }

    #[test]
    fn empty_interpretation_yields_no_records() {
        let model = Arc::new(ModelDescriptor::new("apparatus"));
        let grammar = re(r"^[A-Z]").unwrap();
        let interpret: Interpret = Box::new(|_, _, _, _| Vec::new());
        let parser = Parser::new(model, grammar, interpret, None);
        assert!(parser.parse_sentence(&sentence("Bruker spectrometer")).is_empty());
    }
}
