//! The extraction engine: registered parsers, admission control and the
//! document pipeline.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::document::DocumentTree;
use crate::grammar::ParseElement;
use crate::merge::merge;
use crate::model::{ModelDescriptor, Record};
use crate::parser::{Interpret, Parser};
use crate::token::Sentence;
use crate::trigger::{fingerprint, AdmissionCache, TriggerIndex};

/// Assembles an [`ExtractionEngine`] from models, grammars and
/// interpretations.
pub struct EngineBuilder {
    config: EngineConfig,
    parsers: Vec<Parser>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        EngineBuilder {
            config: EngineConfig::default(),
            parsers: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Register one extraction rule.
    ///
    /// When `triggers` is given, those phrases index the parser's admission
    /// filter verbatim. When it is `None`, trigger phrases are derived from
    /// the grammar; grammars with no necessary literal run unfiltered.
    pub fn register(
        mut self,
        model: Arc<ModelDescriptor>,
        grammar: ParseElement,
        interpret: Interpret,
        triggers: Option<&[&str]>,
    ) -> Self {
        let trigger = if self.config.trigger.enabled {
            let bits = self.config.trigger.bloom_bits;
            let hashes = self.config.trigger.hash_count;
            match triggers {
                Some(phrases) => {
                    TriggerIndex::from_phrases(phrases.iter().copied(), bits, hashes)
                }
                None => TriggerIndex::derive(&grammar, bits, hashes),
            }
        } else {
            None
        };
        if trigger.is_none() {
            debug!(model = %model.name, "parser registered without admission filter");
        }
        self.parsers.push(Parser::new(model, grammar, interpret, trigger));
        self
    }

    pub fn build(self) -> ExtractionEngine {
        info!(parsers = self.parsers.len(), "extraction engine built");
        ExtractionEngine {
            config: self.config,
            parsers: self.parsers,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        EngineBuilder::new()
    }
}

/// The assembled engine. Immutable after build, so it can be shared across
/// threads behind an [`Arc`]; per-document mutable state lives on the stack
/// of each [`extract`](ExtractionEngine::extract) call.
pub struct ExtractionEngine {
    config: EngineConfig,
    parsers: Vec<Parser>,
}

impl ExtractionEngine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run every admitted parser over one free-standing sentence.
    ///
    /// No document context is involved: records come back unowned and
    /// unmerged.
    pub fn parse(&self, sentence: &Sentence) -> Vec<Record> {
        let mut records = Vec::new();
        for parser in &self.parsers {
            if !parser.admits(sentence) {
                continue;
            }
            records.extend(parser.parse_sentence(sentence));
        }
        records
    }

    /// Run the full pipeline over a document tree.
    ///
    /// Every sentence is offered to every parser, gated by admission control
    /// and a per-document result cache, then the extracted records are
    /// contextually merged. Output order follows document order of the
    /// records' owning units.
    pub fn extract(&self, tree: &DocumentTree) -> Vec<Record> {
        // The cache belongs to the admission layer; disabling the layer
        // disables it as a whole.
        let cache_capacity = if self.config.trigger.enabled {
            self.config.trigger.cache_capacity
        } else {
            0
        };
        let mut cache = AdmissionCache::new(cache_capacity);
        let mut records = Vec::new();
        for (unit, sentence) in tree.sentences() {
            let digest = fingerprint(sentence);
            for (parser_index, parser) in self.parsers.iter().enumerate() {
                if let Some(cached) = cache.get(parser_index, digest) {
                    records.extend(cached.iter().cloned().map(|mut record| {
                        record.set_owner(unit);
                        record
                    }));
                    continue;
                }
                if !parser.admits(sentence) {
                    continue;
                }
                let parsed = parser.parse_sentence(sentence);
                cache.insert(parser_index, digest, parsed.clone());
                records.extend(parsed.into_iter().map(|mut record| {
                    record.set_owner(unit);
                    record
                }));
            }
        }
        let stats = cache.stats();
        debug!(
            hits = stats.hits,
            misses = stats.misses,
            evictions = stats.evictions,
            extracted = records.len(),
            "document scan complete"
        );
        merge(tree, records, self.config.merge_policy())
    }

    /// Serialize records into a JSON array of nested key/value structures.
    pub fn serialize(&self, records: &[Record]) -> Value {
        Value::Array(records.iter().map(Record::serialize).collect())
    }
}
