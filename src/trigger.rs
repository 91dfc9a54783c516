//! Trigger-phrase admission control.
//!
//! Before a grammar is scanned over a sentence, a cheap pre-filter decides
//! whether the scan can possibly succeed. The filter is sound as a negative:
//! a sentence that would truly match is never skipped. False positives only
//! admit wasted work.
//!
//! Two layers cooperate:
//! - a per-parser bloom-style membership index over trigger phrases, built
//!   once at startup and shared read-only, and
//! - a bounded per-document cache mapping a sentence fingerprint to the
//!   records a parser produced for it, so identical sentences are never
//!   re-parsed.

use std::collections::VecDeque;
use std::hash::Hasher;

use rustc_hash::{FxHashMap, FxHasher};
use tracing::{debug, trace};

use crate::grammar::ParseElement;
use crate::model::Record;
use crate::token::Sentence;

/// A fixed-size bloom filter over normalized trigger words.
///
/// Zero false negatives by construction; the false-positive rate is tuned by
/// bit count and hash count.
#[derive(Debug, Clone)]
pub struct BloomFilter {
    bits: Vec<u64>,
    nbits: usize,
    hash_count: u32,
}

impl BloomFilter {
    pub fn new(nbits: usize, hash_count: u32) -> Self {
        let nbits = nbits.max(64);
        BloomFilter {
            bits: vec![0; nbits.div_ceil(64)],
            nbits,
            hash_count: hash_count.max(1),
        }
    }

    fn index(&self, word: &str, seed: u32) -> usize {
        let mut hasher = FxHasher::default();
        hasher.write_u32(seed);
        hasher.write(word.as_bytes());
        (hasher.finish() % self.nbits as u64) as usize
    }

    pub fn add(&mut self, word: &str) {
        for seed in 0..self.hash_count {
            let index = self.index(word, seed);
            self.bits[index / 64] |= 1 << (index % 64);
        }
    }

    /// Whether the word might be in the set. `false` is definitive.
    pub fn might_contain(&self, word: &str) -> bool {
        (0..self.hash_count).all(|seed| {
            let index = self.index(word, seed);
            self.bits[index / 64] & (1 << (index % 64)) != 0
        })
    }
}

/// Per-parser trigger index: answers "could this parser match the sentence?".
#[derive(Debug, Clone)]
pub struct TriggerIndex {
    bloom: BloomFilter,
    phrases: Vec<Vec<String>>,
}

impl TriggerIndex {
    /// Build from explicit trigger phrases. Empty input yields no index
    /// (the parser is always admitted).
    pub fn from_phrases<I, S>(phrases: I, nbits: usize, hash_count: u32) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let phrases: Vec<Vec<String>> = phrases
            .into_iter()
            .map(|phrase| {
                phrase
                    .as_ref()
                    .split_whitespace()
                    .map(|word| word.to_lowercase())
                    .collect::<Vec<_>>()
            })
            .filter(|words: &Vec<String>| !words.is_empty())
            .collect();
        if phrases.is_empty() {
            return None;
        }
        let mut bloom = BloomFilter::new(nbits, hash_count);
        for words in &phrases {
            // Indexing the first word is enough: a phrase cannot be present
            // without it, so absence of every first word is a sound reject.
            bloom.add(&words[0]);
        }
        Some(TriggerIndex { bloom, phrases })
    }

    /// Derive trigger phrases by walking a grammar tree.
    ///
    /// Collects literal leaves reachable without crossing an `Or` branch that
    /// lacks a literal alternative. This is a best-effort heuristic: it may
    /// over-admit (e.g. case-sensitive literals are indexed case-folded) but
    /// it never under-admits. When no sound phrase set exists — the grammar
    /// can match without any fixed word — no index is built and the parser
    /// is always admitted.
    pub fn derive(grammar: &ParseElement, nbits: usize, hash_count: u32) -> Option<Self> {
        let phrases = necessary_phrases(grammar)?;
        TriggerIndex::from_phrases(phrases, nbits, hash_count)
    }

    /// Whether the parser could match this sentence. `false` is definitive;
    /// `true` may be a false positive.
    ///
    /// Both the case-folded surface text and the front-end normalized form
    /// are probed: literals and regexes match surface text, caseless
    /// literals match the normalized form, and the two can diverge when the
    /// front-end installs a folding of its own.
    pub fn might_match(&self, sentence: &Sentence) -> bool {
        sentence.tokens().iter().any(|token| {
            self.bloom.might_contain(&token.text().to_lowercase())
                || self.bloom.might_contain(token.normalized())
        })
    }

    /// Normalized trigger phrases, mostly for diagnostics.
    pub fn phrases(&self) -> impl Iterator<Item = String> + '_ {
        self.phrases.iter().map(|words| words.join(" "))
    }
}

/// A phrase set of which at least one member must be present for the grammar
/// to match, or `None` when no such set exists.
fn necessary_phrases(element: &ParseElement) -> Option<Vec<String>> {
    match element {
        ParseElement::Literal { phrase } | ParseElement::CaselessLiteral { phrase } => {
            Some(vec![phrase.join(" ").to_lowercase()])
        }
        // A regex token carries no fixed word we can rely on.
        ParseElement::Regex { .. } => None,
        // Any child whose presence is necessary suffices; take the first.
        ParseElement::And { children } => children.iter().find_map(necessary_phrases),
        // Every branch must contribute, otherwise a literal-free alternative
        // could match a sentence the index would reject.
        ParseElement::Or { children } => {
            let mut phrases = Vec::new();
            for child in children {
                phrases.extend(necessary_phrases(child)?);
            }
            Some(phrases)
        }
        // Optional constructs can match empty: nothing is necessary.
        ParseElement::Optional { .. } | ParseElement::ZeroOrMore { .. } => None,
        ParseElement::OneOrMore { child }
        | ParseElement::Hide { child }
        | ParseElement::SkipTo { child }
        | ParseElement::Group { child, .. } => necessary_phrases(child),
    }
}

/// Deterministic digest of a token sequence, for use as a result-cache key.
///
/// The cache replays full parse results, so the key must cover every token
/// attribute matching and interpretation can observe: surface text,
/// normalized form and both tags. Two sentences differing in any of them
/// (for instance only in case) must never share an entry.
pub fn fingerprint(sentence: &Sentence) -> u64 {
    let mut hasher = FxHasher::default();
    for token in sentence.tokens() {
        hasher.write(token.text().as_bytes());
        hasher.write_u8(0xff);
        hasher.write(token.normalized().as_bytes());
        hasher.write_u8(0xff);
        if let Some(tag) = token.pos_tag() {
            hasher.write(tag.as_bytes());
        }
        hasher.write_u8(0xff);
        if let Some(tag) = token.ner_tag() {
            hasher.write(tag.as_bytes());
        }
        hasher.write_u8(0xff);
    }
    hasher.finish()
}

/// Statistics for one cache's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// Bounded LRU cache from `(parser, sentence fingerprint)` to the records
/// that parser produced for the sentence.
///
/// Eviction is silent: losing an entry costs recomputation, never data.
/// One cache serves one document on one worker, so no synchronization is
/// needed.
pub struct AdmissionCache {
    entries: FxHashMap<(usize, u64), Vec<Record>>,
    order: VecDeque<(usize, u64)>,
    capacity: usize,
    stats: CacheStats,
}

impl AdmissionCache {
    pub fn new(capacity: usize) -> Self {
        AdmissionCache {
            entries: FxHashMap::default(),
            order: VecDeque::new(),
            capacity,
            stats: CacheStats::default(),
        }
    }

    pub fn get(&mut self, parser: usize, fingerprint: u64) -> Option<&[Record]> {
        if self.capacity == 0 {
            return None;
        }
        let key = (parser, fingerprint);
        if self.entries.contains_key(&key) {
            self.stats.hits += 1;
            self.touch(key);
            trace!(parser, fingerprint, "admission cache hit");
            self.entries.get(&key).map(Vec::as_slice)
        } else {
            self.stats.misses += 1;
            None
        }
    }

    pub fn insert(&mut self, parser: usize, fingerprint: u64, records: Vec<Record>) {
        if self.capacity == 0 {
            return;
        }
        let key = (parser, fingerprint);
        if self.entries.insert(key, records).is_none() {
            self.order.push_back(key);
        }
        while self.entries.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
                self.stats.evictions += 1;
                debug!(
                    parser = oldest.0,
                    fingerprint = oldest.1,
                    "admission cache evicted entry"
                );
            } else {
                break;
            }
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    fn touch(&mut self, key: (usize, u64)) {
        if let Some(position) = self.order.iter().position(|entry| *entry == key) {
            self.order.remove(position);
            self.order.push_back(key);
        }
    }
}
