//! Rule-based fact extraction over tokenized text.
//!
//! The engine takes sentences that an external front-end has already
//! tokenized, matches them against registered token-level grammars, and turns
//! matches into typed records. Records with contextual fields are completed
//! by structural proximity within a document tree, so a property mentioned in
//! one sentence can attach to a subject named in another.
//!
//! The pipeline, in order:
//!
//! 1. [`grammar`] — composable parser combinators over token sequences.
//! 2. [`trigger`] — trigger-phrase admission control and result caching, so
//!    most parsers never run on most sentences.
//! 3. [`parser`] — a grammar paired with an interpretation that builds
//!    [`model::Record`]s from matches.
//! 4. [`document`] and [`merge`] — the structural tree and the contextual
//!    merging that resolves cross-sentence references.
//! 5. [`engine`] — the façade tying it together.
//!
//! ```no_run
//! use std::sync::Arc;
//! use chemext::engine::ExtractionEngine;
//! use chemext::grammar::{caseless, group, hide, re, skip_to};
//! use chemext::model::{FieldDescriptor, ModelDescriptor, Record};
//! use chemext::parser::Interpret;
//!
//! # fn main() -> Result<(), chemext::error::GrammarError> {
//! let model = Arc::new(
//!     ModelDescriptor::new("melting_point")
//!         .with_field(FieldDescriptor::quantity("value").required()),
//! );
//! let grammar = hide(caseless("melting point")? | caseless("mp")?)
//!     + skip_to(group("value", re(r"^\d")?));
//! let target = Arc::clone(&model);
//! let interpret: Interpret = Box::new(move |result, sentence, _, _| {
//!     let Some(value) = result.first("value") else { return Vec::new() };
//!     let raw = value.text(sentence.tokens());
//!     let Some(quantity) = chemext::quantity::parse_quantity(&raw) else {
//!         return Vec::new();
//!     };
//!     let mut record = Record::new(Arc::clone(&target));
//!     record.set_quantity("value", quantity);
//!     vec![record]
//! });
//! let engine = ExtractionEngine::builder()
//!     .register(model, grammar, interpret, Some(&["melting point", "mp"]))
//!     .build();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod grammar;
pub mod merge;
pub mod model;
pub mod parser;
pub mod quantity;
pub mod testing;
pub mod token;
pub mod trigger;

pub use config::EngineConfig;
pub use document::{DocumentTree, Range, UnitId, UnitKind};
pub use engine::{EngineBuilder, ExtractionEngine};
pub use error::GrammarError;
pub use merge::{MergePolicy, TieBreak};
pub use model::{FieldDescriptor, FieldKind, FieldValue, ModelDescriptor, Quantity, Record};
pub use parser::{Interpret, Parser};
pub use token::{Sentence, Token};
