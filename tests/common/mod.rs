#![allow(dead_code)]

//! Shared fixtures: a small chemistry-flavored rule set.

use std::sync::Arc;

use chemext::engine::ExtractionEngine;
use chemext::grammar::{caseless, group, hide, opt, re, skip_to};
use chemext::model::{FieldDescriptor, ModelDescriptor, Record};
use chemext::parser::Interpret;
use chemext::quantity::parse_quantity;
use chemext::{EngineConfig, Range};

pub fn compound_model() -> Arc<ModelDescriptor> {
    Arc::new(
        ModelDescriptor::new("compound").with_field(FieldDescriptor::text("name").required()),
    )
}

pub fn melting_point_model(max_range: Range) -> Arc<ModelDescriptor> {
    Arc::new(
        ModelDescriptor::new("melting_point")
            .with_field(FieldDescriptor::quantity("value").required())
            .with_field(FieldDescriptor::model("compound", "compound").contextual(max_range)),
    )
}

pub fn apparatus_model() -> Arc<ModelDescriptor> {
    Arc::new(
        ModelDescriptor::new("apparatus").with_field(FieldDescriptor::text("name").required()),
    )
}

/// An engine with compound, melting-point and apparatus rules.
///
/// The melting-point parser carries explicit trigger phrases; the others
/// derive theirs from their grammars.
pub fn build_engine(config: EngineConfig, max_range: Range) -> ExtractionEngine {
    let compound = compound_model();
    let compound_grammar = group(
        "name",
        re(r"^[A-Z][A-Za-z0-9]*\d[A-Za-z0-9]*$").unwrap(),
    ) + hide(caseless("was prepared").unwrap() | caseless("was synthesized").unwrap());
    let compound_target = Arc::clone(&compound);
    let compound_interpret: Interpret = Box::new(move |result, s, _, _| {
        let name = match result.first("name") {
            Some(node) => node.text(s.tokens()),
            None => return Vec::new(),
        };
        let mut record = Record::new(Arc::clone(&compound_target));
        record.set_text("name", name);
        vec![record]
    });

    let mp = melting_point_model(max_range);
    let mp_grammar = hide(caseless("melting point").unwrap() | caseless("mp").unwrap())
        + skip_to(group("value", re(r"^[+-]?\d").unwrap()))
        + opt(group("units", re(r"^°[A-Za-z]+$|^K$").unwrap()));
    let mp_target = Arc::clone(&mp);
    let mp_interpret: Interpret = Box::new(move |result, s, _, _| {
        let raw = match (result.first("value"), result.first("units")) {
            (Some(value), Some(units)) => {
                format!("{} {}", value.text(s.tokens()), units.text(s.tokens()))
            }
            (Some(value), None) => value.text(s.tokens()),
            _ => return Vec::new(),
        };
        let Some(quantity) = parse_quantity(&raw) else {
            return Vec::new();
        };
        let mut record = Record::new(Arc::clone(&mp_target));
        record.set_quantity("value", quantity);
        vec![record]
    });

    let apparatus = apparatus_model();
    let apparatus_grammar = group("name", re(r"^[A-Z][A-Za-z0-9]*$").unwrap())
        + hide(caseless("spectrometer").unwrap());
    let apparatus_target = Arc::clone(&apparatus);
    let apparatus_interpret: Interpret = Box::new(move |result, s, _, _| {
        let name = match result.first("name") {
            Some(node) => node.text(s.tokens()),
            None => return Vec::new(),
        };
        // Formula-shaped tokens are compounds, not instruments.
        if name.chars().any(|c| c.is_ascii_digit()) {
            return Vec::new();
        }
        let mut record = Record::new(Arc::clone(&apparatus_target));
        record.set_text("name", name);
        vec![record]
    });

    ExtractionEngine::builder()
        .with_config(config)
        .register(compound, compound_grammar, compound_interpret, None)
        .register(mp, mp_grammar, mp_interpret, Some(&["melting point", "mp"]))
        .register(apparatus, apparatus_grammar, apparatus_interpret, None)
        .build()
}
