//! Model descriptors and extracted records.
//!
//! The engine is domain-agnostic: what a "melting point" or a "compound" is
//! comes in as data, via [`ModelDescriptor`] values supplied by the
//! surrounding application. A [`Record`] is one extracted fact conforming to
//! a descriptor; contextual fields may start unresolved and be completed
//! later by the merging engine.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::document::{Range, UnitId};

/// Describes one extractable model: a name plus its typed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
}

impl ModelDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        ModelDescriptor {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// One field of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    /// Required fields must be bound for a record to count as complete.
    pub required: bool,
    /// Contextual fields may be filled in from other records during merging.
    pub contextual: bool,
    /// The farthest structural distance a contextual binding may span.
    pub max_range: Range,
}

impl FieldDescriptor {
    pub fn text(name: impl Into<String>) -> Self {
        FieldDescriptor {
            name: name.into(),
            kind: FieldKind::Text,
            required: false,
            contextual: false,
            max_range: Range::Document,
        }
    }

    pub fn quantity(name: impl Into<String>) -> Self {
        FieldDescriptor {
            name: name.into(),
            kind: FieldKind::Quantity,
            required: false,
            contextual: false,
            max_range: Range::Document,
        }
    }

    /// A field holding a nested record of the named model. Contextual merging
    /// considers exactly these fields.
    pub fn model(name: impl Into<String>, model_name: impl Into<String>) -> Self {
        FieldDescriptor {
            name: name.into(),
            kind: FieldKind::Model(model_name.into()),
            required: false,
            contextual: false,
            max_range: Range::Document,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark the field as resolvable from surrounding records, up to the given
    /// structural distance.
    pub fn contextual(mut self, max_range: Range) -> Self {
        self.contextual = true;
        self.max_range = max_range;
        self
    }
}

/// The type of value a field holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    Text,
    Quantity,
    /// A nested record of the named model.
    Model(String),
}

/// A measured value: the raw string as written, the parsed numeric form
/// (one value, or two for a range), an optional error term and unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub raw: String,
    pub values: Vec<f64>,
    pub error: Option<f64>,
    pub unit: Option<String>,
}

/// A bound field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Quantity(Quantity),
    Nested(Box<Record>),
}

/// One extracted fact.
///
/// Produced by a parser's interpretation function; owned by exactly one
/// structural unit once attached to a document. Unresolved fields are simply
/// absent from the field map.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    model: Arc<ModelDescriptor>,
    fields: BTreeMap<String, FieldValue>,
    owner: Option<UnitId>,
}

impl Record {
    pub fn new(model: Arc<ModelDescriptor>) -> Self {
        Record {
            model,
            fields: BTreeMap::new(),
            owner: None,
        }
    }

    pub fn model(&self) -> &ModelDescriptor {
        &self.model
    }

    /// The structural unit this record was extracted from, once attached.
    pub fn owner(&self) -> Option<UnitId> {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, unit: UnitId) {
        self.owner = Some(unit);
    }

    /// Bind a field value. Unknown field names are a programming error:
    /// loud in development, reported and skipped in release.
    pub fn set(&mut self, name: &str, value: FieldValue) -> &mut Self {
        if self.model.field(name).is_none() {
            debug_assert!(false, "unknown field `{}` on model `{}`", name, self.model.name);
            tracing::warn!(model = %self.model.name, field = name, "ignoring unknown field");
            return self;
        }
        self.fields.insert(name.to_string(), value);
        self
    }

    pub fn set_text(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.set(name, FieldValue::Text(value.into()))
    }

    pub fn set_quantity(&mut self, name: &str, value: Quantity) -> &mut Self {
        self.set(name, FieldValue::Quantity(value))
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Whether every required field is bound.
    pub fn required_fulfilled(&self) -> bool {
        self.model
            .fields
            .iter()
            .filter(|field| field.required)
            .all(|field| self.is_bound(&field.name))
    }

    /// Contextual model-typed fields still awaiting a binding, in
    /// declaration order.
    pub fn unresolved_contextual(&self) -> Vec<&FieldDescriptor> {
        self.model
            .fields
            .iter()
            .filter(|field| {
                field.contextual
                    && matches!(field.kind, FieldKind::Model(_))
                    && !self.is_bound(&field.name)
            })
            .collect()
    }

    /// Bind a nested record into a contextual field. Used by the merging
    /// engine; never replaces an existing binding.
    pub(crate) fn bind_nested(&mut self, name: &str, candidate: Record) {
        debug_assert!(!self.is_bound(name), "rebinding field `{}`", name);
        self.fields
            .insert(name.to_string(), FieldValue::Nested(Box::new(candidate)));
    }

    /// Project the record into a nested key/value structure.
    ///
    /// Unresolved fields are omitted. Quantities retain the raw string, the
    /// parsed numeric form and the unit when present.
    pub fn serialize(&self) -> Value {
        let mut fields = serde_json::Map::new();
        for (name, value) in &self.fields {
            fields.insert(name.clone(), serialize_value(value));
        }
        let mut root = serde_json::Map::new();
        root.insert(self.model.name.clone(), Value::Object(fields));
        Value::Object(root)
    }
}

fn serialize_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Text(text) => Value::String(text.clone()),
        FieldValue::Quantity(quantity) => {
            let mut object = serde_json::Map::new();
            object.insert("raw".to_string(), Value::String(quantity.raw.clone()));
            object.insert("values".to_string(), json!(quantity.values));
            if let Some(error) = quantity.error {
                object.insert("error".to_string(), json!(error));
            }
            if let Some(unit) = &quantity.unit {
                object.insert("units".to_string(), Value::String(unit.clone()));
            }
            Value::Object(object)
        }
        FieldValue::Nested(record) => record.serialize(),
    }
}
