//! Term context: which record fields reference other entities.
//!
//! The portal publishes a JSON-LD `@context` map. A field whose term
//! definition is `{"@type": "@id", ...}` holds identifiers of other records;
//! every other field holds literals.

use std::collections::HashMap;

use serde_json::{Map, Value};

/// Classification of a single term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
    Link,
    Literal,
}

/// Field-classification metadata for one run. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermContext {
    terms: HashMap<String, TermKind>,
}

impl TermContext {
    /// An empty context: every field is a literal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the members of a JSON-LD `@context` object.
    pub fn from_context_map(context: &Map<String, Value>) -> Self {
        let terms = context
            .iter()
            .map(|(field, definition)| {
                let kind = match definition.get("@type").and_then(Value::as_str) {
                    Some("@id") => TermKind::Link,
                    _ => TermKind::Literal,
                };
                (field.clone(), kind)
            })
            .collect();
        Self { terms }
    }

    /// A context where exactly the given fields are links.
    pub fn with_links<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terms: fields
                .into_iter()
                .map(|f| (f.into(), TermKind::Link))
                .collect(),
        }
    }

    /// Classification of a field, if the context knows it.
    pub fn kind(&self, field: &str) -> Option<TermKind> {
        self.terms.get(field).copied()
    }

    /// Whether the field's values denote references to other entities.
    /// Unknown fields are literals.
    pub fn is_link(&self, field: &str) -> bool {
        match self.kind(field) {
            Some(kind) => kind == TermKind::Link,
            None => {
                tracing::debug!(field, "Field not found in term context, treating as literal");
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
