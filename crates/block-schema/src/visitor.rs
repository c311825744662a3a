// crates/block-schema/src/visitor.rs
// ============================================================================
// Module: Field Visitors
// Description: Side-channel callbacks invoked while completing a configuration.
// Purpose: Let tooling observe resolved values without influencing resolution.
// Dependencies: crate::{definition, field_type}, serde, serde_json
// ============================================================================

//! ## Overview
//! Completion calls a [`FieldVisitor`] once per resolved leaf field and once
//! per group field, with the path from the configuration root. Visitors only
//! observe; resolution never reads anything back from them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::definition::FieldDefinition;
use crate::field_type::FieldType;

// ============================================================================
// SECTION: Field Path
// ============================================================================

/// One step from the configuration root to a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Field id within the current level.
    Field(String),
    /// Entry index within a group.
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(field: &str) -> Self {
        Self::Field(field.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Ordered field ids and group indices leading to a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// Returns the root path.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns this path extended by a field id.
    #[must_use]
    pub fn field(&self, field: &str) -> Self {
        self.child(PathSegment::Field(field.to_string()))
    }

    /// Returns this path extended by a group index.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        self.child(PathSegment::Index(index))
    }

    /// Returns the segments.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Returns this path extended by one segment.
    fn child(&self, segment: PathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend(self.0.iter().cloned());
        segments.push(segment);
        Self(segments)
    }
}

impl<S: Into<PathSegment>> FromIterator<S> for FieldPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Field(field) if position == 0 => f.write_str(field)?,
                PathSegment::Field(field) => write!(f, ".{field}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Visitor Trait
// ============================================================================

/// Observer of resolved field values during completion.
pub trait FieldVisitor {
    /// Called with a field's definition, its resolved value, and its path.
    fn visit_field(&mut self, definition: &FieldDefinition, value: &Value, path: &FieldPath);
}

impl<F> FieldVisitor for F
where
    F: FnMut(&FieldDefinition, &Value, &FieldPath),
{
    fn visit_field(&mut self, definition: &FieldDefinition, value: &Value, path: &FieldPath) {
        self(definition, value, path);
    }
}

/// Visitor that ignores every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopVisitor;

impl FieldVisitor for NoopVisitor {
    fn visit_field(&mut self, _definition: &FieldDefinition, _value: &Value, _path: &FieldPath) {}
}

// ============================================================================
// SECTION: Collecting Visitor
// ============================================================================

/// One recorded visitor call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldVisit {
    /// Field id.
    pub field: String,
    /// Field type.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Resolved value.
    pub value: Value,
    /// Path from the configuration root.
    pub path: FieldPath,
}

/// Visitor that records every call in order.
#[derive(Debug, Clone, Default)]
pub struct CollectingVisitor {
    /// Recorded calls.
    visits: Vec<FieldVisit>,
}

impl CollectingVisitor {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded calls.
    #[must_use]
    pub fn visits(&self) -> &[FieldVisit] {
        &self.visits
    }

    /// Consumes the collector and returns the recorded calls.
    #[must_use]
    pub fn into_visits(self) -> Vec<FieldVisit> {
        self.visits
    }
}

impl FieldVisitor for CollectingVisitor {
    fn visit_field(&mut self, definition: &FieldDefinition, value: &Value, path: &FieldPath) {
        self.visits.push(FieldVisit {
            field: definition.field().to_string(),
            field_type: definition.field_type().clone(),
            value: value.clone(),
            path: path.clone(),
        });
    }
}
