//! The dispatch pass.
//!
//! One walk over the model's own tables, elements in registration order,
//! rules in rule-set declaration order. The model is never mutated;
//! diagnostics are concatenated into a flat sequence with no de-duplication
//! across rules.

use crate::ruleset::RuleSet;
use edm_model::{
    Binding, ComplexType, EdmError, EntityContainer, EntityType, EnumType, Model, Operation,
    QualifiedName, SchemaElement, SchemaKind, Term,
};
use tracing::debug;

/// A borrowed element handed to rules, dispatched per kind. Rules must treat
/// any binding as potentially ambiguous; the dedicated collision rule
/// reports those, everything else short-circuits on them.
#[derive(Debug, Clone, Copy)]
pub enum ElementRef<'a> {
    EntityType(&'a Binding<EntityType>),
    ComplexType(&'a Binding<ComplexType>),
    EnumType(&'a Binding<EnumType>),
    Term(&'a Binding<Term>),
    Operation(&'a Binding<Operation>),
    Container(&'a Binding<EntityContainer>),
}

impl<'a> ElementRef<'a> {
    pub fn kind(&self) -> SchemaKind {
        match self {
            ElementRef::EntityType(_) => SchemaKind::EntityType,
            ElementRef::ComplexType(_) => SchemaKind::ComplexType,
            ElementRef::EnumType(_) => SchemaKind::EnumType,
            ElementRef::Term(_) => SchemaKind::Term,
            ElementRef::Operation(_) => SchemaKind::Operation,
            ElementRef::Container(_) => SchemaKind::EntityContainer,
        }
    }

    pub fn name(&self) -> &'a QualifiedName {
        match self {
            ElementRef::EntityType(b) => b.name(),
            ElementRef::ComplexType(b) => b.name(),
            ElementRef::EnumType(b) => b.name(),
            ElementRef::Term(b) => b.name(),
            ElementRef::Operation(b) => b.name(),
            ElementRef::Container(b) => b.name(),
        }
    }

    /// Ambiguous or poisoned rather than a plain element.
    pub fn is_bad(&self) -> bool {
        match self {
            ElementRef::EntityType(b) => b.is_bad(),
            ElementRef::ComplexType(b) => b.is_bad(),
            ElementRef::EnumType(b) => b.is_bad(),
            ElementRef::Term(b) => b.is_bad(),
            ElementRef::Operation(b) => b.is_bad(),
            ElementRef::Container(b) => b.is_bad(),
        }
    }

    /// Diagnostics already attached at registration/resolution time.
    pub fn attached_errors(&self) -> &'a [EdmError] {
        match self {
            ElementRef::EntityType(b) => b.errors(),
            ElementRef::ComplexType(b) => b.errors(),
            ElementRef::EnumType(b) => b.errors(),
            ElementRef::Term(b) => b.errors(),
            ElementRef::Operation(b) => b.errors(),
            ElementRef::Container(b) => b.errors(),
        }
    }
}

/// Apply a rule set to a built model. Walks every element of the model's
/// own tables exactly once; referenced models validate on their own.
pub fn validate(model: &Model, rule_set: &RuleSet) -> Vec<EdmError> {
    debug!(rule_set = rule_set.name(), version = ?rule_set.version(), "validation pass");
    let mut out = Vec::new();
    for binding in model.entity_types() {
        apply(model, rule_set, ElementRef::EntityType(binding), &mut out);
    }
    for binding in model.complex_types() {
        apply(model, rule_set, ElementRef::ComplexType(binding), &mut out);
    }
    for binding in model.enum_types() {
        apply(model, rule_set, ElementRef::EnumType(binding), &mut out);
    }
    for binding in model.terms() {
        apply(model, rule_set, ElementRef::Term(binding), &mut out);
    }
    for binding in model.operations() {
        apply(model, rule_set, ElementRef::Operation(binding), &mut out);
    }
    for binding in model.containers() {
        apply(model, rule_set, ElementRef::Container(binding), &mut out);
    }
    out
}

fn apply(model: &Model, rule_set: &RuleSet, element: ElementRef<'_>, out: &mut Vec<EdmError>) {
    for rule in rule_set.rules_for(element.kind()) {
        (rule.check)(model, element, out);
    }
}
