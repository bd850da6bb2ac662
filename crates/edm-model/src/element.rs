//! Declared schema elements.
//!
//! These are the records the front end hands to the registration engine:
//! plain data with outgoing references expressed as qualified names. All
//! reference edges carry a memoized resolution slot filled in during the
//! single build pass.

use crate::name::QualifiedName;
use crate::poison::Poison;
use crate::types::{PrimitiveKind, TypeRef};
use serde::Serialize;
use std::fmt::{self, Display};

/// Element kinds; one lookup table exists per kind, so kinds never collide
/// with each other.
///
/// `None` is a sentinel for "no kind"; handing the registration engine an
/// element that reports it is a front-end programming error and panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SchemaKind {
    None,
    EntityType,
    ComplexType,
    EnumType,
    Term,
    Operation,
    EntityContainer,
}

impl Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SchemaKind::None => "none",
            SchemaKind::EntityType => "entity type",
            SchemaKind::ComplexType => "complex type",
            SchemaKind::EnumType => "enum type",
            SchemaKind::Term => "term",
            SchemaKind::Operation => "operation",
            SchemaKind::EntityContainer => "entity container",
        };
        write!(f, "{text}")
    }
}

/// The minimal capability contract every schema element satisfies, real or
/// placeholder.
pub trait SchemaElement {
    fn name(&self) -> &QualifiedName;
    fn kind(&self) -> SchemaKind;
}

/// A structural (non-navigation) property. Nullability rides on the type
/// reference.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuralProperty {
    pub name: String,
    pub type_ref: TypeRef,
}

impl StructuralProperty {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
        }
    }
}

/// A navigation property: a typed edge to another entity type.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationProperty {
    pub name: String,
    pub target_type: TypeRef,
    pub partner: Option<String>,
}

impl NavigationProperty {
    pub fn new(name: impl Into<String>, target_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            target_type,
            partner: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityType {
    pub name: QualifiedName,
    pub base: Option<TypeRef>,
    pub is_abstract: bool,
    pub is_open: bool,
    /// Ordered key property names; may refer to inherited properties.
    pub key: Vec<String>,
    pub properties: Vec<StructuralProperty>,
    pub navigation: Vec<NavigationProperty>,
}

impl EntityType {
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            base: None,
            is_abstract: false,
            is_open: false,
            key: Vec::new(),
            properties: Vec::new(),
            navigation: Vec::new(),
        }
    }

    pub fn find_property(&self, name: &str) -> Option<&StructuralProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}

impl SchemaElement for EntityType {
    fn name(&self) -> &QualifiedName {
        &self.name
    }

    fn kind(&self) -> SchemaKind {
        SchemaKind::EntityType
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComplexType {
    pub name: QualifiedName,
    pub base: Option<TypeRef>,
    pub is_abstract: bool,
    pub is_open: bool,
    pub properties: Vec<StructuralProperty>,
}

impl ComplexType {
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            base: None,
            is_abstract: false,
            is_open: false,
            properties: Vec::new(),
        }
    }
}

impl SchemaElement for ComplexType {
    fn name(&self) -> &QualifiedName {
        &self.name
    }

    fn kind(&self) -> SchemaKind {
        SchemaKind::ComplexType
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    pub name: QualifiedName,
    pub underlying: PrimitiveKind,
    pub is_flags: bool,
    pub members: Vec<EnumMember>,
}

impl EnumType {
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            underlying: PrimitiveKind::Int32,
            is_flags: false,
            members: Vec::new(),
        }
    }
}

impl SchemaElement for EnumType {
    fn name(&self) -> &QualifiedName {
        &self.name
    }

    fn kind(&self) -> SchemaKind {
        SchemaKind::EnumType
    }
}

/// A vocabulary term: a named, typed slot annotations can target.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub name: QualifiedName,
    pub value_type: TypeRef,
    pub applies_to: Vec<String>,
    pub default_value: Option<String>,
}

impl Term {
    pub fn new(name: QualifiedName, value_type: TypeRef) -> Self {
        Self {
            name,
            value_type,
            applies_to: Vec::new(),
            default_value: None,
        }
    }
}

impl SchemaElement for Term {
    fn name(&self) -> &QualifiedName {
        &self.name
    }

    fn kind(&self) -> SchemaKind {
        SchemaKind::Term
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub type_ref: TypeRef,
}

/// Actions and functions share one shape; `is_function` is the split.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub name: QualifiedName,
    pub is_function: bool,
    pub is_bound: bool,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeRef>,
}

impl Operation {
    pub fn action(name: QualifiedName) -> Self {
        Self {
            name,
            is_function: false,
            is_bound: false,
            parameters: Vec::new(),
            return_type: None,
        }
    }

    pub fn function(name: QualifiedName, return_type: TypeRef) -> Self {
        Self {
            name,
            is_function: true,
            is_bound: false,
            parameters: Vec::new(),
            return_type: Some(return_type),
        }
    }
}

impl SchemaElement for Operation {
    fn name(&self) -> &QualifiedName {
        &self.name
    }

    fn kind(&self) -> SchemaKind {
        SchemaKind::Operation
    }
}

/// Where a navigation binding points inside some container.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetPath {
    /// Qualified or bare container name.
    pub container: QualifiedName,
    pub set: String,
}

/// Memoized outcome of resolving a navigation binding target.
#[derive(Debug, Clone, PartialEq)]
pub enum SetTarget {
    Deferred,
    Resolved {
        container: QualifiedName,
        set: String,
    },
    Poisoned(Poison),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavigationBinding {
    /// Navigation property path on the set's element type.
    pub path: String,
    pub target_path: TargetPath,
    pub(crate) target: SetTarget,
}

impl NavigationBinding {
    pub fn new(path: impl Into<String>, target_path: TargetPath) -> Self {
        Self {
            path: path.into(),
            target_path,
            target: SetTarget::Deferred,
        }
    }

    pub fn target(&self) -> &SetTarget {
        &self.target
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntitySet {
    pub name: String,
    pub element_type: TypeRef,
    pub navigation_bindings: Vec<NavigationBinding>,
}

impl EntitySet {
    pub fn new(name: impl Into<String>, element_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            element_type,
            navigation_bindings: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Singleton {
    pub name: String,
    pub element_type: TypeRef,
}

/// Memoized outcome of resolving an operation import's operation name.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationTarget {
    Deferred,
    /// The operations table holds an entry (real or placeholder) under the
    /// import's operation name.
    Resolved,
    Poisoned(Poison),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperationImport {
    pub name: String,
    pub operation: QualifiedName,
    pub is_function: bool,
    pub(crate) target: OperationTarget,
}

impl OperationImport {
    pub fn new(name: impl Into<String>, operation: QualifiedName, is_function: bool) -> Self {
        Self {
            name: name.into(),
            operation,
            is_function,
            target: OperationTarget::Deferred,
        }
    }

    pub fn target(&self) -> &OperationTarget {
        &self.target
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContainerMember {
    EntitySet(EntitySet),
    Singleton(Singleton),
    OperationImport(OperationImport),
}

impl ContainerMember {
    pub fn name(&self) -> &str {
        match self {
            ContainerMember::EntitySet(set) => &set.name,
            ContainerMember::Singleton(singleton) => &singleton.name,
            ContainerMember::OperationImport(import) => &import.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityContainer {
    pub name: QualifiedName,
    pub members: Vec<ContainerMember>,
}

impl EntityContainer {
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            members: Vec::new(),
        }
    }

    pub fn entity_sets(&self) -> impl Iterator<Item = &EntitySet> {
        self.members.iter().filter_map(|m| match m {
            ContainerMember::EntitySet(set) => Some(set),
            _ => None,
        })
    }

    pub fn find_entity_set(&self, name: &str) -> Option<&EntitySet> {
        self.entity_sets().find(|s| s.name == name)
    }

    pub fn operation_imports(&self) -> impl Iterator<Item = &OperationImport> {
        self.members.iter().filter_map(|m| match m {
            ContainerMember::OperationImport(import) => Some(import),
            _ => None,
        })
    }
}

impl SchemaElement for EntityContainer {
    fn name(&self) -> &QualifiedName {
        &self.name
    }

    fn kind(&self) -> SchemaKind {
        SchemaKind::EntityContainer
    }
}

/// A declared-element record as emitted by the front end, in any order.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    EntityType(EntityType),
    ComplexType(ComplexType),
    EnumType(EnumType),
    Term(Term),
    Operation(Operation),
    EntityContainer(EntityContainer),
}

impl SchemaElement for Element {
    fn name(&self) -> &QualifiedName {
        match self {
            Element::EntityType(e) => e.name(),
            Element::ComplexType(e) => e.name(),
            Element::EnumType(e) => e.name(),
            Element::Term(e) => e.name(),
            Element::Operation(e) => e.name(),
            Element::EntityContainer(e) => e.name(),
        }
    }

    fn kind(&self) -> SchemaKind {
        match self {
            Element::EntityType(_) => SchemaKind::EntityType,
            Element::ComplexType(_) => SchemaKind::ComplexType,
            Element::EnumType(_) => SchemaKind::EnumType,
            Element::Term(_) => SchemaKind::Term,
            Element::Operation(_) => SchemaKind::Operation,
            Element::EntityContainer(_) => SchemaKind::EntityContainer,
        }
    }
}
