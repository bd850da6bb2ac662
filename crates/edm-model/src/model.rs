//! The frozen model.
//!
//! A `Model` only ever exists fully built: the builder resolves every
//! reference edge before handing it out, and no `&mut` API exists
//! afterwards, so concurrent readers need no synchronization.

use crate::binding::Binding;
use crate::element::{
    ComplexType, ContainerMember, EntityContainer, EntityType, EnumType, Operation,
    OperationTarget, SchemaElement, SchemaKind, SetTarget, Term,
};
use crate::error::EdmError;
use crate::name::{NameLookup, QualifiedName};
use crate::poison::Poison;
use crate::table::Table;
use crate::types::{PrimitiveKind, TypeRef, TypeTarget};
use std::sync::Arc;

/// The linked, possibly partially poisoned schema graph.
#[derive(Debug, Clone)]
pub struct Model {
    pub(crate) entity_types: Table<EntityType>,
    pub(crate) complex_types: Table<ComplexType>,
    pub(crate) enum_types: Table<EnumType>,
    pub(crate) terms: Table<Term>,
    pub(crate) operations: Table<Operation>,
    pub(crate) containers: Table<EntityContainer>,
    pub(crate) referenced: Vec<Arc<Model>>,
    pub(crate) lookup: NameLookup,
}

/// A schema type found by [`Model::find_schema_type`].
#[derive(Debug, Clone, Copy)]
pub enum SchemaType<'a> {
    Entity(&'a Binding<EntityType>),
    Complex(&'a Binding<ComplexType>),
    Enum(&'a Binding<EnumType>),
}

/// What a memoized [`TypeRef`] edge points at, materialized against this
/// model.
#[derive(Debug, Clone, Copy)]
pub enum ResolvedType<'a> {
    Primitive(PrimitiveKind),
    Entity(&'a Binding<EntityType>),
    Complex(&'a Binding<ComplexType>),
    Enum(&'a Binding<EnumType>),
    Poisoned(&'a Poison),
}

impl Model {
    pub fn find_entity_type(&self, name: &QualifiedName) -> Option<&Binding<EntityType>> {
        self.entity_types
            .get_with(name, self.lookup)
            .or_else(|| self.referenced.iter().find_map(|m| m.find_entity_type(name)))
    }

    pub fn find_complex_type(&self, name: &QualifiedName) -> Option<&Binding<ComplexType>> {
        self.complex_types
            .get_with(name, self.lookup)
            .or_else(|| self.referenced.iter().find_map(|m| m.find_complex_type(name)))
    }

    pub fn find_enum_type(&self, name: &QualifiedName) -> Option<&Binding<EnumType>> {
        self.enum_types
            .get_with(name, self.lookup)
            .or_else(|| self.referenced.iter().find_map(|m| m.find_enum_type(name)))
    }

    pub fn find_term(&self, name: &QualifiedName) -> Option<&Binding<Term>> {
        self.terms
            .get_with(name, self.lookup)
            .or_else(|| self.referenced.iter().find_map(|m| m.find_term(name)))
    }

    pub fn find_operation(&self, name: &QualifiedName) -> Option<&Binding<Operation>> {
        self.operations
            .get_with(name, self.lookup)
            .or_else(|| self.referenced.iter().find_map(|m| m.find_operation(name)))
    }

    /// Containers answer to both their qualified and their bare name; both
    /// spellings are first-class table entries.
    pub fn find_container(&self, name: &QualifiedName) -> Option<&Binding<EntityContainer>> {
        self.containers
            .get_with(name, self.lookup)
            .or_else(|| self.referenced.iter().find_map(|m| m.find_container(name)))
    }

    /// Entity, complex, and enum tables probed in that order.
    pub fn find_schema_type(&self, name: &QualifiedName) -> Option<SchemaType<'_>> {
        if let Some(found) = self.find_entity_type(name) {
            return Some(SchemaType::Entity(found));
        }
        if let Some(found) = self.find_complex_type(name) {
            return Some(SchemaType::Complex(found));
        }
        self.find_enum_type(name).map(SchemaType::Enum)
    }

    /// Follow a memoized edge to its target in this model. `None` only for
    /// deferred edges, which a frozen model exposes solely inside ambiguous
    /// candidates.
    pub fn resolve_type<'a>(&'a self, type_ref: &'a TypeRef) -> Option<ResolvedType<'a>> {
        match type_ref.target() {
            TypeTarget::Deferred => None,
            TypeTarget::Primitive(kind) => Some(ResolvedType::Primitive(*kind)),
            TypeTarget::Poisoned(poison) => Some(ResolvedType::Poisoned(poison)),
            TypeTarget::Declared(kind) => match kind {
                SchemaKind::EntityType => {
                    self.find_entity_type(&type_ref.name).map(ResolvedType::Entity)
                }
                SchemaKind::ComplexType => {
                    self.find_complex_type(&type_ref.name).map(ResolvedType::Complex)
                }
                SchemaKind::EnumType => self.find_enum_type(&type_ref.name).map(ResolvedType::Enum),
                _ => None,
            },
        }
    }

    pub fn entity_types(&self) -> impl Iterator<Item = &Binding<EntityType>> {
        self.entity_types.iter()
    }

    pub fn complex_types(&self) -> impl Iterator<Item = &Binding<ComplexType>> {
        self.complex_types.iter()
    }

    pub fn enum_types(&self) -> impl Iterator<Item = &Binding<EnumType>> {
        self.enum_types.iter()
    }

    pub fn terms(&self) -> impl Iterator<Item = &Binding<Term>> {
        self.terms.iter()
    }

    pub fn operations(&self) -> impl Iterator<Item = &Binding<Operation>> {
        self.operations.iter()
    }

    pub fn containers(&self) -> impl Iterator<Item = &Binding<EntityContainer>> {
        self.containers.iter()
    }

    pub fn referenced_models(&self) -> &[Arc<Model>] {
        &self.referenced
    }

    pub fn lookup_policy(&self) -> NameLookup {
        self.lookup
    }

    /// Whether the containers table holds a qualified entry sharing this
    /// bare name's local name.
    pub fn has_qualified_twin(&self, bare: &QualifiedName) -> bool {
        self.containers
            .iter()
            .any(|b| !b.name().is_bare() && b.name().name() == bare.name())
    }

    /// Every diagnostic attached to this model's own tables, in table order
    /// (entity, complex, enum, term, operation, container) and registration
    /// order within each table. Identical inputs yield identical sequences.
    pub fn errors(&self) -> Vec<&EdmError> {
        let mut out = Vec::new();
        for binding in self.entity_types.iter() {
            out.extend(binding.errors());
            if let Some(ty) = binding.as_real() {
                if let Some(base) = &ty.base {
                    out.extend(base.errors());
                }
                for property in &ty.properties {
                    out.extend(property.type_ref.errors());
                }
                for navigation in &ty.navigation {
                    out.extend(navigation.target_type.errors());
                }
            }
        }
        for binding in self.complex_types.iter() {
            out.extend(binding.errors());
            if let Some(ty) = binding.as_real() {
                if let Some(base) = &ty.base {
                    out.extend(base.errors());
                }
                for property in &ty.properties {
                    out.extend(property.type_ref.errors());
                }
            }
        }
        for binding in self.enum_types.iter() {
            out.extend(binding.errors());
        }
        for binding in self.terms.iter() {
            out.extend(binding.errors());
            if let Some(term) = binding.as_real() {
                out.extend(term.value_type.errors());
            }
        }
        for binding in self.operations.iter() {
            out.extend(binding.errors());
            if let Some(operation) = binding.as_real() {
                for parameter in &operation.parameters {
                    out.extend(parameter.type_ref.errors());
                }
                if let Some(return_type) = &operation.return_type {
                    out.extend(return_type.errors());
                }
            }
        }
        for binding in self.containers.iter() {
            out.extend(binding.errors());
            let Some(container) = binding.as_real() else {
                continue;
            };
            // A bare-name entry with a qualified twin is a second spelling of
            // the same container; its member edges would repeat the twin's.
            // A container declared bare has no twin and reports here.
            if container.name.is_bare() && self.has_qualified_twin(&container.name) {
                continue;
            }
            for member in &container.members {
                match member {
                    ContainerMember::EntitySet(set) => {
                        out.extend(set.element_type.errors());
                        for nav in &set.navigation_bindings {
                            if let SetTarget::Poisoned(poison) = nav.target() {
                                out.extend(poison.errors.iter());
                            }
                        }
                    }
                    ContainerMember::Singleton(singleton) => {
                        out.extend(singleton.element_type.errors());
                    }
                    ContainerMember::OperationImport(import) => {
                        if let OperationTarget::Poisoned(poison) = import.target() {
                            out.extend(poison.errors.iter());
                        }
                    }
                }
            }
        }
        out
    }
}
