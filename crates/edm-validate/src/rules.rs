//! Built-in rules.
//!
//! Every rule is a pure `fn(&Model, ElementRef, &mut Vec<EdmError>)`. Rules
//! other than the collision reporter short-circuit on ambiguous bindings so
//! a broken element is reported once, not once per rule.

use crate::engine::ElementRef;
use crate::ruleset::Rule;
use ahash::AHashSet;
use edm_model::{
    ContainerMember, EdmError, EntityContainer, EntityType, ErrorCode, Model, OperationTarget,
    SchemaKind, SetTarget, StructuralProperty, TypeRef, TypeTarget,
};

/// The 4.0 rule list, in dispatch order.
pub(crate) fn v4_0() -> Vec<Rule> {
    let mut rules = ambiguity_rules();
    rules.extend([
        Rule::new("UnresolvedReferenceReported", SchemaKind::EntityType, unresolved_entity_edges),
        Rule::new("UnresolvedReferenceReported", SchemaKind::ComplexType, unresolved_complex_edges),
        Rule::new("UnresolvedReferenceReported", SchemaKind::Term, unresolved_term_edges),
        Rule::new("UnresolvedReferenceReported", SchemaKind::Operation, unresolved_operation_edges),
        Rule::new("EntityTypeKeyRequired", SchemaKind::EntityType, entity_key_required_strict),
        Rule::new("EntityTypeKeyPropertiesValid", SchemaKind::EntityType, entity_key_properties_valid),
        Rule::new("PropertyNamesUnique", SchemaKind::EntityType, entity_property_names_unique),
        Rule::new("PropertyNamesUnique", SchemaKind::ComplexType, complex_property_names_unique),
        Rule::new("BaseTypeKindAgrees", SchemaKind::EntityType, entity_base_kind_agrees),
        Rule::new("BaseTypeKindAgrees", SchemaKind::ComplexType, complex_base_kind_agrees),
        Rule::new("EnumMemberNamesUnique", SchemaKind::EnumType, enum_member_names_unique),
        Rule::new("ContainerMemberNamesUnique", SchemaKind::EntityContainer, container_member_names_unique),
        Rule::new("OperationImportTargetResolves", SchemaKind::EntityContainer, operation_import_target_resolves),
        Rule::new("NavigationBindingTargetResolves", SchemaKind::EntityContainer, navigation_binding_target_resolves),
    ]);
    rules
}

/// The 4.01 list: identical except the key-presence rule exempts abstract
/// entity types; the strict rule is excluded, not disabled.
pub(crate) fn v4_01() -> Vec<Rule> {
    v4_0()
        .into_iter()
        .map(|rule| {
            if rule.name == "EntityTypeKeyRequired" {
                Rule::new(
                    "EntityTypeKeyRequiredUnlessAbstract",
                    SchemaKind::EntityType,
                    entity_key_required,
                )
            } else {
                rule
            }
        })
        .collect()
}

fn ambiguity_rules() -> Vec<Rule> {
    [
        SchemaKind::EntityType,
        SchemaKind::ComplexType,
        SchemaKind::EnumType,
        SchemaKind::Term,
        SchemaKind::Operation,
        SchemaKind::EntityContainer,
    ]
    .into_iter()
    .map(|kind| Rule::new("AmbiguousBindingReported", kind, ambiguous_binding_reported))
    .collect()
}

/// Surface the diagnostics a collision attached at registration time.
fn ambiguous_binding_reported(_model: &Model, element: ElementRef<'_>, out: &mut Vec<EdmError>) {
    if element.is_bad() {
        out.extend(element.attached_errors().iter().cloned());
    }
}

fn unresolved_entity_edges(_model: &Model, element: ElementRef<'_>, out: &mut Vec<EdmError>) {
    let ElementRef::EntityType(binding) = element else { return };
    if binding.is_bad() {
        return;
    }
    if let Some(base) = binding.base() {
        out.extend(base.errors().iter().cloned());
    }
    for property in binding.properties() {
        out.extend(property.type_ref.errors().iter().cloned());
    }
    for navigation in binding.navigation() {
        out.extend(navigation.target_type.errors().iter().cloned());
    }
}

fn unresolved_complex_edges(_model: &Model, element: ElementRef<'_>, out: &mut Vec<EdmError>) {
    let ElementRef::ComplexType(binding) = element else { return };
    if binding.is_bad() {
        return;
    }
    if let Some(base) = binding.base() {
        out.extend(base.errors().iter().cloned());
    }
    for property in binding.properties() {
        out.extend(property.type_ref.errors().iter().cloned());
    }
}

fn unresolved_term_edges(_model: &Model, element: ElementRef<'_>, out: &mut Vec<EdmError>) {
    let ElementRef::Term(binding) = element else { return };
    if let Some(value_type) = binding.value_type() {
        out.extend(value_type.errors().iter().cloned());
    }
}

fn unresolved_operation_edges(_model: &Model, element: ElementRef<'_>, out: &mut Vec<EdmError>) {
    let ElementRef::Operation(binding) = element else { return };
    if binding.is_bad() {
        return;
    }
    for parameter in binding.parameters() {
        out.extend(parameter.type_ref.errors().iter().cloned());
    }
    if let Some(return_type) = binding.return_type() {
        out.extend(return_type.errors().iter().cloned());
    }
}

fn entity_key_required_strict(model: &Model, element: ElementRef<'_>, out: &mut Vec<EdmError>) {
    key_presence(model, element, out, false)
}

fn entity_key_required(model: &Model, element: ElementRef<'_>, out: &mut Vec<EdmError>) {
    key_presence(model, element, out, true)
}

fn key_presence(
    _model: &Model,
    element: ElementRef<'_>,
    out: &mut Vec<EdmError>,
    exempt_abstract: bool,
) {
    let ElementRef::EntityType(binding) = element else { return };
    let Some(ty) = binding.as_real() else { return };
    if ty.base.is_some() || !ty.key.is_empty() {
        return;
    }
    if exempt_abstract && ty.is_abstract {
        return;
    }
    out.push(EdmError::new(
        ErrorCode::KeyMissingOnEntityType,
        format!("the entity type '{}' has no key defined", ty.name),
    ));
}

fn entity_key_properties_valid(model: &Model, element: ElementRef<'_>, out: &mut Vec<EdmError>) {
    let ElementRef::EntityType(binding) = element else { return };
    let Some(ty) = binding.as_real() else { return };
    for key_name in &ty.key {
        match find_property(model, ty, key_name) {
            None => out.push(EdmError::new(
                ErrorCode::InvalidKeyPropertyRef,
                format!(
                    "the key of entity type '{}' references undeclared property '{key_name}'",
                    ty.name
                ),
            )),
            Some(property) if property.type_ref.nullable => out.push(EdmError::new(
                ErrorCode::KeyPropertyMustBeNonNullable,
                format!(
                    "the key property '{key_name}' of entity type '{}' must be non-nullable",
                    ty.name
                ),
            )),
            Some(_) => {}
        }
    }
}

/// A structural property declared on `ty` or inherited through its base
/// chain. Cyclic chains were already broken into poisoned edges by the
/// resolver, so the walk terminates.
fn find_property<'a>(
    model: &'a Model,
    ty: &'a EntityType,
    name: &str,
) -> Option<&'a StructuralProperty> {
    let mut current = Some(ty);
    while let Some(ty) = current {
        if let Some(found) = ty.find_property(name) {
            return Some(found);
        }
        current = ty.base.as_ref().and_then(|base| match base.target() {
            TypeTarget::Declared(SchemaKind::EntityType) => {
                model.find_entity_type(&base.name).and_then(|b| b.as_real())
            }
            _ => None,
        });
    }
    None
}

fn entity_property_names_unique(_model: &Model, element: ElementRef<'_>, out: &mut Vec<EdmError>) {
    let ElementRef::EntityType(binding) = element else { return };
    let Some(ty) = binding.as_real() else { return };
    let structural = ty.properties.iter().map(|p| p.name.as_str());
    let navigation = ty.navigation.iter().map(|n| n.name.as_str());
    duplicate_names(structural.chain(navigation), &ty.name.to_string(), out);
}

fn complex_property_names_unique(_model: &Model, element: ElementRef<'_>, out: &mut Vec<EdmError>) {
    let ElementRef::ComplexType(binding) = element else { return };
    let Some(ty) = binding.as_real() else { return };
    duplicate_names(
        ty.properties.iter().map(|p| p.name.as_str()),
        &ty.name.to_string(),
        out,
    );
}

fn duplicate_names<'a>(
    names: impl Iterator<Item = &'a str>,
    owner: &str,
    out: &mut Vec<EdmError>,
) {
    let mut seen = AHashSet::new();
    for name in names {
        if !seen.insert(name) {
            out.push(EdmError::new(
                ErrorCode::DuplicatePropertyName,
                format!("'{owner}' declares the property name '{name}' more than once"),
            ));
        }
    }
}

fn entity_base_kind_agrees(_model: &Model, element: ElementRef<'_>, out: &mut Vec<EdmError>) {
    let ElementRef::EntityType(binding) = element else { return };
    let Some(ty) = binding.as_real() else { return };
    base_kind_agrees(ty.base.as_ref(), SchemaKind::EntityType, &ty.name.to_string(), out);
}

fn complex_base_kind_agrees(_model: &Model, element: ElementRef<'_>, out: &mut Vec<EdmError>) {
    let ElementRef::ComplexType(binding) = element else { return };
    let Some(ty) = binding.as_real() else { return };
    base_kind_agrees(ty.base.as_ref(), SchemaKind::ComplexType, &ty.name.to_string(), out);
}

fn base_kind_agrees(
    base: Option<&TypeRef>,
    expected: SchemaKind,
    owner: &str,
    out: &mut Vec<EdmError>,
) {
    let Some(base) = base else { return };
    if let TypeTarget::Declared(kind) = base.target()
        && *kind != expected
    {
        out.push(EdmError::new(
            ErrorCode::InvalidBaseTypeKind,
            format!(
                "'{owner}' derives from '{}', which is a {kind}, not a {expected}",
                base.name
            ),
        ));
    }
}

fn enum_member_names_unique(_model: &Model, element: ElementRef<'_>, out: &mut Vec<EdmError>) {
    let ElementRef::EnumType(binding) = element else { return };
    let Some(ty) = binding.as_real() else { return };
    let mut seen = AHashSet::new();
    for member in &ty.members {
        if !seen.insert(member.name.as_str()) {
            out.push(EdmError::new(
                ErrorCode::DuplicateEnumMemberName,
                format!(
                    "the enum type '{}' declares the member '{}' more than once",
                    ty.name, member.name
                ),
            ));
        }
    }
}

/// Container rules run on one spelling per container: the qualified entry,
/// or the bare entry when no qualified twin exists (a container declared
/// with a bare name has only that spelling).
fn primary_container<'a>(model: &Model, element: ElementRef<'a>) -> Option<&'a EntityContainer> {
    let ElementRef::Container(binding) = element else { return None };
    let container = binding.as_real()?;
    if container.name.is_bare() && model.has_qualified_twin(&container.name) {
        return None;
    }
    Some(container)
}

fn container_member_names_unique(model: &Model, element: ElementRef<'_>, out: &mut Vec<EdmError>) {
    let Some(container) = primary_container(model, element) else { return };
    let mut seen = AHashSet::new();
    for member in &container.members {
        if !seen.insert(member.name()) {
            out.push(EdmError::new(
                ErrorCode::DuplicateContainerMemberName,
                format!(
                    "the container '{}' declares the member '{}' more than once",
                    container.name,
                    member.name()
                ),
            ));
        }
    }
}

fn operation_import_target_resolves(
    model: &Model,
    element: ElementRef<'_>,
    out: &mut Vec<EdmError>,
) {
    let Some(container) = primary_container(model, element) else { return };
    for import in container.operation_imports() {
        if let OperationTarget::Poisoned(_) = import.target() {
            out.push(EdmError::new(
                ErrorCode::OperationImportUnresolvedOperation,
                format!(
                    "the import '{}' of container '{}' references unknown operation '{}'",
                    import.name, container.name, import.operation
                ),
            ));
        }
    }
}

fn navigation_binding_target_resolves(
    model: &Model,
    element: ElementRef<'_>,
    out: &mut Vec<EdmError>,
) {
    let Some(container) = primary_container(model, element) else { return };
    for member in &container.members {
        let ContainerMember::EntitySet(set) = member else { continue };
        out.extend(set.element_type.errors().iter().cloned());
        for binding in &set.navigation_bindings {
            if let SetTarget::Poisoned(poison) = binding.target() {
                out.push(EdmError::new(
                    ErrorCode::NavigationBindingUnresolvedTarget,
                    format!(
                        "the binding for '{}' on entity set '{}.{}' does not reach a usable target: {}",
                        binding.path, container.name, set.name, poison.errors[0].message
                    ),
                ));
            }
        }
    }
}
