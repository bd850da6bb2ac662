//! Shared fixtures for the integration tests.

use edm_model::{
    ContainerMember, EntityContainer, EntitySet, EntityType, ModelBuilder, NavigationBinding,
    PrimitiveKind, QualifiedName, StructuralProperty, TargetPath, TypeRef,
};

pub fn qn(ns: &str, name: &str) -> QualifiedName {
    QualifiedName::new(ns, name)
}

/// A well-formed entity type with an `Id` key.
pub fn keyed_entity(ns: &str, name: &str) -> EntityType {
    let mut ty = EntityType::new(qn(ns, name));
    ty.key.push("Id".to_string());
    ty.properties.push(StructuralProperty::new(
        "Id",
        TypeRef::primitive(PrimitiveKind::Int32, false),
    ));
    ty
}

/// A container holding one entity set whose single navigation binding for
/// `path` targets `target`.
pub fn container_with_bound_set(
    name: QualifiedName,
    set: &str,
    element_type: QualifiedName,
    path: &str,
    target: TargetPath,
) -> EntityContainer {
    let mut container = EntityContainer::new(name);
    let mut entity_set = EntitySet::new(set, TypeRef::new(element_type, false));
    entity_set
        .navigation_bindings
        .push(NavigationBinding::new(path, target));
    container.members.push(ContainerMember::EntitySet(entity_set));
    container
}

/// Declare the same input twice and hand both frozen models to the caller.
pub fn build_twice(declare: impl Fn(&mut ModelBuilder)) -> (edm_model::Model, edm_model::Model) {
    let mut first = ModelBuilder::new();
    declare(&mut first);
    let mut second = ModelBuilder::new();
    declare(&mut second);
    (first.finish(), second.finish())
}
