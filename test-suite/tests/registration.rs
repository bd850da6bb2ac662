//! Registration-engine behavior: collisions, idempotence, container double
//! registration.

use edm_model::{
    Binding, EntityContainer, EntityType, ModelBuilder, PrimitiveKind, QualifiedName,
    SchemaElement, StructuralProperty, Term, TypeRef,
};
use test_suite::{keyed_entity, qn};

#[test]
fn test_three_way_collision_never_nests() {
    let mut builder = ModelBuilder::new();
    for tag in ["A", "B", "C"] {
        let mut ty = EntityType::new(qn("NS", "Person"));
        ty.properties.push(StructuralProperty::new(
            tag,
            TypeRef::primitive(PrimitiveKind::String, true),
        ));
        builder.declare_entity_type(ty);
    }
    let model = builder.finish();

    let binding = model.find_entity_type(&qn("NS", "Person")).unwrap();
    let Binding::Ambiguous(ambiguous) = binding else {
        panic!("expected an ambiguous binding");
    };
    let tags: Vec<_> = ambiguous
        .candidates()
        .iter()
        .map(|c| c.properties[0].name.as_str())
        .collect();
    assert_eq!(tags, vec!["A", "B", "C"]);
    assert!(!ambiguous.errors().is_empty());
}

#[test]
fn test_first_registration_wins_representative_answers() {
    let mut builder = ModelBuilder::new();
    builder.declare_entity_type(keyed_entity("NS", "Person"));
    builder.declare_entity_type(EntityType::new(qn("NS", "Person")));
    let model = builder.finish();

    let binding = model.find_entity_type(&qn("NS", "Person")).unwrap();
    // Representative identity comes from the first candidate.
    assert_eq!(binding.name(), &qn("NS", "Person"));
    let ambiguous = binding.as_ambiguous().unwrap();
    assert_eq!(ambiguous.candidates()[0].key, vec!["Id".to_string()]);
    assert_eq!(ambiguous.candidates()[0].properties.len(), 1);
    assert!(ambiguous.candidates()[1].properties.is_empty());
}

#[test]
fn test_kinds_never_collide() {
    let mut builder = ModelBuilder::new();
    builder.declare_entity_type(EntityType::new(qn("NS", "Shared")));
    builder.declare_term(Term::new(
        qn("NS", "Shared"),
        TypeRef::primitive(PrimitiveKind::String, true),
    ));
    let model = builder.finish();

    assert!(!model.find_entity_type(&qn("NS", "Shared")).unwrap().is_bad());
    assert!(!model.find_term(&qn("NS", "Shared")).unwrap().is_bad());
}

#[test]
fn test_container_bare_and_qualified_registrations_are_independent() {
    let mut builder = ModelBuilder::new();
    builder.declare_container(EntityContainer::new(qn("First", "Default")));
    builder.declare_container(EntityContainer::new(qn("Second", "Default")));
    let model = builder.finish();

    // Qualified names differ, so neither qualified entry is ambiguous.
    assert!(!model.find_container(&qn("First", "Default")).unwrap().is_bad());
    assert!(!model.find_container(&qn("Second", "Default")).unwrap().is_bad());
    // The shared bare name is.
    let bare = model
        .find_container(&QualifiedName::bare("Default"))
        .unwrap();
    assert!(bare.as_ambiguous().is_some());
}

#[test]
fn test_collision_diagnostics_surface_through_model_errors() {
    let mut builder = ModelBuilder::new();
    builder.declare_entity_type(EntityType::new(qn("NS", "Person")));
    builder.declare_entity_type(EntityType::new(qn("NS", "Person")));
    let model = builder.finish();

    let errors = model.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("NS.Person"));
}
