//! Schema registration.
//!
//! The builder is the single owner of the lookup tables for the duration of
//! one build pass: the front end feeds it declared elements in any order,
//! collisions fold into ambiguous bindings, and `finish` resolves every
//! deferred reference and freezes the result into a read-only [`Model`].

use crate::element::{
    ComplexType, Element, EntityContainer, EntityType, EnumType, Operation, SchemaElement,
    SchemaKind, Term,
};
use crate::model::Model;
use crate::name::{NameLookup, QualifiedName};
use crate::resolve::Resolver;
use crate::table::Table;
use std::sync::Arc;
use tracing::debug;

/// Whether a bare-name collision between different containers is reported as
/// an ambiguity or silently resolved to the first registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BareContainerAmbiguity {
    #[default]
    Report,
    Tolerate,
}

#[derive(Debug, Default)]
pub struct ModelBuilder {
    lookup: NameLookup,
    bare_containers: BareContainerAmbiguity,
    entity_types: Table<EntityType>,
    complex_types: Table<ComplexType>,
    enum_types: Table<EnumType>,
    terms: Table<Term>,
    operations: Table<Operation>,
    containers: Table<EntityContainer>,
    referenced: Vec<Arc<Model>>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lookup(mut self, lookup: NameLookup) -> Self {
        self.lookup = lookup;
        self
    }

    pub fn with_bare_container_policy(mut self, policy: BareContainerAmbiguity) -> Self {
        self.bare_containers = policy;
        self
    }

    /// Attach an already built model; lookups fall through to it when a name
    /// is absent locally. Referenced models are read-only from this side.
    /// Models only exist frozen, so attaching a still-building model is
    /// unrepresentable.
    pub fn add_referenced_model(&mut self, model: Arc<Model>) -> &mut Self {
        self.referenced.push(model);
        self
    }

    /// Register one declared-element record. Collisions are steady-state
    /// behavior, never an error return.
    ///
    /// # Panics
    ///
    /// If the element reports the `None` sentinel kind, which only a broken
    /// front end can produce.
    pub fn declare(&mut self, element: Element) -> &mut Self {
        assert_ne!(
            element.kind(),
            SchemaKind::None,
            "cannot register '{}': element has no schema kind",
            element.name()
        );
        match element {
            Element::EntityType(e) => self.declare_entity_type(e),
            Element::ComplexType(e) => self.declare_complex_type(e),
            Element::EnumType(e) => self.declare_enum_type(e),
            Element::Term(e) => self.declare_term(e),
            Element::Operation(e) => self.declare_operation(e),
            Element::EntityContainer(e) => self.declare_container(e),
        }
    }

    pub fn declare_entity_type(&mut self, ty: EntityType) -> &mut Self {
        if self.entity_types.register(ty, true) {
            debug!(kind = %SchemaKind::EntityType, "registration collided");
        }
        self
    }

    pub fn declare_complex_type(&mut self, ty: ComplexType) -> &mut Self {
        if self.complex_types.register(ty, true) {
            debug!(kind = %SchemaKind::ComplexType, "registration collided");
        }
        self
    }

    pub fn declare_enum_type(&mut self, ty: EnumType) -> &mut Self {
        if self.enum_types.register(ty, true) {
            debug!(kind = %SchemaKind::EnumType, "registration collided");
        }
        self
    }

    pub fn declare_term(&mut self, term: Term) -> &mut Self {
        if self.terms.register(term, true) {
            debug!(kind = %SchemaKind::Term, "registration collided");
        }
        self
    }

    pub fn declare_operation(&mut self, operation: Operation) -> &mut Self {
        if self.operations.register(operation, true) {
            debug!(kind = %SchemaKind::Operation, "registration collided");
        }
        self
    }

    /// Containers register twice: under the fully qualified name and under
    /// the bare name, for compatibility with models that address containers
    /// without a namespace. Both registrations detect ambiguity
    /// independently; the bare one is subject to the
    /// [`BareContainerAmbiguity`] policy.
    pub fn declare_container(&mut self, container: EntityContainer) -> &mut Self {
        // An already-bare name has only one spelling; registering it twice
        // would collide the container with itself.
        if container.name.is_bare() {
            if self.containers.register(container, true) {
                debug!(kind = %SchemaKind::EntityContainer, "registration collided");
            }
            return self;
        }
        let bare = EntityContainer {
            name: QualifiedName::bare(container.name.name()),
            ..container.clone()
        };
        if self.containers.register(container, true) {
            debug!(kind = %SchemaKind::EntityContainer, "registration collided");
        }
        match self.bare_containers {
            BareContainerAmbiguity::Report => {
                self.containers.register(bare, true);
            }
            BareContainerAmbiguity::Tolerate => {
                self.containers.register_first_wins(bare);
            }
        }
        self
    }

    /// Resolve every deferred reference and freeze. The returned model is
    /// immutable and safe for unrestricted concurrent reads.
    pub fn finish(self) -> Model {
        let mut model = Model {
            entity_types: self.entity_types,
            complex_types: self.complex_types,
            enum_types: self.enum_types,
            terms: self.terms,
            operations: self.operations,
            containers: self.containers,
            referenced: self.referenced,
            lookup: self.lookup,
        };
        Resolver::new().run(&mut model);
        model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::Binding;
    use crate::element::{SetTarget, StructuralProperty};
    use crate::poison::PoisonReason;
    use crate::types::{PrimitiveKind, TypeRef, TypeTarget};

    fn qn(ns: &str, name: &str) -> QualifiedName {
        QualifiedName::new(ns, name)
    }

    #[test]
    fn test_forward_reference_resolves() {
        let mut builder = ModelBuilder::new();
        let mut person = EntityType::new(qn("NS", "Person"));
        person.base = Some(TypeRef::new(qn("NS", "Base"), true));
        builder.declare_entity_type(person);
        builder.declare_entity_type(EntityType::new(qn("NS", "Base")));

        let model = builder.finish();
        let person = model.find_entity_type(&qn("NS", "Person")).unwrap();
        let base = person.base().unwrap();
        assert_eq!(*base.target(), TypeTarget::Declared(SchemaKind::EntityType));
    }

    #[test]
    fn test_unresolved_reference_is_poisoned_not_fatal() {
        let mut builder = ModelBuilder::new();
        let mut person = EntityType::new(qn("NS", "Person"));
        person.properties.push(StructuralProperty::new(
            "Address",
            TypeRef::new(qn("NS", "Address"), true),
        ));
        builder.declare_entity_type(person);

        let model = builder.finish();
        let person = model.find_entity_type(&qn("NS", "Person")).unwrap();
        let edge = &person.properties()[0].type_ref;
        assert!(edge.is_bad());
        assert!(!edge.errors().is_empty());
    }

    #[test]
    fn test_self_referential_base_is_cyclic() {
        let mut builder = ModelBuilder::new();
        let mut ouroboros = EntityType::new(qn("NS", "Ouroboros"));
        ouroboros.base = Some(TypeRef::new(qn("NS", "Ouroboros"), true));
        builder.declare_entity_type(ouroboros);

        let model = builder.finish();
        let ty = model.find_entity_type(&qn("NS", "Ouroboros")).unwrap();
        let TypeTarget::Poisoned(poison) = ty.base().unwrap().target() else {
            panic!("expected a poisoned base edge");
        };
        assert_eq!(poison.reason, PoisonReason::Cyclic);
    }

    #[test]
    fn test_container_registers_under_both_spellings() {
        let mut builder = ModelBuilder::new();
        builder.declare_container(EntityContainer::new(qn("NS", "Default")));
        let model = builder.finish();

        assert!(model.find_container(&qn("NS", "Default")).is_some());
        assert!(model.find_container(&QualifiedName::bare("Default")).is_some());
    }

    #[test]
    fn test_bare_named_container_registers_once() {
        let mut builder = ModelBuilder::new();
        builder.declare_container(EntityContainer::new(QualifiedName::bare("Default")));
        let model = builder.finish();

        let bare = model.find_container(&QualifiedName::bare("Default")).unwrap();
        assert!(!bare.is_bad());
        assert!(model.errors().is_empty());
    }

    #[test]
    fn test_bare_named_container_reports_member_errors() {
        use crate::element::{ContainerMember, OperationImport};

        let mut builder = ModelBuilder::new();
        let mut container = EntityContainer::new(QualifiedName::bare("Default"));
        container
            .members
            .push(ContainerMember::OperationImport(OperationImport::new(
                "Reset",
                qn("NS", "Reset"),
                false,
            )));
        builder.declare_container(container);
        let model = builder.finish();

        // No qualified twin exists, so the bare entry is the one that reports.
        assert_eq!(model.errors().len(), 1);
    }

    #[test]
    fn test_bare_container_policy() {
        // Report: the bare entries become ambiguous.
        let mut builder = ModelBuilder::new();
        builder.declare_container(EntityContainer::new(qn("First", "Default")));
        builder.declare_container(EntityContainer::new(qn("Second", "Default")));
        let model = builder.finish();
        let bare = model.find_container(&QualifiedName::bare("Default")).unwrap();
        assert!(bare.is_bad());
        // The qualified entries stay unambiguous.
        assert!(!model.find_container(&qn("First", "Default")).unwrap().is_bad());

        // Tolerate: first registration wins silently.
        let mut builder = ModelBuilder::new()
            .with_bare_container_policy(BareContainerAmbiguity::Tolerate);
        builder.declare_container(EntityContainer::new(qn("First", "Default")));
        builder.declare_container(EntityContainer::new(qn("Second", "Default")));
        let model = builder.finish();
        let bare = model.find_container(&QualifiedName::bare("Default")).unwrap();
        assert!(!bare.is_bad());
        assert_eq!(bare.as_real().unwrap().name, QualifiedName::bare("Default"));
        assert!(model.errors().is_empty());
    }

    #[test]
    fn test_entity_set_target_across_containers() {
        use crate::element::{ContainerMember, EntitySet, TargetPath};

        let people_type = qn("NS", "Person");
        let mut builder = ModelBuilder::new();
        builder.declare_entity_type(EntityType::new(people_type.clone()));

        let mut first = EntityContainer::new(qn("NS", "First"));
        let mut people = EntitySet::new("People", TypeRef::new(people_type.clone(), false));
        people.navigation_bindings.push(crate::element::NavigationBinding::new(
            "Friends",
            TargetPath {
                container: qn("NS", "Second"),
                set: "People".to_string(),
            },
        ));
        first.members.push(ContainerMember::EntitySet(people));

        let mut second = EntityContainer::new(qn("NS", "Second"));
        second.members.push(ContainerMember::EntitySet(EntitySet::new(
            "People",
            TypeRef::new(people_type.clone(), false),
        )));

        builder.declare_container(first);
        builder.declare_container(second);
        let model = builder.finish();

        let first = model.find_container(&qn("NS", "First")).unwrap();
        let set = first.find_entity_set("People").unwrap();
        match set.navigation_bindings[0].target() {
            SetTarget::Resolved { container, set } => {
                assert_eq!(container, &qn("NS", "Second"));
                assert_eq!(set, "People");
            }
            other => panic!("expected a resolved target, got {other:?}"),
        }
    }

    #[test]
    fn test_primitive_property_type() {
        let mut builder = ModelBuilder::new();
        let mut person = EntityType::new(qn("NS", "Person"));
        person.properties.push(StructuralProperty::new(
            "Age",
            TypeRef::new(qn("Edm", "Int32"), false),
        ));
        builder.declare_entity_type(person);
        let model = builder.finish();

        let person = model.find_entity_type(&qn("NS", "Person")).unwrap();
        assert_eq!(
            *person.properties()[0].type_ref.target(),
            TypeTarget::Primitive(PrimitiveKind::Int32)
        );
    }

    #[test]
    fn test_referenced_model_fallthrough() {
        let mut core = ModelBuilder::new();
        core.declare_entity_type(EntityType::new(qn("Core", "Resource")));
        let core = Arc::new(core.finish());

        let mut builder = ModelBuilder::new();
        builder.add_referenced_model(core.clone());
        let mut doc = EntityType::new(qn("App", "Document"));
        doc.base = Some(TypeRef::new(qn("Core", "Resource"), true));
        builder.declare_entity_type(doc);
        let model = builder.finish();

        let doc = model.find_entity_type(&qn("App", "Document")).unwrap();
        assert_eq!(
            *doc.base().unwrap().target(),
            TypeTarget::Declared(SchemaKind::EntityType)
        );
        // The referenced element itself is reachable through the importer.
        assert!(model.find_entity_type(&qn("Core", "Resource")).is_some());
        // And absence everywhere still poisons.
        let mut builder = ModelBuilder::new();
        builder.add_referenced_model(core);
        let mut orphan = EntityType::new(qn("App", "Orphan"));
        orphan.base = Some(TypeRef::new(qn("Core", "Missing"), true));
        builder.declare_entity_type(orphan);
        let model = builder.finish();
        let orphan = model.find_entity_type(&qn("App", "Orphan")).unwrap();
        assert!(orphan.base().unwrap().is_bad());
    }

    #[test]
    fn test_ambiguous_candidates_keep_declaration_data() {
        let mut builder = ModelBuilder::new();
        let mut first = EntityType::new(qn("NS", "Person"));
        first.properties.push(StructuralProperty::new(
            "Name",
            TypeRef::new(qn("Edm", "String"), false),
        ));
        let second = EntityType::new(qn("NS", "Person"));
        builder.declare_entity_type(first);
        builder.declare_entity_type(second);
        let model = builder.finish();

        let binding = model.find_entity_type(&qn("NS", "Person")).unwrap();
        let Binding::Ambiguous(ambiguous) = binding else {
            panic!("expected an ambiguous binding");
        };
        assert_eq!(ambiguous.candidates().len(), 2);
        assert_eq!(ambiguous.candidates()[0].properties[0].name, "Name");
        assert!(!ambiguous.errors().is_empty());
    }
}
