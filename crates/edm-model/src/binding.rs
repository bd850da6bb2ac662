//! Table entries: real elements, ambiguous bindings, and poison placeholders
//! behind one shape, with the neutral-default accessor logic centralized
//! here instead of repeated per kind.

use crate::ambiguous::Ambiguous;
use crate::element::{
    ComplexType, ContainerMember, EntityContainer, EntitySet, EntityType, EnumMember, EnumType,
    NavigationProperty, Operation, Parameter, SchemaElement, SchemaKind, StructuralProperty, Term,
};
use crate::error::EdmError;
use crate::name::QualifiedName;
use crate::poison::Poison;
use crate::types::TypeRef;

/// What a qualified-name lookup actually returns. Consumers must treat any
/// binding as potentially ambiguous or poisoned and must not assume
/// structural completeness.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding<T> {
    Real(T),
    Ambiguous(Ambiguous<T>),
    /// A placeholder element. Registration only ever stores `Real` and
    /// `Ambiguous` entries; reference-edge poisons live on the edge itself
    /// ([`TypeTarget::Poisoned`](crate::TypeTarget::Poisoned)). This variant
    /// is the binding-shaped spelling of a poison for transient substitution
    /// and for consumers that carry bindings of their own.
    Poison(Poison),
}

impl<T: SchemaElement> Binding<T> {
    pub fn as_real(&self) -> Option<&T> {
        match self {
            Binding::Real(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_ambiguous(&self) -> Option<&Ambiguous<T>> {
        match self {
            Binding::Ambiguous(ambiguous) => Some(ambiguous),
            _ => None,
        }
    }

    pub fn as_poison(&self) -> Option<&Poison> {
        match self {
            Binding::Poison(poison) => Some(poison),
            _ => None,
        }
    }

    /// Anything that is not a plain, uniquely bound element.
    pub fn is_bad(&self) -> bool {
        !matches!(self, Binding::Real(_))
    }

    /// Diagnostics attached at registration or resolution time. Empty for
    /// real elements.
    pub fn errors(&self) -> &[EdmError] {
        match self {
            Binding::Real(_) => &[],
            Binding::Ambiguous(ambiguous) => ambiguous.errors(),
            Binding::Poison(poison) => &poison.errors,
        }
    }

    /// Fold the new collision into this entry per the registration contract:
    /// a real element becomes a two-candidate ambiguous binding, an existing
    /// ambiguous binding grows by one candidate, never a nested wrapper.
    pub(crate) fn collide(&mut self, next: T, report: bool) {
        match self {
            Binding::Ambiguous(ambiguous) => ambiguous.push(next, report),
            _ => {
                let placeholder =
                    Binding::Poison(Poison::unresolved(next.name().clone(), next.kind()));
                match std::mem::replace(self, placeholder) {
                    Binding::Real(first) => {
                        *self = Binding::Ambiguous(Ambiguous::seeded(first, next, report));
                    }
                    // Tables never hold poisons during registration.
                    other => unreachable!("collision against non-real binding: {:?}", other.kind()),
                }
            }
        }
    }
}

impl<T: SchemaElement> SchemaElement for Binding<T> {
    fn name(&self) -> &QualifiedName {
        match self {
            Binding::Real(element) => element.name(),
            Binding::Ambiguous(ambiguous) => ambiguous.name(),
            Binding::Poison(poison) => poison.name(),
        }
    }

    fn kind(&self) -> SchemaKind {
        match self {
            Binding::Real(element) => element.kind(),
            Binding::Ambiguous(ambiguous) => ambiguous.kind(),
            Binding::Poison(poison) => poison.kind(),
        }
    }
}

// Accessors requiring a single unambiguous definition return empty or
// neutral values on ambiguous and poisoned bindings.

impl Binding<EntityType> {
    pub fn base(&self) -> Option<&TypeRef> {
        self.as_real().and_then(|t| t.base.as_ref())
    }

    pub fn key(&self) -> &[String] {
        self.as_real().map(|t| t.key.as_slice()).unwrap_or(&[])
    }

    pub fn properties(&self) -> &[StructuralProperty] {
        self.as_real().map(|t| t.properties.as_slice()).unwrap_or(&[])
    }

    pub fn navigation(&self) -> &[NavigationProperty] {
        self.as_real().map(|t| t.navigation.as_slice()).unwrap_or(&[])
    }
}

impl Binding<ComplexType> {
    pub fn base(&self) -> Option<&TypeRef> {
        self.as_real().and_then(|t| t.base.as_ref())
    }

    pub fn properties(&self) -> &[StructuralProperty] {
        self.as_real().map(|t| t.properties.as_slice()).unwrap_or(&[])
    }
}

impl Binding<EnumType> {
    pub fn members(&self) -> &[EnumMember] {
        self.as_real().map(|t| t.members.as_slice()).unwrap_or(&[])
    }
}

impl Binding<Term> {
    pub fn value_type(&self) -> Option<&TypeRef> {
        self.as_real().map(|t| &t.value_type)
    }
}

impl Binding<Operation> {
    pub fn parameters(&self) -> &[Parameter] {
        self.as_real().map(|o| o.parameters.as_slice()).unwrap_or(&[])
    }

    pub fn return_type(&self) -> Option<&TypeRef> {
        self.as_real().and_then(|o| o.return_type.as_ref())
    }
}

impl Binding<EntityContainer> {
    pub fn members(&self) -> &[ContainerMember] {
        self.as_real().map(|c| c.members.as_slice()).unwrap_or(&[])
    }

    pub fn find_entity_set(&self, name: &str) -> Option<&EntitySet> {
        self.as_real().and_then(|c| c.find_entity_set(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrimitiveKind;

    #[test]
    fn test_ambiguous_binding_answers_neutrally() {
        let name = QualifiedName::new("NS", "Person");
        let mut first = EntityType::new(name.clone());
        first.key.push("Id".to_string());
        first.properties.push(StructuralProperty::new(
            "Id",
            TypeRef::primitive(PrimitiveKind::Int32, false),
        ));
        let second = EntityType::new(name.clone());

        let mut binding = Binding::Real(first);
        binding.collide(second, true);

        assert!(binding.is_bad());
        assert_eq!(binding.name(), &name);
        assert_eq!(binding.kind(), SchemaKind::EntityType);
        // Single-definition accessors go neutral.
        assert!(binding.key().is_empty());
        assert!(binding.properties().is_empty());
        assert!(binding.base().is_none());
        // But candidates keep their full declaration-time data.
        let ambiguous = binding.as_ambiguous().unwrap();
        assert_eq!(ambiguous.candidates()[0].key, vec!["Id".to_string()]);
    }

    #[test]
    fn test_third_collision_does_not_nest() {
        let name = QualifiedName::new("NS", "Person");
        let mut binding = Binding::Real(EntityType::new(name.clone()));
        binding.collide(EntityType::new(name.clone()), true);
        binding.collide(EntityType::new(name.clone()), true);

        let ambiguous = binding.as_ambiguous().unwrap();
        assert_eq!(ambiguous.candidates().len(), 3);
        assert_eq!(ambiguous.errors().len(), 2);
    }
}
