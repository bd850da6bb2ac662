//! Poison placeholders.
//!
//! Whenever a reference cannot be resolved the graph gets a placeholder that
//! still satisfies the element capability contract, so consumers can always
//! obtain some name, some kind, and an empty structure, and keep walking.
//! One generic representation covers every element kind.

use crate::element::{SchemaElement, SchemaKind};
use crate::error::{EdmError, ErrorCode};
use crate::name::QualifiedName;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoisonReason {
    /// The name was referenced but its declaration was never seen.
    Unresolved,
    /// Resolution revisited an element already in progress on the same path.
    Cyclic,
}

/// A placeholder element carrying at least one diagnostic instead of data.
#[derive(Debug, Clone, PartialEq)]
pub struct Poison {
    pub name: QualifiedName,
    pub kind: SchemaKind,
    pub reason: PoisonReason,
    pub errors: Vec<EdmError>,
}

impl Poison {
    pub fn unresolved(name: QualifiedName, kind: SchemaKind) -> Self {
        let code = match kind {
            SchemaKind::Term => ErrorCode::BadUnresolvedTerm,
            SchemaKind::Operation => ErrorCode::BadUnresolvedOperation,
            SchemaKind::EntityContainer => ErrorCode::BadUnresolvedEntityContainer,
            _ => ErrorCode::BadUnresolvedType,
        };
        let errors = vec![EdmError::new(
            code,
            format!("the {kind} '{name}' could not be found"),
        )];
        Self {
            name,
            kind,
            reason: PoisonReason::Unresolved,
            errors,
        }
    }

    /// An unresolved reference to a schema type whose intended kind is
    /// unknowable (the name matched no entity, complex, or enum table).
    pub fn unresolved_type(name: QualifiedName) -> Self {
        let errors = vec![EdmError::new(
            ErrorCode::BadUnresolvedType,
            format!("the type '{name}' could not be found"),
        )];
        Self {
            name,
            kind: SchemaKind::None,
            reason: PoisonReason::Unresolved,
            errors,
        }
    }

    pub fn cyclic(name: QualifiedName, kind: SchemaKind) -> Self {
        let code = match kind {
            SchemaKind::ComplexType => ErrorCode::BadCyclicComplexType,
            SchemaKind::EntityContainer => ErrorCode::BadCyclicEntitySet,
            _ => ErrorCode::BadCyclicEntityType,
        };
        let errors = vec![EdmError::new(
            code,
            format!("the {kind} '{name}' is invalid because its reference chain is cyclic"),
        )];
        Self {
            name,
            kind,
            reason: PoisonReason::Cyclic,
            errors,
        }
    }

    /// An entity-set specific cyclic placeholder; sets have bare names scoped
    /// to their container, so the container name carries the namespace.
    pub fn cyclic_entity_set(container: QualifiedName, set: &str) -> Self {
        let name = QualifiedName::new(container.to_string(), set);
        let errors = vec![EdmError::new(
            ErrorCode::BadCyclicEntitySet,
            format!("the entity set '{name}' is invalid because its navigation targets are cyclic"),
        )];
        Self {
            name,
            kind: SchemaKind::EntityContainer,
            reason: PoisonReason::Cyclic,
            errors,
        }
    }

    pub fn unresolved_entity_set(container: QualifiedName, set: &str) -> Self {
        let name = QualifiedName::new(container.to_string(), set);
        let errors = vec![EdmError::new(
            ErrorCode::BadUnresolvedEntitySet,
            format!("the entity set '{name}' could not be found"),
        )];
        Self {
            name,
            kind: SchemaKind::EntityContainer,
            reason: PoisonReason::Unresolved,
            errors,
        }
    }

    pub fn is_cyclic(&self) -> bool {
        self.reason == PoisonReason::Cyclic
    }
}

impl SchemaElement for Poison {
    fn name(&self) -> &QualifiedName {
        &self.name
    }

    fn kind(&self) -> SchemaKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poison_always_carries_errors() {
        let kinds = [
            SchemaKind::EntityType,
            SchemaKind::ComplexType,
            SchemaKind::EnumType,
            SchemaKind::Term,
            SchemaKind::Operation,
            SchemaKind::EntityContainer,
        ];
        for kind in kinds {
            let name = QualifiedName::new("NS", "Missing");
            let unresolved = Poison::unresolved(name.clone(), kind);
            assert!(!unresolved.errors.is_empty());
            assert_eq!(unresolved.kind(), kind);
            assert_eq!(unresolved.name(), &name);

            let cyclic = Poison::cyclic(name.clone(), kind);
            assert!(!cyclic.errors.is_empty());
            assert!(cyclic.is_cyclic());
        }
    }

    #[test]
    fn test_unresolved_code_tracks_kind() {
        let p = Poison::unresolved(QualifiedName::new("NS", "F"), SchemaKind::Operation);
        assert_eq!(p.errors[0].code, ErrorCode::BadUnresolvedOperation);
        let p = Poison::unresolved(QualifiedName::new("NS", "T"), SchemaKind::EntityType);
        assert_eq!(p.errors[0].code, ErrorCode::BadUnresolvedType);
    }
}
