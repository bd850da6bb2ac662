//! Ambiguous bindings: the collision placeholder.
//!
//! When two same-kind elements register under one qualified name, both are
//! kept. Representative answers come from the first-registered candidate,
//! deterministically, so repeated builds of the same input produce identical
//! diagnostics.

use crate::element::{SchemaElement, SchemaKind};
use crate::error::{EdmError, ErrorCode};
use crate::name::QualifiedName;

/// Two or more same-kind elements sharing a qualified name.
///
/// Invariant: never nests. A third collision appends to `candidates` in
/// place rather than wrapping again.
#[derive(Debug, Clone, PartialEq)]
pub struct Ambiguous<T> {
    candidates: Vec<T>,
    errors: Vec<EdmError>,
}

impl<T: SchemaElement> Ambiguous<T> {
    /// Seed from the existing entry and the newly colliding one, in
    /// registration order.
    pub(crate) fn seeded(first: T, second: T, report: bool) -> Self {
        let mut this = Self {
            candidates: vec![first],
            errors: Vec::new(),
        };
        this.push(second, report);
        this
    }

    /// Append one more colliding candidate. One diagnostic per collision,
    /// unless the caller's policy silences it.
    pub(crate) fn push(&mut self, next: T, report: bool) {
        if report {
            self.errors.push(EdmError::new(
                ErrorCode::AlreadyDefined,
                format!(
                    "the {} name '{}' is already defined; the binding is ambiguous",
                    next.kind(),
                    next.name()
                ),
            ));
        }
        self.candidates.push(next);
    }

    /// All colliding candidates, in registration order.
    pub fn candidates(&self) -> &[T] {
        &self.candidates
    }

    /// First-registered candidate; the tie-break for any accessor that must
    /// produce a single answer.
    pub fn representative(&self) -> &T {
        &self.candidates[0]
    }

    pub fn errors(&self) -> &[EdmError] {
        &self.errors
    }
}

impl<T: SchemaElement> SchemaElement for Ambiguous<T> {
    fn name(&self) -> &QualifiedName {
        self.representative().name()
    }

    fn kind(&self) -> SchemaKind {
        self.representative().kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::EntityType;

    fn person() -> EntityType {
        EntityType::new(QualifiedName::new("NS", "Person"))
    }

    #[test]
    fn test_candidates_keep_registration_order() {
        let mut first = person();
        first.is_abstract = true;
        let mut a = Ambiguous::seeded(first, person(), true);
        a.push(person(), true);

        assert_eq!(a.candidates().len(), 3);
        assert!(a.candidates()[0].is_abstract);
        assert!(a.representative().is_abstract);
        assert_eq!(a.errors().len(), 2);
    }

    #[test]
    fn test_silenced_collision_carries_no_errors() {
        let a = Ambiguous::seeded(person(), person(), false);
        assert_eq!(a.candidates().len(), 2);
        assert!(a.errors().is_empty());
    }
}
