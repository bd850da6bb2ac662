//! Type references and the built-in primitive type set.

use crate::element::SchemaKind;
use crate::error::EdmError;
use crate::name::QualifiedName;
use crate::poison::Poison;
use serde::Serialize;

/// The fixed set of built-in scalar types. Not user-declarable; every member
/// lives in the reserved `Edm` namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PrimitiveKind {
    Binary,
    Boolean,
    Byte,
    Date,
    DateTimeOffset,
    Decimal,
    Double,
    Duration,
    Guid,
    Int16,
    Int32,
    Int64,
    SByte,
    Single,
    Stream,
    String,
    TimeOfDay,
}

impl PrimitiveKind {
    pub fn local_name(self) -> &'static str {
        match self {
            PrimitiveKind::Binary => "Binary",
            PrimitiveKind::Boolean => "Boolean",
            PrimitiveKind::Byte => "Byte",
            PrimitiveKind::Date => "Date",
            PrimitiveKind::DateTimeOffset => "DateTimeOffset",
            PrimitiveKind::Decimal => "Decimal",
            PrimitiveKind::Double => "Double",
            PrimitiveKind::Duration => "Duration",
            PrimitiveKind::Guid => "Guid",
            PrimitiveKind::Int16 => "Int16",
            PrimitiveKind::Int32 => "Int32",
            PrimitiveKind::Int64 => "Int64",
            PrimitiveKind::SByte => "SByte",
            PrimitiveKind::Single => "Single",
            PrimitiveKind::Stream => "Stream",
            PrimitiveKind::String => "String",
            PrimitiveKind::TimeOfDay => "TimeOfDay",
        }
    }

    pub fn qualified_name(self) -> QualifiedName {
        QualifiedName::new("Edm", self.local_name())
    }

    /// Recognize an `Edm.*` name. Anything else, including unknown names in
    /// the `Edm` namespace, is not a primitive.
    pub fn from_name(name: &QualifiedName) -> Option<Self> {
        if name.namespace() != "Edm" {
            return None;
        }
        ALL.iter().copied().find(|k| k.local_name() == name.name())
    }
}

const ALL: &[PrimitiveKind] = &[
    PrimitiveKind::Binary,
    PrimitiveKind::Boolean,
    PrimitiveKind::Byte,
    PrimitiveKind::Date,
    PrimitiveKind::DateTimeOffset,
    PrimitiveKind::Decimal,
    PrimitiveKind::Double,
    PrimitiveKind::Duration,
    PrimitiveKind::Guid,
    PrimitiveKind::Int16,
    PrimitiveKind::Int32,
    PrimitiveKind::Int64,
    PrimitiveKind::SByte,
    PrimitiveKind::Single,
    PrimitiveKind::Stream,
    PrimitiveKind::String,
    PrimitiveKind::TimeOfDay,
];

/// Where a [`TypeRef`] points after resolution.
///
/// Every edge starts out [`Deferred`](TypeTarget::Deferred) and is memoized
/// exactly once during the build pass. A frozen model exposes no deferred
/// edges except inside ambiguous candidates, which keep their
/// declaration-time data untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeTarget {
    Deferred,
    Primitive(PrimitiveKind),
    /// Present in the model's table for this kind under the edge's name.
    Declared(SchemaKind),
    /// Unresolved or cyclic. The poison is owned by the edge that triggered
    /// it; the tables themselves stay append-only.
    Poisoned(Poison),
}

/// A nullability-carrying reference from one schema element to a type.
///
/// References are by qualified name until resolved; the memoized target is
/// what lets forward references and cycles resolve in a single pass.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    pub name: QualifiedName,
    pub nullable: bool,
    /// Collection-of wrapping; `nullable` applies to the element type.
    pub collection: bool,
    pub(crate) target: TypeTarget,
}

impl TypeRef {
    pub fn new(name: QualifiedName, nullable: bool) -> Self {
        // Primitive references never need the lookup pass.
        let target = match PrimitiveKind::from_name(&name) {
            Some(kind) => TypeTarget::Primitive(kind),
            None => TypeTarget::Deferred,
        };
        Self {
            name,
            nullable,
            collection: false,
            target,
        }
    }

    pub fn collection_of(name: QualifiedName, nullable: bool) -> Self {
        Self {
            collection: true,
            ..Self::new(name, nullable)
        }
    }

    pub fn primitive(kind: PrimitiveKind, nullable: bool) -> Self {
        Self {
            name: kind.qualified_name(),
            nullable,
            collection: false,
            target: TypeTarget::Primitive(kind),
        }
    }

    pub fn target(&self) -> &TypeTarget {
        &self.target
    }

    pub fn is_bad(&self) -> bool {
        matches!(self.target, TypeTarget::Poisoned(_))
    }

    /// Diagnostics attached to this edge. Empty unless the edge is poisoned.
    pub fn errors(&self) -> &[EdmError] {
        match &self.target {
            TypeTarget::Poisoned(poison) => &poison.errors,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_round_trip() {
        for kind in ALL.iter().copied() {
            assert_eq!(PrimitiveKind::from_name(&kind.qualified_name()), Some(kind));
        }
        assert_eq!(PrimitiveKind::from_name(&QualifiedName::new("Edm", "Widget")), None);
        assert_eq!(PrimitiveKind::from_name(&QualifiedName::new("NS", "String")), None);
    }

    #[test]
    fn test_primitive_refs_resolve_eagerly() {
        let r = TypeRef::new(QualifiedName::new("Edm", "Int32"), false);
        assert_eq!(*r.target(), TypeTarget::Primitive(PrimitiveKind::Int32));

        let r = TypeRef::new(QualifiedName::new("NS", "Person"), true);
        assert_eq!(*r.target(), TypeTarget::Deferred);
    }
}
