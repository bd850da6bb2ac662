//! Entity data model semantic graph.
//!
//! Takes raw, possibly inconsistent schema declarations and links them into
//! a queryable model that stays fully walkable in the presence of missing
//! declarations, name collisions, and reference cycles. Failures in schema
//! data are diagnostics attached to the graph, never errors returned from
//! lookups.

mod ambiguous;
mod binding;
mod builder;
mod element;
mod error;
mod model;
mod name;
mod poison;
mod resolve;
mod table;
mod types;

pub use ambiguous::Ambiguous;
pub use binding::Binding;
pub use builder::{BareContainerAmbiguity, ModelBuilder};
pub use element::{
    ComplexType, ContainerMember, Element, EntityContainer, EntitySet, EntityType, EnumMember,
    EnumType, NavigationBinding, NavigationProperty, Operation, OperationImport, OperationTarget,
    Parameter, SchemaElement, SchemaKind, SetTarget, Singleton, StructuralProperty, TargetPath,
    Term,
};
pub use error::{EdmError, ErrorCode, Location};
pub use model::{Model, ResolvedType, SchemaType};
pub use name::{NameLookup, QualifiedName};
pub use poison::{Poison, PoisonReason};
pub use table::Table;
pub use types::{PrimitiveKind, TypeRef, TypeTarget};
