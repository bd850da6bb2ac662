//! Deferred reference resolution and cycle breaking.
//!
//! Runs once, inside [`ModelBuilder::finish`](crate::ModelBuilder::finish).
//! Every name-based edge is chased to a table entry, an unresolved poison,
//! or a cyclic poison. Cycle detection threads an explicit in-progress set
//! through each chain walk; there is no process-wide resolution state.
//! Outcomes are memoized into the owning edge, so a placeholder is never
//! retried after the build pass.

use crate::binding::Binding;
use crate::element::{
    ComplexType, ContainerMember, EntityContainer, EntityType, NavigationBinding, Operation,
    OperationImport, OperationTarget, SchemaKind, SetTarget, Term,
};
use crate::model::Model;
use crate::name::QualifiedName;
use crate::poison::Poison;
use crate::types::{TypeRef, TypeTarget};
use ahash::AHashMap;
use indexmap::IndexSet;
use tracing::{debug, trace};

pub(crate) struct Resolver {
    /// Memoized type-name outcomes, shared across edges so a missing name
    /// is looked up (and logged) once.
    type_cache: AHashMap<QualifiedName, TypeTarget>,
}

impl Resolver {
    pub(crate) fn new() -> Self {
        Self {
            type_cache: AHashMap::new(),
        }
    }

    /// Resolve every deferred edge in the model's own tables. Ambiguous
    /// candidates keep their declaration-time edges; their accessors answer
    /// neutrally anyway.
    pub(crate) fn run(mut self, model: &mut Model) {
        debug!(
            entity_types = model.entity_types.len(),
            complex_types = model.complex_types.len(),
            containers = model.containers.len(),
            "resolving deferred references"
        );

        for index in 0..model.entity_types.len() {
            let Some(Binding::Real(ty)) = model.entity_types.get_index(index) else {
                continue;
            };
            let mut ty = ty.clone();
            self.resolve_entity_type(model, &mut ty);
            if let Some(slot) = model.entity_types.get_index_mut(index) {
                *slot = Binding::Real(ty);
            }
        }

        for index in 0..model.complex_types.len() {
            let Some(Binding::Real(ty)) = model.complex_types.get_index(index) else {
                continue;
            };
            let mut ty = ty.clone();
            self.resolve_complex_type(model, &mut ty);
            if let Some(slot) = model.complex_types.get_index_mut(index) {
                *slot = Binding::Real(ty);
            }
        }

        for index in 0..model.terms.len() {
            let Some(Binding::Real(term)) = model.terms.get_index(index) else {
                continue;
            };
            let mut term: Term = term.clone();
            self.resolve_type_ref(model, &mut term.value_type);
            if let Some(slot) = model.terms.get_index_mut(index) {
                *slot = Binding::Real(term);
            }
        }

        for index in 0..model.operations.len() {
            let Some(Binding::Real(operation)) = model.operations.get_index(index) else {
                continue;
            };
            let mut operation: Operation = operation.clone();
            for parameter in &mut operation.parameters {
                self.resolve_type_ref(model, &mut parameter.type_ref);
            }
            if let Some(return_type) = &mut operation.return_type {
                self.resolve_type_ref(model, return_type);
            }
            if let Some(slot) = model.operations.get_index_mut(index) {
                *slot = Binding::Real(operation);
            }
        }

        for index in 0..model.containers.len() {
            let Some(Binding::Real(container)) = model.containers.get_index(index) else {
                continue;
            };
            let mut container = container.clone();
            self.resolve_container(model, &mut container);
            if let Some(slot) = model.containers.get_index_mut(index) {
                *slot = Binding::Real(container);
            }
        }
    }

    fn resolve_entity_type(&mut self, model: &Model, ty: &mut EntityType) {
        let owner = ty.name.clone();
        if let Some(base) = &mut ty.base {
            self.resolve_base(model, SchemaKind::EntityType, &owner, base);
        }
        for property in &mut ty.properties {
            self.resolve_type_ref(model, &mut property.type_ref);
        }
        for navigation in &mut ty.navigation {
            self.resolve_type_ref(model, &mut navigation.target_type);
        }
    }

    fn resolve_complex_type(&mut self, model: &Model, ty: &mut ComplexType) {
        let owner = ty.name.clone();
        if let Some(base) = &mut ty.base {
            self.resolve_base(model, SchemaKind::ComplexType, &owner, base);
        }
        for property in &mut ty.properties {
            self.resolve_type_ref(model, &mut property.type_ref);
        }
    }

    /// Plain type lookup: entity, complex, then enum tables, falling through
    /// to referenced models; absence memoizes an unresolved poison.
    fn resolve_type_ref(&mut self, model: &Model, type_ref: &mut TypeRef) {
        if !matches!(type_ref.target, TypeTarget::Deferred) {
            return;
        }
        if let Some(cached) = self.type_cache.get(&type_ref.name) {
            type_ref.target = cached.clone();
            return;
        }
        let target = Self::lookup_type(model, &type_ref.name).unwrap_or_else(|| {
            trace!(name = %type_ref.name, "type reference did not resolve");
            TypeTarget::Poisoned(Poison::unresolved_type(type_ref.name.clone()))
        });
        self.type_cache.insert(type_ref.name.clone(), target.clone());
        type_ref.target = target;
    }

    fn lookup_type(model: &Model, name: &QualifiedName) -> Option<TypeTarget> {
        if model.find_entity_type(name).is_some() {
            Some(TypeTarget::Declared(SchemaKind::EntityType))
        } else if model.find_complex_type(name).is_some() {
            Some(TypeTarget::Declared(SchemaKind::ComplexType))
        } else if model.find_enum_type(name).is_some() {
            Some(TypeTarget::Declared(SchemaKind::EnumType))
        } else {
            None
        }
    }

    /// Base-type edges additionally walk the inheritance chain with an
    /// in-progress set; revisiting a name in progress breaks the cycle with
    /// a poison on this edge.
    fn resolve_base(
        &mut self,
        model: &Model,
        kind: SchemaKind,
        owner: &QualifiedName,
        base: &mut TypeRef,
    ) {
        let Some(direct) = Self::lookup_type(model, &base.name) else {
            self.type_cache
                .entry(base.name.clone())
                .or_insert_with(|| TypeTarget::Poisoned(Poison::unresolved_type(base.name.clone())));
            base.target = TypeTarget::Poisoned(Poison::unresolved_type(base.name.clone()));
            return;
        };

        let mut in_progress: IndexSet<QualifiedName> = IndexSet::new();
        in_progress.insert(owner.clone());
        let mut current = Some(base.name.clone());
        while let Some(name) = current {
            if !in_progress.insert(name.clone()) {
                trace!(owner = %owner, through = %name, "base type chain is cyclic");
                base.target = TypeTarget::Poisoned(Poison::cyclic(base.name.clone(), kind));
                return;
            }
            current = Self::next_base_name(model, kind, &name);
        }
        base.target = direct;
    }

    /// The declared base name of `name` within the same kind's table, if it
    /// is a plain real element. Ambiguous and missing elements end the chain.
    fn next_base_name(model: &Model, kind: SchemaKind, name: &QualifiedName) -> Option<QualifiedName> {
        match kind {
            SchemaKind::EntityType => model
                .find_entity_type(name)
                .and_then(|b| b.as_real())
                .and_then(|t| t.base.as_ref())
                .map(|r| r.name.clone()),
            SchemaKind::ComplexType => model
                .find_complex_type(name)
                .and_then(|b| b.as_real())
                .and_then(|t| t.base.as_ref())
                .map(|r| r.name.clone()),
            _ => None,
        }
    }

    fn resolve_container(&mut self, model: &Model, container: &mut EntityContainer) {
        let container_name = container.name.clone();
        for member in &mut container.members {
            match member {
                ContainerMember::EntitySet(set) => {
                    self.resolve_type_ref(model, &mut set.element_type);
                    let set_name = set.name.clone();
                    for binding in &mut set.navigation_bindings {
                        Self::resolve_set_target(model, &container_name, &set_name, binding);
                    }
                }
                ContainerMember::Singleton(singleton) => {
                    self.resolve_type_ref(model, &mut singleton.element_type);
                }
                ContainerMember::OperationImport(import) => {
                    Self::resolve_operation_import(model, import);
                }
            }
        }
    }

    /// Navigation binding targets chain across containers: the target set
    /// may itself bind the same navigation path onward. The in-progress set
    /// of `(container, set)` pairs bounds the walk and breaks cycles.
    fn resolve_set_target(
        model: &Model,
        origin_container: &QualifiedName,
        origin_set: &str,
        binding: &mut NavigationBinding,
    ) {
        if !matches!(binding.target, SetTarget::Deferred) {
            return;
        }
        let path = binding.path.clone();
        let mut in_progress: IndexSet<(QualifiedName, String)> = IndexSet::new();
        in_progress.insert((origin_container.clone(), origin_set.to_string()));

        let mut current = (
            binding.target_path.container.clone(),
            binding.target_path.set.clone(),
        );
        let mut direct = true;
        loop {
            if !in_progress.insert(current.clone()) {
                trace!(
                    container = %current.0,
                    set = %current.1,
                    "navigation target chain is cyclic"
                );
                binding.target = SetTarget::Poisoned(Poison::cyclic_entity_set(current.0, &current.1));
                return;
            }
            let found = model
                .find_container(&current.0)
                .and_then(|c| c.find_entity_set(&current.1));
            let Some(set) = found else {
                // Only direct absence poisons this edge. A broken onward
                // binding is the downstream set's own defect and is poisoned
                // there when its container resolves.
                if direct {
                    binding.target =
                        SetTarget::Poisoned(Poison::unresolved_entity_set(current.0, &current.1));
                    return;
                }
                break;
            };
            direct = false;
            match set.navigation_bindings.iter().find(|b| b.path == path) {
                Some(next) => {
                    current = (
                        next.target_path.container.clone(),
                        next.target_path.set.clone(),
                    );
                }
                None => break,
            }
        }
        binding.target = SetTarget::Resolved {
            container: binding.target_path.container.clone(),
            set: binding.target_path.set.clone(),
        };
    }

    fn resolve_operation_import(model: &Model, import: &mut OperationImport) {
        if !matches!(import.target, OperationTarget::Deferred) {
            return;
        }
        import.target = if model.find_operation(&import.operation).is_some() {
            OperationTarget::Resolved
        } else {
            OperationTarget::Poisoned(Poison::unresolved(
                import.operation.clone(),
                SchemaKind::Operation,
            ))
        };
    }
}
