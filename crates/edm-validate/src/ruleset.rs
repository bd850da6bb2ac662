//! Versioned rule sets.
//!
//! A rule set is a fixed, pre-composed list: requesting a target version
//! resolves to exactly the rules that apply there, with retired rules
//! excluded rather than disabled. Composition is pure and touches no model.

use crate::engine::ElementRef;
use crate::rules;
use edm_model::{EdmError, Model, SchemaKind};

/// Schema versions a rule set can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdmVersion {
    V4_0,
    V4_01,
}

pub type RuleFn = fn(&Model, ElementRef<'_>, &mut Vec<EdmError>);

/// One validation rule: pure over the model, keyed by the element kind it
/// applies to, appending zero or more diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub applies_to: SchemaKind,
    pub check: RuleFn,
}

impl Rule {
    pub const fn new(name: &'static str, applies_to: SchemaKind, check: RuleFn) -> Self {
        Self {
            name,
            applies_to,
            check,
        }
    }
}

/// A named, versioned, ordered collection of rules.
#[derive(Debug, Clone)]
pub struct RuleSet {
    name: &'static str,
    version: EdmVersion,
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(name: &'static str, version: EdmVersion, rules: Vec<Rule>) -> Self {
        Self {
            name,
            version,
            rules,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn version(&self) -> EdmVersion {
        self.version
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Rules applicable to one kind, in declaration order.
    pub(crate) fn rules_for(&self, kind: SchemaKind) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(move |r| r.applies_to == kind)
    }
}

/// Resolve a target version to its fixed rule list.
pub fn rule_set_for(version: EdmVersion) -> RuleSet {
    match version {
        EdmVersion::V4_0 => RuleSet::new("edm-4.0", version, rules::v4_0()),
        EdmVersion::V4_01 => RuleSet::new("edm-4.01", version, rules::v4_01()),
    }
}
