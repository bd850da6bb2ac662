//! Validation rule engine for EDM models.
//!
//! A single dispatch pass over a built model: each element is handed to the
//! rules registered for its kind, and rule outputs concatenate into one
//! deterministic diagnostic sequence. Rule sets are versioned and
//! pre-composed; the model is never mutated.

mod engine;
mod rules;
mod ruleset;

pub use engine::{ElementRef, validate};
pub use ruleset::{EdmVersion, Rule, RuleFn, RuleSet, rule_set_for};
