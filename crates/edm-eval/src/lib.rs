//! Evaluator for EDM model-level expressions.
//!
//! Computes values from annotation and default-value expressions against an
//! optional structured context. Depends on the model crate only for
//! qualified names; nothing here touches registration internals.

mod eval;
mod expr;
mod value;

pub use eval::{BuiltinFn, EvalError, Evaluator, FallbackFn};
pub use expr::Expression;
pub use value::{Record, Value, ValueKind};
