//! The tree-walking evaluator.
//!
//! Single-threaded, no suspension, no I/O. Evaluation failures are values of
//! [`EvalError`] so a caller computing a best-effort default can substitute
//! a fallback; the one documented precondition is that a path expression
//! needs a context to navigate from.

use crate::expr::Expression;
use crate::value::{Value, ValueKind};
use ahash::AHashMap;
use edm_model::QualifiedName;
use thiserror::Error;

/// A typed evaluation failure. Returned, never thrown.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("the context value has no field '{segment}'")]
    PathSegmentNotFound { segment: String },

    #[error("cannot navigate '{segment}' into a {actual} value")]
    PathIntoNonRecord { segment: String, actual: ValueKind },

    #[error("condition evaluated to {actual}, expected boolean")]
    ConditionNotBoolean { actual: ValueKind },

    #[error("no function named '{name}' is registered and no fallback applier is set")]
    UnknownFunction { name: QualifiedName },

    #[error("no parameter named '{name}' was supplied")]
    UnknownParameter { name: String },

    #[error("cannot cast {actual} to {expected}")]
    CastFailed { expected: ValueKind, actual: ValueKind },

    /// The expression evaluated fine but the caller asked for a different
    /// shape; distinct from the expression itself failing.
    #[error("expression produced {actual}, caller required {expected}")]
    Projection { expected: ValueKind, actual: ValueKind },
}

pub type BuiltinFn = fn(&[Value]) -> Result<Value, EvalError>;

/// Last-chance applier consulted for names missing from the builtin table.
pub type FallbackFn = dyn Fn(&QualifiedName, &[Value]) -> Result<Value, EvalError> + Send + Sync;

/// Expression evaluator with a pluggable builtin function table.
#[derive(Default)]
pub struct Evaluator {
    builtins: AHashMap<QualifiedName, BuiltinFn>,
    fallback: Option<Box<FallbackFn>>,
    parameters: AHashMap<String, Value>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtin(mut self, name: QualifiedName, function: BuiltinFn) -> Self {
        self.builtins.insert(name, function);
        self
    }

    pub fn with_fallback(
        mut self,
        fallback: impl Fn(&QualifiedName, &[Value]) -> Result<Value, EvalError> + Send + Sync + 'static,
    ) -> Self {
        self.fallback = Some(Box::new(fallback));
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: Value) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }

    /// Evaluate an expression against an optional context value.
    ///
    /// # Panics
    ///
    /// If `expression` contains a path expression and `context` is `None`;
    /// a path has nothing to navigate from, so that is a caller bug rather
    /// than a data error.
    pub fn evaluate(
        &self,
        expression: &Expression,
        context: Option<&Value>,
    ) -> Result<Value, EvalError> {
        match expression {
            Expression::Literal(value) => Ok(value.clone()),
            Expression::Null => Ok(Value::Null),
            Expression::Record(fields) => {
                let mut record = crate::value::Record::new();
                for (name, expr) in fields {
                    record.insert(name.clone(), self.evaluate(expr, context)?);
                }
                Ok(Value::Record(record))
            }
            Expression::Collection(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.evaluate(item, context)?);
                }
                Ok(Value::Collection(values))
            }
            Expression::Path(segments) => {
                let context = context
                    .expect("path expression evaluated without a context value to navigate from");
                self.navigate(segments, context)
            }
            Expression::Parameter(name) => {
                self.parameters
                    .get(name)
                    .cloned()
                    .ok_or_else(|| EvalError::UnknownParameter { name: name.clone() })
            }
            Expression::OperationRef(name) => self.apply(name, &[]),
            Expression::If {
                condition,
                then,
                otherwise,
            } => {
                let condition = self.evaluate(condition, context)?;
                match condition {
                    Value::Bool(true) => self.evaluate(then, context),
                    Value::Bool(false) => self.evaluate(otherwise, context),
                    other => Err(EvalError::ConditionNotBoolean {
                        actual: other.kind(),
                    }),
                }
            }
            Expression::IsType { expr, expected } => {
                let value = self.evaluate(expr, context)?;
                Ok(Value::Bool(value.kind() == *expected))
            }
            Expression::Cast { expr, expected } => {
                let value = self.evaluate(expr, context)?;
                cast(value, *expected)
            }
            Expression::Apply { name, args } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.evaluate(arg, context)?);
                }
                self.apply(name, &values)
            }
        }
    }

    /// Evaluate and project to a boolean; a non-boolean result fails with
    /// [`EvalError::Projection`], distinct from the expression failing.
    pub fn evaluate_bool(
        &self,
        expression: &Expression,
        context: Option<&Value>,
    ) -> Result<bool, EvalError> {
        let value = self.evaluate(expression, context)?;
        value.as_bool().ok_or(EvalError::Projection {
            expected: ValueKind::Bool,
            actual: value.kind(),
        })
    }

    pub fn evaluate_int(
        &self,
        expression: &Expression,
        context: Option<&Value>,
    ) -> Result<i64, EvalError> {
        let value = self.evaluate(expression, context)?;
        value.as_int().ok_or(EvalError::Projection {
            expected: ValueKind::Int,
            actual: value.kind(),
        })
    }

    pub fn evaluate_str(
        &self,
        expression: &Expression,
        context: Option<&Value>,
    ) -> Result<String, EvalError> {
        let value = self.evaluate(expression, context)?;
        match value {
            Value::Str(s) => Ok(s),
            other => Err(EvalError::Projection {
                expected: ValueKind::Str,
                actual: other.kind(),
            }),
        }
    }

    fn navigate(&self, segments: &[String], context: &Value) -> Result<Value, EvalError> {
        let mut current = context;
        for segment in segments {
            match current {
                Value::Record(record) => {
                    current = record.get(segment).ok_or_else(|| {
                        EvalError::PathSegmentNotFound {
                            segment: segment.clone(),
                        }
                    })?;
                }
                other => {
                    return Err(EvalError::PathIntoNonRecord {
                        segment: segment.clone(),
                        actual: other.kind(),
                    });
                }
            }
        }
        Ok(current.clone())
    }

    fn apply(&self, name: &QualifiedName, args: &[Value]) -> Result<Value, EvalError> {
        if let Some(builtin) = self.builtins.get(name) {
            return builtin(args);
        }
        match &self.fallback {
            Some(fallback) => fallback(name, args),
            None => Err(EvalError::UnknownFunction { name: name.clone() }),
        }
    }
}

/// Identity for matching kinds, integer-to-float widening, everything else
/// fails.
fn cast(value: Value, expected: ValueKind) -> Result<Value, EvalError> {
    let actual = value.kind();
    if actual == expected {
        return Ok(value);
    }
    match (value, expected) {
        (Value::Int(i), ValueKind::Float) => Ok(Value::Float(i as f64)),
        (value, _) => Err(EvalError::CastFailed {
            expected,
            actual: value.kind(),
        }),
    }
}
