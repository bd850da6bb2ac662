//! Model-level expressions.
//!
//! The shapes an annotation or default value can take: constants, record and
//! collection construction, path navigation against a context value,
//! conditionals, type tests, and function application.

use crate::value::{Value, ValueKind};
use edm_model::QualifiedName;

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A constant of some primitive kind.
    Literal(Value),
    Null,
    /// Ordered name/expression pairs.
    Record(Vec<(String, Expression)>),
    Collection(Vec<Expression>),
    /// Property-name segments navigated from the context value.
    Path(Vec<String>),
    /// A named parameter supplied to the evaluator.
    Parameter(String),
    /// A reference to a model operation by qualified name; evaluates by
    /// applying the named function with no arguments.
    OperationRef(QualifiedName),
    If {
        condition: Box<Expression>,
        then: Box<Expression>,
        otherwise: Box<Expression>,
    },
    IsType {
        expr: Box<Expression>,
        expected: ValueKind,
    },
    Cast {
        expr: Box<Expression>,
        expected: ValueKind,
    },
    Apply {
        name: QualifiedName,
        args: Vec<Expression>,
    },
}

impl Expression {
    pub fn path<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Self {
        Expression::Path(segments.into_iter().map(Into::into).collect())
    }

    pub fn record<S: Into<String>>(fields: impl IntoIterator<Item = (S, Expression)>) -> Self {
        Expression::Record(
            fields
                .into_iter()
                .map(|(name, expr)| (name.into(), expr))
                .collect(),
        )
    }
}
