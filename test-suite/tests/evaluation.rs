//! Evaluator scenarios: computing annotation-style values against a model.

use edm_eval::{EvalError, Evaluator, Expression, Value, ValueKind};
use edm_model::QualifiedName;
use test_suite::qn;

#[test]
fn test_path_against_record_context() {
    let context = Value::record([("Age".to_string(), Value::Int(5))]);
    let evaluator = Evaluator::new();

    assert_eq!(
        evaluator.evaluate(&Expression::path(["Age"]), Some(&context)),
        Ok(Value::Int(5))
    );
    assert_eq!(
        evaluator.evaluate(&Expression::path(["Missing"]), Some(&context)),
        Err(EvalError::PathSegmentNotFound {
            segment: "Missing".to_string()
        })
    );
}

#[test]
fn test_default_value_with_fallback_substitution() {
    // A caller computing a best-effort default swaps in a fallback when the
    // expression fails; failure is a value, so this composes.
    let evaluator = Evaluator::new();
    let expr = Expression::Apply {
        name: qn("Core", "Unknown"),
        args: vec![],
    };
    let value = evaluator
        .evaluate(&expr, None)
        .unwrap_or(Value::Str("default".to_string()));
    assert_eq!(value, Value::Str("default".to_string()));
}

#[test]
fn test_conditional_annotation() {
    let context = Value::record([("IsDraft".to_string(), Value::Bool(true))]);
    let expr = Expression::If {
        condition: Box::new(Expression::path(["IsDraft"])),
        then: Box::new(Expression::Literal(Value::Str("draft".to_string()))),
        otherwise: Box::new(Expression::Literal(Value::Str("published".to_string()))),
    };
    assert_eq!(
        Evaluator::new().evaluate_str(&expr, Some(&context)),
        Ok("draft".to_string())
    );
}

#[test]
fn test_nested_record_collection_construction() {
    let expr = Expression::record([
        (
            "Tags",
            Expression::Collection(vec![
                Expression::Literal(Value::Str("a".to_string())),
                Expression::Literal(Value::Str("b".to_string())),
            ]),
        ),
        ("Count", Expression::Literal(Value::Int(2))),
    ]);
    let value = Evaluator::new().evaluate(&expr, None).unwrap();
    let Value::Record(record) = value else { panic!("expected a record") };
    let keys: Vec<_> = record.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["Tags", "Count"]);
}

#[test]
fn test_builtin_table_with_qualified_names() {
    fn upper(args: &[Value]) -> Result<Value, EvalError> {
        match args {
            [Value::Str(s)] => Ok(Value::Str(s.to_uppercase())),
            [other] => Err(EvalError::Projection {
                expected: ValueKind::Str,
                actual: other.kind(),
            }),
            _ => Err(EvalError::UnknownFunction {
                name: QualifiedName::new("Core", "Upper"),
            }),
        }
    }

    let evaluator = Evaluator::new().with_builtin(qn("Core", "Upper"), upper);
    let expr = Expression::Apply {
        name: qn("Core", "Upper"),
        args: vec![Expression::Literal(Value::Str("edm".to_string()))],
    };
    assert_eq!(
        evaluator.evaluate(&expr, None),
        Ok(Value::Str("EDM".to_string()))
    );
}

#[test]
fn test_typed_projection_vs_evaluation_failure() {
    let evaluator = Evaluator::new();

    // The expression succeeds but the requested shape differs.
    assert_eq!(
        evaluator.evaluate_bool(&Expression::Literal(Value::Str("no".to_string())), None),
        Err(EvalError::Projection {
            expected: ValueKind::Bool,
            actual: ValueKind::Str
        })
    );

    // The expression itself fails; the inner error is preserved.
    assert_eq!(
        evaluator.evaluate_bool(&Expression::Parameter("missing".to_string()), None),
        Err(EvalError::UnknownParameter {
            name: "missing".to_string()
        })
    );
}
