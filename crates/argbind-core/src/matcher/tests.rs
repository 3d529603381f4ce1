use super::*;
use crate::spec::{TypeName, ValidatorSpec};
use crate::value::Function;
use pretty_assertions::assert_eq;

fn slot(key: &str, name: TypeName) -> Slot {
    Slot::new(key, ValidatorSpec::Type(name)).unwrap()
}

fn mismatch(key: &str, type_name: &str) -> Mismatch {
    Mismatch {
        key: key.to_string(),
        expected: crate::error::Expected::Type(type_name.to_string()),
        plural: false,
    }
}

#[test]
fn test_required_consumes_one_value() {
    let args = vec!["a".into(), "b".into()];
    let pass = Pass::start(&args, 1)
        .step(&slot("foo", TypeName::String), 0)
        .unwrap();
    assert_eq!(pass.remaining.len(), 1);
    assert_eq!(pass.bindings.value("foo"), Some(&"a".into()));
}

#[test]
fn test_required_missing_ignores_deferred() {
    let args: Vec<ArgValue> = vec![];
    let mut pass = Pass::start(&args, 1);
    pass.deferred = Some(mismatch("opt", "object"));
    let err = pass.step(&slot("foo", TypeName::String), 0).unwrap_err();
    assert_eq!(err, Error::Required { key: "foo".into() });
}

#[test]
fn test_optional_mismatch_is_deferred_without_consuming() {
    let args = vec![10.into(), "a".into()];
    let pass = Pass::start(&args, 2)
        .step(&slot("[foo]", TypeName::String), 1)
        .unwrap();
    assert_eq!(pass.remaining.len(), 2);
    assert!(pass.bindings.get("foo").unwrap().is_absent());
    assert_eq!(pass.deferred, Some(mismatch("foo", "string")));
}

#[test]
fn test_only_first_deferred_mismatch_is_kept() {
    let args = vec![10.into()];
    let pass = Pass::start(&args, 2)
        .step(&slot("[foo]", TypeName::String), 1)
        .unwrap()
        .step(&slot("[bar]", TypeName::Boolean), 0)
        .unwrap();
    assert_eq!(pass.deferred, Some(mismatch("foo", "string")));
}

#[test]
fn test_sentinel_fills_optional_and_clears_deferred() {
    let args = vec![ArgValue::Null];
    let mut pass = Pass::start(&args, 1);
    pass.deferred = Some(mismatch("earlier", "object"));
    let pass = pass.step(&slot("[foo]", TypeName::String), 0).unwrap();
    assert_eq!(pass.deferred, None);
    assert!(pass.remaining.is_empty());
    assert_eq!(pass.bindings.value("foo"), Some(&ArgValue::Null));
}

#[test]
fn test_escalate_prefers_deferred_with_values_left() {
    let args = vec![1.into(), 2.into()];
    let mut pass = Pass::start(&args, 1);
    pass.deferred = Some(mismatch("opt", "object"));
    let err = pass.escalate(mismatch("req", "string"));
    assert_eq!(err.key(), Some("opt"));
}

#[test]
fn test_escalate_reports_current_on_last_value() {
    let args = vec![1.into()];
    let mut pass = Pass::start(&args, 1);
    pass.deferred = Some(mismatch("opt", "object"));
    let err = pass.escalate(mismatch("req", "string"));
    assert_eq!(err.key(), Some("req"));
}

#[test]
fn test_spread_reserves_values_for_later_slots() {
    let cb = Function::new("cb");
    let args = vec![1.into(), 2.into(), 3.into(), cb.into()];
    let pass = Pass::start(&args, 2)
        .step(&slot("...nums", TypeName::Number), 1)
        .unwrap();
    assert_eq!(pass.remaining.len(), 1);
    assert_eq!(pass.bindings.spread("nums").unwrap().len(), 3);
}

#[test]
fn test_required_spread_needs_one_value() {
    let args = vec![1.into()];
    let err = Pass::start(&args, 2)
        .step(&slot("...nums", TypeName::Number), 1)
        .unwrap_err();
    assert_eq!(err.to_string(), "\"...nums\" is required");
}

#[test]
fn test_optional_spread_skips_sentinels_but_keeps_deferred() {
    let args = vec![ArgValue::Null, 1.into(), ArgValue::Undefined];
    let mut pass = Pass::start(&args, 1);
    pass.deferred = Some(mismatch("opt", "object"));
    let pass = pass
        .step(&slot("[...nums]", TypeName::Number), 0)
        .unwrap();
    assert_eq!(pass.bindings.spread("nums"), Some(&[ArgValue::Number(1.0)][..]));
    assert!(pass.remaining.is_empty());
    assert_eq!(pass.deferred, None, "the number in the middle cleared it");

    let args = vec![ArgValue::Null];
    let mut pass = Pass::start(&args, 1);
    pass.deferred = Some(mismatch("opt", "object"));
    let pass = pass
        .step(&slot("[...nums]", TypeName::Number), 0)
        .unwrap();
    assert_eq!(pass.bindings.spread("nums"), Some(&[][..]));
    assert_eq!(pass.deferred, Some(mismatch("opt", "object")));
}

#[test]
fn test_finish_reports_surviving_deferred() {
    let args: Vec<ArgValue> = vec![];
    let mut pass = Pass::start(&args, 0);
    pass.deferred = Some(mismatch("opt", "object"));
    let err = pass.finish().unwrap_err();
    assert_eq!(err.to_string(), "\"opt\" must be an object");
}
