//! Single-value checks
//!
//! [`check_one`] is the leaf the matcher calls for every candidate value. It
//! holds no state and knows nothing about slot kinds beyond the `plural` flag,
//! which only changes the wording of the error.
//!
//! Copyright (c) 2025 Argbind Team
//! Licensed under MIT OR Apache-2.0

use crate::error::{Expected, Mismatch};
use crate::spec::{TypeName, ValidatorSpec};
use crate::value::{builtin, ArgValue};

/// Check `value` against `spec`, labelling any failure with `label`
pub fn check_one(
    label: &str,
    value: &ArgValue,
    spec: &ValidatorSpec,
    plural: bool,
) -> Result<(), Mismatch> {
    match evaluate(value, spec) {
        None => Ok(()),
        Some(expected) => Err(Mismatch {
            key: label.to_string(),
            expected,
            plural,
        }),
    }
}

/// Returns the unmet expectation, or `None` when the value is accepted
fn evaluate(value: &ArgValue, spec: &ValidatorSpec) -> Option<Expected> {
    match spec {
        ValidatorSpec::Wildcard => None,
        ValidatorSpec::Type(name) => {
            (!matches_type(value, *name)).then(|| Expected::Type(name.to_string()))
        }
        ValidatorSpec::Class(class) => {
            (!value.instance_of(class)).then(|| Expected::Instance(class.name().to_string()))
        }
        ValidatorSpec::Predicate(predicate) => {
            predicate
                .check(value)
                .err()
                .map(|message| Expected::Predicate {
                    name: predicate.name().to_string(),
                    message,
                })
        }
        ValidatorSpec::Union(options) => {
            let mut failures = Vec::with_capacity(options.len());
            for option in options {
                match evaluate(value, option) {
                    None => return None,
                    Some(Expected::AnyOf(nested)) => failures.extend(nested),
                    Some(expected) => failures.push(expected),
                }
            }
            Some(Expected::AnyOf(failures))
        }
    }
}

/// Whether `value` has the primitive type `name` or is an instance of its wrapper
pub fn matches_type(value: &ArgValue, name: TypeName) -> bool {
    match name {
        TypeName::Object => is_strict_object(value),
        TypeName::String => {
            matches!(value, ArgValue::String(_)) || value.instance_of(builtin::string())
        }
        TypeName::Number => {
            matches!(value, ArgValue::Number(_)) || value.instance_of(builtin::number())
        }
        TypeName::Boolean => {
            matches!(value, ArgValue::Bool(_)) || value.instance_of(builtin::boolean())
        }
        TypeName::Array => value.instance_of(builtin::array()),
        TypeName::RegExp => value.instance_of(builtin::regexp()),
        TypeName::Function | TypeName::Undefined => value.type_of() == name.as_str(),
    }
}

/// Plain objects and class instances; never null, arrays, functions,
/// regexps or boxed primitives
pub fn is_strict_object(value: &ArgValue) -> bool {
    match value {
        ArgValue::Object(_) => true,
        ArgValue::Instance(instance) => {
            !instance.is_boxed_primitive()
                && !value.instance_of(builtin::array())
                && !value.instance_of(builtin::regexp())
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::Predicate;
    use crate::value::{ClassRef, Function};
    use std::collections::BTreeMap;

    fn string_spec() -> ValidatorSpec {
        ValidatorSpec::Type(TypeName::String)
    }

    #[test]
    fn test_wildcard_accepts_everything() {
        for value in [
            ArgValue::Undefined,
            ArgValue::Null,
            ArgValue::Object(BTreeMap::new()),
            ArgValue::Function(Function::new("f")),
        ] {
            assert!(check_one("foo", &value, &ValidatorSpec::Wildcard, false).is_ok());
        }
    }

    #[test]
    fn test_string_accepts_primitive_and_wrapper() {
        assert!(check_one("foo", &"str".into(), &string_spec(), false).is_ok());
        assert!(check_one("foo", &ArgValue::boxed_string("str"), &string_spec(), false).is_ok());
    }

    #[test]
    fn test_string_rejections() {
        let rejected = [
            ArgValue::Number(10.0),
            ArgValue::RegExp("regexp".into()),
            ArgValue::Object(BTreeMap::new()),
            ArgValue::Array(vec![]),
            ArgValue::Class(ClassRef::new("OtherClass")),
        ];
        for value in rejected {
            let err = check_one("foo", &value, &string_spec(), false).unwrap_err();
            assert_eq!(err.to_string(), "\"foo\" must be a string");
        }
    }

    #[test]
    fn test_plural_wording() {
        let err = check_one(
            "...foo",
            &"no".into(),
            &ValidatorSpec::Type(TypeName::Number),
            true,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "\"...foo\" must be numbers");
    }

    #[test]
    fn test_strict_object() {
        let object = ValidatorSpec::Type(TypeName::Object);
        let thing = ClassRef::new("Thing");
        assert!(check_one("qux", &ArgValue::Object(BTreeMap::new()), &object, false).is_ok());
        assert!(check_one("qux", &ArgValue::Instance(thing.instantiate()), &object, false).is_ok());
        for value in [
            ArgValue::Null,
            ArgValue::Array(vec![]),
            ArgValue::Function(Function::new("f")),
            ArgValue::RegExp("x".into()),
            ArgValue::boxed_number(1.0),
            "str".into(),
        ] {
            let err = check_one("qux", &value, &object, false).unwrap_err();
            assert_eq!(err.to_string(), "\"qux\" must be an object");
        }
    }

    #[test]
    fn test_function_type_accepts_classes() {
        let function = ValidatorSpec::Type(TypeName::Function);
        assert!(check_one("cb", &ArgValue::Function(Function::new("cb")), &function, false).is_ok());
        assert!(check_one("cb", &ArgValue::Class(ClassRef::new("Foo")), &function, false).is_ok());
        assert!(check_one("cb", &ArgValue::Null, &function, false).is_err());
    }

    #[test]
    fn test_class_check() {
        let some_class = ClassRef::new("SomeClass");
        let other_class = ClassRef::new("OtherClass");
        let spec = ValidatorSpec::Class(some_class.clone());

        assert!(check_one("foo", &some_class.instantiate().into(), &spec, false).is_ok());
        let err = check_one("foo", &other_class.instantiate().into(), &spec, false).unwrap_err();
        assert_eq!(err.to_string(), "\"foo\" must be an instance of \"SomeClass\"");
    }

    #[test]
    fn test_predicate_check() {
        let custom = Predicate::new("custom", |value| match value {
            ArgValue::Object(fields) if fields.get("custom") == Some(&ArgValue::Bool(true)) => {
                Ok(())
            }
            _ => Err("not custom".to_string()),
        });
        let spec = ValidatorSpec::Predicate(custom);

        let mut fields = BTreeMap::new();
        fields.insert("custom".to_string(), ArgValue::Bool(true));
        assert!(check_one("foo", &ArgValue::Object(fields), &spec, false).is_ok());

        let err = check_one("foo", &ArgValue::Number(10.0), &spec, false).unwrap_err();
        assert_eq!(err.to_string(), "\"foo\": not custom");
    }

    #[test]
    fn test_union_accepts_any_member() {
        let spec = ValidatorSpec::any_of([TypeName::String.into(), TypeName::Number.into()]);
        assert!(check_one("id", &"abc".into(), &spec, false).is_ok());
        assert!(check_one("id", &7.into(), &spec, false).is_ok());

        let err = check_one("id", &ArgValue::Null, &spec, false).unwrap_err();
        assert_eq!(err.to_string(), "\"id\" must be a string or a number");
    }

    #[test]
    fn test_nested_union_flattens() {
        let spec = ValidatorSpec::any_of([
            TypeName::String.into(),
            ValidatorSpec::any_of([TypeName::Number.into(), TypeName::Array.into()]),
        ]);
        let err = check_one("ids", &ArgValue::Bool(true), &spec, true).unwrap_err();
        assert_eq!(err.to_string(), "\"ids\" must be strings or numbers or arrays");
    }
}
