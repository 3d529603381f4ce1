//! Scenario tests for argument matching
//!
//! Each group runs a schema against a table of argument lists and compares
//! either the JSON-encoded bindings or the error message.

use argbind_core::{
    match_args, match_json, ArgValue, ClassRef, Error, ErrorKind, Function, Predicate, Registry,
    Schema, TypeName,
};
use serde_json::{json, Value};

const ABSENT: &str = r#"{"$undefined": true}"#;

fn absent() -> Value {
    serde_json::from_str(ABSENT).unwrap()
}

fn fn_ref() -> Value {
    json!({"$fn": "fn"})
}

fn bind(args: Value, schema: Value) -> Value {
    let registry = Registry::new();
    let bindings = match_json(&args, &schema, &registry)
        .unwrap_or_else(|e| panic!("expected {} to match, got: {}", args, e));
    serde_json::to_value(&bindings).unwrap()
}

fn bind_err(args: Value, schema: Value) -> String {
    let registry = Registry::new();
    match match_json(&args, &schema, &registry) {
        Ok(bindings) => panic!("expected {} to fail, got {:?}", args, bindings),
        Err(e) => e.to_string(),
    }
}

#[cfg(test)]
mod input_shape {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_args_must_be_array_like() {
        let err = bind_err(json!("invalidArg"), json!({}));
        assert_eq!(
            err,
            "\"args\" must be an array or array-like object (arguments)"
        );
    }

    #[test]
    fn test_schema_must_be_object() {
        let err = bind_err(json!({"length": 0}), json!("invalidArg"));
        assert_eq!(err, "\"validation\" must be an object");
    }

    #[test]
    fn test_shape_errors_have_their_own_kind() {
        let registry = Registry::new();
        let err = match_json(&json!(42), &json!({}), &registry).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputShape);
        let err = match_json(&json!([]), &json!([]), &registry).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputShape);
        let err = match_json(&json!([]), &json!({"[foo": "*"}), &registry).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaShape);
    }

    #[test]
    fn test_empty_schema_binds_nothing() {
        assert_eq!(bind(json!([1, 2, 3]), json!({})), json!({}));
    }
}

#[cfg(test)]
mod required_args {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_required() {
        assert_eq!(bind_err(json!([]), json!({"foo": "*"})), "\"foo\" is required");
    }

    #[test]
    fn test_wildcard_and_object() {
        assert_eq!(bind(json!([{}]), json!({"foo": "*"})), json!({"foo": {}}));
        assert_eq!(bind(json!([{}]), json!({"foo": "object"})), json!({"foo": {}}));
    }

    #[test]
    fn test_string_type() {
        assert_eq!(
            bind(json!(["str"]), json!({"foo": "string"})),
            json!({"foo": "str"})
        );
        assert_eq!(
            bind(
                json!([{"$new": "String", "$value": "str"}]),
                json!({"foo": "string"})
            ),
            json!({"foo": {"$new": "String", "$value": "str"}})
        );

        for args in [
            json!([10]),
            json!([{"$regexp": "regexp"}]),
            json!([{}]),
            json!([[]]),
        ] {
            assert_eq!(
                bind_err(args, json!({"foo": "string"})),
                "\"foo\" must be a string"
            );
        }
    }

    #[test]
    fn test_required_accepts_sentinel_only_through_validator() {
        assert_eq!(
            bind_err(json!([null]), json!({"foo": "string"})),
            "\"foo\" must be a string"
        );
        assert_eq!(bind(json!([null]), json!({"foo": "*"})), json!({"foo": null}));
    }
}

#[cfg(test)]
mod instance_and_custom_args {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_instance_of_class() {
        let some_class = ClassRef::new("SomeClass");
        let other_class = ClassRef::new("OtherClass");
        let schema = Schema::builder().arg("foo", &some_class).build().unwrap();

        let instance = ArgValue::from(some_class.instantiate());
        let bindings = match_args(std::slice::from_ref(&instance), &schema).unwrap();
        assert_eq!(bindings.value("foo"), Some(&instance));

        for value in [
            ArgValue::from(10),
            ArgValue::RegExp("regexp".into()),
            ArgValue::Object(Default::default()),
            ArgValue::Array(vec![]),
            ArgValue::from(other_class.clone()),
        ] {
            let err = match_args(&[value], &schema).unwrap_err();
            assert_eq!(err.to_string(), "\"foo\" must be an instance of \"SomeClass\"");
        }
    }

    #[test]
    fn test_instance_of_subclass_through_registry() {
        let mut registry = Registry::new();
        registry.declare_class("Animal", None).unwrap();
        registry.declare_class("Dog", Some("Animal")).unwrap();

        let bindings = match_json(
            &json!([{"$new": "Dog", "name": "rex"}]),
            &json!({"pet": {"class": "Animal"}}),
            &registry,
        )
        .unwrap();
        assert_eq!(
            serde_json::to_value(&bindings).unwrap(),
            json!({"pet": {"$new": "Dog", "name": "rex"}})
        );
    }

    #[test]
    fn test_custom_predicate() {
        let custom = Predicate::from_test("custom", "must be custom", |value| match value {
            ArgValue::Object(fields) => fields.get("custom") == Some(&ArgValue::Bool(true)),
            _ => false,
        });
        let mut registry = Registry::new();
        registry.register_predicate(custom);

        let bindings = match_json(
            &json!([{"custom": true}]),
            &json!({"foo": {"predicate": "custom"}}),
            &registry,
        )
        .unwrap();
        assert_eq!(
            serde_json::to_value(&bindings).unwrap(),
            json!({"foo": {"custom": true}})
        );

        for args in [json!([10]), json!([{}]), json!([[]])] {
            let err = match_json(&args, &json!({"foo": {"predicate": "custom"}}), &registry)
                .unwrap_err();
            assert_eq!(err.to_string(), "\"foo\": must be custom");
        }
    }

    #[test]
    fn test_union_reports_every_alternative() {
        let err = bind_err(json!([true]), json!({"id": ["string", "number"]}));
        assert_eq!(err, "\"id\" must be a string or a number");
        assert_eq!(
            bind(json!([7]), json!({"id": ["string", "number"]})),
            json!({"id": 7})
        );
    }
}

#[cfg(test)]
mod optional_args {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_optional() {
        let schema = json!({"[foo]": "string"});
        assert_eq!(bind(json!([]), schema.clone()), json!({"foo": absent()}));
        assert_eq!(bind(json!([null]), schema.clone()), json!({"foo": null}));
        assert_eq!(
            bind(json!([{"$undefined": true}]), schema.clone()),
            json!({"foo": absent()})
        );
        assert_eq!(bind(json!(["str"]), schema.clone()), json!({"foo": "str"}));
        assert_eq!(bind_err(json!([{}]), schema), "\"foo\" must be a string");
    }

    #[test]
    fn test_leading_optionals() {
        let schema = json!({"[foo]": "string", "[bar]": "string", "cb": "function"});
        let cases = [
            (json!([fn_ref()]), json!({"foo": absent(), "bar": absent(), "cb": fn_ref()})),
            (json!([fn_ref(), null]), json!({"foo": absent(), "bar": absent(), "cb": fn_ref()})),
            (
                json!([fn_ref(), absent()]),
                json!({"foo": absent(), "bar": absent(), "cb": fn_ref()}),
            ),
            (json!([null, fn_ref()]), json!({"foo": null, "bar": absent(), "cb": fn_ref()})),
            (
                json!([absent(), fn_ref()]),
                json!({"foo": absent(), "bar": absent(), "cb": fn_ref()}),
            ),
            (json!(["str", fn_ref()]), json!({"foo": "str", "bar": absent(), "cb": fn_ref()})),
        ];
        for (args, expected) in cases {
            assert_eq!(bind(args, schema.clone()), expected);
        }
    }

    #[test]
    fn test_leading_optional_errors() {
        let schema = json!({"[foo]": "string", "[bar]": "string", "cb": "function"});
        let cases = [
            (json!([]), "\"cb\" is required"),
            (json!([null]), "\"cb\" is required"),
            (json!([absent()]), "\"cb\" is required"),
            (json!(["str"]), "\"cb\" is required"),
            (json!(["str", null]), "\"cb\" is required"),
            (json!(["str", absent()]), "\"cb\" is required"),
            (json!(["str", {}]), "\"cb\" must be a function"),
            (json!(["str", {}, fn_ref()]), "\"bar\" must be a string"),
        ];
        for (args, expected) in cases {
            assert_eq!(bind_err(args, schema.clone()), expected);
        }
    }

    #[test]
    fn test_trailing_optional() {
        let schema = json!({"cb": "function", "[foo]": "number"});
        let cases = [
            (json!([fn_ref()]), json!({"cb": fn_ref(), "foo": absent()})),
            (json!([fn_ref(), null]), json!({"cb": fn_ref(), "foo": null})),
            (json!([fn_ref(), absent()]), json!({"cb": fn_ref(), "foo": absent()})),
            (json!([fn_ref(), 10]), json!({"cb": fn_ref(), "foo": 10})),
            (json!([fn_ref(), 10, null]), json!({"cb": fn_ref(), "foo": 10})),
            (json!([fn_ref(), 10, absent()]), json!({"cb": fn_ref(), "foo": 10})),
        ];
        for (args, expected) in cases {
            assert_eq!(bind(args, schema.clone()), expected);
        }
    }

    #[test]
    fn test_trailing_optional_mismatch_reported_at_end() {
        let err = bind_err(
            json!([fn_ref(), "ten"]),
            json!({"cb": "function", "[foo]": "number"}),
        );
        assert_eq!(err, "\"foo\" must be a number");
    }
}

#[cfg(test)]
mod spread_args {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_multiple_spread_rejected() {
        let registry = Registry::new();
        let err = match_json(
            &json!([]),
            &json!({"...foo": "number", "...bar": "function"}),
            &registry,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "only a single spread argument is supported");
        assert_eq!(
            err,
            Error::MultipleSpread {
                keys: vec!["...foo".into(), "...bar".into()]
            }
        );
    }

    #[test]
    fn test_optional_leading() {
        let schema = json!({"[...foo]": "number", "bar": "function"});
        let cases = [
            (json!([fn_ref()]), json!({"foo": [], "bar": fn_ref()})),
            (json!([null, fn_ref()]), json!({"foo": [], "bar": fn_ref()})),
            (json!([absent(), fn_ref()]), json!({"foo": [], "bar": fn_ref()})),
            (
                json!([absent(), absent(), absent(), fn_ref()]),
                json!({"foo": [], "bar": fn_ref()}),
            ),
            (json!([10, fn_ref()]), json!({"foo": [10], "bar": fn_ref()})),
            (json!([10, 10, fn_ref()]), json!({"foo": [10, 10], "bar": fn_ref()})),
            (
                json!([10, 10, 10, fn_ref()]),
                json!({"foo": [10, 10, 10], "bar": fn_ref()}),
            ),
        ];
        for (args, expected) in cases {
            assert_eq!(bind(args, schema.clone()), expected);
        }
    }

    #[test]
    fn test_optional_leading_errors() {
        let schema = json!({"[qux]": "object", "[...foo]": "number", "bar": "function"});
        let cases = [
            (json!([null, null, "no"]), "\"bar\" must be a function"),
            (json!(["no", fn_ref()]), "\"qux\" must be an object"),
            (json!([{}, 10, "no"]), "\"bar\" must be a function"),
            (json!([{}, 10, 10, "no"]), "\"bar\" must be a function"),
            (json!([{}, 10, "no", fn_ref()]), "\"...foo\" must be numbers"),
        ];
        for (args, expected) in cases {
            assert_eq!(bind_err(args, schema.clone()), expected);
        }
    }

    #[test]
    fn test_optional_trailing() {
        let schema = json!({"foo": "function", "[...bar]": "number"});
        let cases = [
            (json!([fn_ref()]), json!({"foo": fn_ref(), "bar": []})),
            (json!([fn_ref(), null]), json!({"foo": fn_ref(), "bar": []})),
            (json!([fn_ref(), absent()]), json!({"foo": fn_ref(), "bar": []})),
            (
                json!([fn_ref(), absent(), absent(), absent()]),
                json!({"foo": fn_ref(), "bar": []}),
            ),
            (json!([fn_ref(), 10]), json!({"foo": fn_ref(), "bar": [10]})),
            (json!([fn_ref(), 10, 10]), json!({"foo": fn_ref(), "bar": [10, 10]})),
            (
                json!([fn_ref(), 10, 10, 10]),
                json!({"foo": fn_ref(), "bar": [10, 10, 10]}),
            ),
        ];
        for (args, expected) in cases {
            assert_eq!(bind(args, schema.clone()), expected);
        }
    }

    #[test]
    fn test_optional_trailing_errors() {
        let schema = json!({"foo": "string", "[...bar]": "number"});
        let cases = [
            (json!([null]), "\"foo\" must be a string"),
            (json!([absent()]), "\"foo\" must be a string"),
            (json!([null, 10]), "\"foo\" must be a string"),
            (json!([absent(), 10]), "\"foo\" must be a string"),
            (json!(["yes", "no"]), "\"...bar\" must be numbers"),
            (json!(["yes", null, "no"]), "\"...bar\" must be numbers"),
            (json!(["yes", absent(), "no"]), "\"...bar\" must be numbers"),
        ];
        for (args, expected) in cases {
            assert_eq!(bind_err(args, schema.clone()), expected);
        }
    }

    #[test]
    fn test_required_leading() {
        let schema = json!({"...foo": "number", "bar": "function"});
        for width in 1..=4 {
            let mut args = vec![json!(10); width];
            args.push(fn_ref());
            assert_eq!(
                bind(Value::Array(args), schema.clone()),
                json!({"foo": vec![10; width], "bar": fn_ref()})
            );
        }
    }

    #[test]
    fn test_required_leading_errors() {
        let schema = json!({"[qux]": "object", "...foo": "number", "bar": "function"});
        let cases = [
            (json!([{}, fn_ref()]), "\"...foo\" is required"),
            (json!([{}, 10, "no"]), "\"bar\" must be a function"),
            (json!(["str", 10, fn_ref()]), "\"qux\" must be an object"),
            (json!([{}, 10, 10, "no"]), "\"bar\" must be a function"),
            (json!([{}, 10, "no", fn_ref()]), "\"...foo\" must be numbers"),
        ];
        for (args, expected) in cases {
            assert_eq!(bind_err(args, schema.clone()), expected);
        }
    }

    #[test]
    fn test_required_trailing() {
        let schema = json!({"foo": "function", "...bar": "number"});
        for width in 1..=4 {
            let mut args = vec![fn_ref()];
            args.extend(std::iter::repeat(json!(10)).take(width));
            assert_eq!(
                bind(Value::Array(args), schema.clone()),
                json!({"foo": fn_ref(), "bar": vec![10; width]})
            );
        }
        assert_eq!(
            bind_err(json!([fn_ref()]), schema),
            "\"...bar\" is required"
        );
    }

    #[test]
    fn test_required_spread_errors() {
        let schema = json!({"...foo": "number", "bar": "function"});
        let cases = [
            (json!([fn_ref()]), "\"...foo\" is required"),
            (json!([10, "no"]), "\"bar\" must be a function"),
            (json!([10, 10, "no"]), "\"bar\" must be a function"),
            (json!([10, "no", fn_ref()]), "\"...foo\" must be numbers"),
            // Width is 2 - 1 = 1, so `{}` is checked rather than left unconsumed
            (json!([{}, fn_ref()]), "\"...foo\" must be numbers"),
        ];
        for (args, expected) in cases {
            assert_eq!(bind_err(args, schema.clone()), expected);
        }
    }

    #[test]
    fn test_spread_of_instances_uses_plural_wording() {
        let buffer = ClassRef::new("Buffer");
        let schema = Schema::builder()
            .arg("...chunks", &buffer)
            .arg("cb", TypeName::Function)
            .build()
            .unwrap();
        let args = vec![
            ArgValue::from(buffer.instantiate()),
            ArgValue::from("nope"),
            ArgValue::from(Function::new("cb")),
        ];
        let err = schema.bind(&args).unwrap_err();
        assert_eq!(err.to_string(), "\"...chunks\" must be instances of \"Buffer\"");
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }
}

#[cfg(test)]
mod array_like_args {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_arguments_object() {
        let args = json!({"length": 2, "0": "a", "1": fn_ref()});
        assert_eq!(
            bind(args, json!({"name": "string", "cb": "function"})),
            json!({"name": "a", "cb": fn_ref()})
        );
    }

    #[test]
    fn test_holes_decode_as_undefined() {
        let args = json!({"length": 2, "1": fn_ref()});
        assert_eq!(
            bind(args, json!({"[name]": "string", "cb": "function"})),
            json!({"name": absent(), "cb": fn_ref()})
        );
    }

    #[test]
    fn test_integral_float_length() {
        let args = json!({"length": 2.0, "0": 1, "1": 2});
        assert_eq!(bind(args, json!({"...n": "number"})), json!({"n": [1, 2]}));
    }

    #[test]
    fn test_negative_length_is_empty() {
        let args = json!({"length": -1, "0": 1});
        assert_eq!(bind(args, json!({"[n]": "number"})), json!({"n": absent()}));
    }

    #[test]
    fn test_bad_length_is_reported_before_schema_errors() {
        let schema = json!({"...a": "*", "...b": "*"});
        for args in [
            json!({"length": "x"}),
            json!({"length": true}),
            json!({"length": 1_000_000_000u64}),
        ] {
            let err = match_json(&args, &schema, &Registry::new()).unwrap_err();
            assert_eq!(err, Error::InvalidArgs, "args: {}", args);
        }
    }

    #[test]
    fn test_oversized_length_is_rejected() {
        let args = json!({"length": 1_000_000_000u64, "0": 1});
        assert_eq!(
            bind_err(args, json!({"a": "*"})),
            "\"args\" must be an array or array-like object (arguments)"
        );
    }
}
