//! JSON encoding of argument values
//!
//! Plain JSON maps directly onto [`ArgValue`]. Values JSON cannot express are
//! written as tagged objects:
//!
//! - `{"$undefined": true}`
//! - `{"$fn": "name"}`: a function; equal names decode to the same function
//!   within one document
//! - `{"$class": "Name"}`: a class resolved through the [`Registry`]
//! - `{"$regexp": "pattern"}`
//! - `{"$new": "Name", "$value": <primitive>, ...fields}`: an instance,
//!   optionally wrapping a primitive
//!
//! Copyright (c) 2025 Argbind Team
//! Licensed under MIT OR Apache-2.0

use crate::error::{Error, Result};
use crate::matcher::{Binding, Bindings};
use crate::registry::Registry;
use crate::value::{ArgValue, Function, Instance};
use regex::Regex;
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::collections::{BTreeMap, HashMap};

const TAG_UNDEFINED: &str = "$undefined";
const TAG_FUNCTION: &str = "$fn";
const TAG_CLASS: &str = "$class";
const TAG_REGEXP: &str = "$regexp";
const TAG_NEW: &str = "$new";
const TAG_VALUE: &str = "$value";

/// Longest argument list an array-like object may declare
pub const MAX_ARRAY_LIKE_LENGTH: usize = 1 << 16;

/// Number of values in a JSON argument list, or `None` if it is not one
///
/// Arrays count their items. An array-like object needs a numeric `length`:
/// fractions truncate, zero or negative lengths give an empty list, and
/// lengths above [`MAX_ARRAY_LIKE_LENGTH`] are rejected.
pub fn array_like_length(value: &Value) -> Option<usize> {
    match value {
        Value::Array(items) => Some(items.len()),
        Value::Object(map) => {
            let length = map.get("length")?.as_f64()?.trunc();
            if length <= 0.0 {
                Some(0)
            } else if length > MAX_ARRAY_LIKE_LENGTH as f64 {
                None
            } else {
                Some(length as usize)
            }
        }
        _ => None,
    }
}

/// Decode a JSON argument list
///
/// Accepts an array or an array-like object with a `length` and index keys;
/// missing indices decode as `Undefined`.
pub fn args_from_json(value: &Value, registry: &Registry) -> Result<Vec<ArgValue>> {
    let length = array_like_length(value).ok_or(Error::InvalidArgs)?;
    let mut decoder = Decoder::new(registry);
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| decoder.decode(item, &format!("$[{}]", i)))
            .collect(),
        Value::Object(map) => (0..length)
            .map(|i| match map.get(&i.to_string()) {
                Some(item) => decoder.decode(item, &format!("$[{}]", i)),
                None => Ok(ArgValue::Undefined),
            })
            .collect(),
        _ => Err(Error::InvalidArgs),
    }
}

/// Decode a single JSON value
pub fn value_from_json(value: &Value, registry: &Registry) -> Result<ArgValue> {
    Decoder::new(registry).decode(value, "$")
}

struct Decoder<'r> {
    registry: &'r Registry,
    functions: HashMap<String, Function>,
}

impl<'r> Decoder<'r> {
    fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            functions: HashMap::new(),
        }
    }

    fn decode(&mut self, value: &Value, path: &str) -> Result<ArgValue> {
        match value {
            Value::Null => Ok(ArgValue::Null),
            Value::Bool(b) => Ok(ArgValue::Bool(*b)),
            Value::Number(n) => n
                .as_f64()
                .map(ArgValue::Number)
                .ok_or_else(|| Error::decode(path, format!("number {} is out of range", n))),
            Value::String(s) => Ok(ArgValue::String(s.clone())),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| self.decode(item, &format!("{}[{}]", path, i)))
                .collect::<Result<Vec<_>>>()
                .map(ArgValue::Array),
            Value::Object(map) => self.decode_object(map, path),
        }
    }

    fn decode_object(&mut self, map: &Map<String, Value>, path: &str) -> Result<ArgValue> {
        if map.contains_key(TAG_UNDEFINED) {
            return match (map.len(), map.get(TAG_UNDEFINED)) {
                (1, Some(Value::Bool(true))) => Ok(ArgValue::Undefined),
                _ => Err(Error::decode(path, "expected {\"$undefined\": true}")),
            };
        }
        if let Some(tag) = map.get(TAG_FUNCTION) {
            let name = sole_string(map, tag, TAG_FUNCTION, path)?;
            let function = self
                .functions
                .entry(name.to_string())
                .or_insert_with(|| Function::new(name))
                .clone();
            return Ok(ArgValue::Function(function));
        }
        if let Some(tag) = map.get(TAG_CLASS) {
            let name = sole_string(map, tag, TAG_CLASS, path)?;
            let class = self.lookup_class(name, path)?;
            return Ok(ArgValue::Class(class));
        }
        if let Some(tag) = map.get(TAG_REGEXP) {
            let pattern = sole_string(map, tag, TAG_REGEXP, path)?;
            Regex::new(pattern)
                .map_err(|e| Error::decode(path, format!("invalid regular expression: {}", e)))?;
            return Ok(ArgValue::RegExp(pattern.to_string()));
        }
        if let Some(tag) = map.get(TAG_NEW) {
            let name = tag
                .as_str()
                .ok_or_else(|| Error::decode(path, "\"$new\" must name a class"))?;
            let mut instance = Instance::new(self.lookup_class(name, path)?);
            for (key, field) in map {
                match key.as_str() {
                    TAG_NEW => {}
                    TAG_VALUE => {
                        let primitive = self.decode(field, &format!("{}.{}", path, key))?;
                        instance.primitive = Some(Box::new(primitive));
                    }
                    _ => {
                        let decoded = self.decode(field, &format!("{}.{}", path, key))?;
                        instance.fields.insert(key.clone(), decoded);
                    }
                }
            }
            return Ok(ArgValue::Instance(instance));
        }

        let mut fields = BTreeMap::new();
        for (key, field) in map {
            fields.insert(key.clone(), self.decode(field, &format!("{}.{}", path, key))?);
        }
        Ok(ArgValue::Object(fields))
    }

    fn lookup_class(&self, name: &str, path: &str) -> Result<crate::value::ClassRef> {
        self.registry
            .class(name)
            .cloned()
            .ok_or_else(|| Error::decode(path, format!("unknown class \"{}\"", name)))
    }
}

fn sole_string<'v>(
    map: &Map<String, Value>,
    tag: &'v Value,
    tag_name: &str,
    path: &str,
) -> Result<&'v str> {
    match tag.as_str() {
        Some(s) if map.len() == 1 => Ok(s),
        _ => Err(Error::decode(
            path,
            format!("expected {{\"{}\": <string>}}", tag_name),
        )),
    }
}

/// Encode a value using the same tagged forms the decoder accepts
pub fn value_to_json(value: &ArgValue) -> Value {
    match value {
        ArgValue::Undefined => tagged(TAG_UNDEFINED, Value::Bool(true)),
        ArgValue::Null => Value::Null,
        ArgValue::Bool(b) => Value::Bool(*b),
        ArgValue::Number(n) => number_to_json(*n),
        ArgValue::String(s) => Value::String(s.clone()),
        ArgValue::Array(items) => Value::Array(items.iter().map(value_to_json).collect()),
        ArgValue::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(key, field)| (key.clone(), value_to_json(field)))
                .collect(),
        ),
        ArgValue::RegExp(pattern) => tagged(TAG_REGEXP, Value::String(pattern.clone())),
        ArgValue::Function(function) => {
            tagged(TAG_FUNCTION, Value::String(function.name().to_string()))
        }
        ArgValue::Class(class) => tagged(TAG_CLASS, Value::String(class.name().to_string())),
        ArgValue::Instance(instance) => {
            let mut map = Map::new();
            map.insert(
                TAG_NEW.to_string(),
                Value::String(instance.class.name().to_string()),
            );
            if let Some(primitive) = &instance.primitive {
                map.insert(TAG_VALUE.to_string(), value_to_json(primitive));
            }
            for (key, field) in &instance.fields {
                map.insert(key.clone(), value_to_json(field));
            }
            Value::Object(map)
        }
    }
}

/// Encode bindings as an object keyed by output name
///
/// Absent optionals encode as `{"$undefined": true}`.
pub fn bindings_to_json(bindings: &Bindings) -> Value {
    Value::Object(
        bindings
            .iter()
            .map(|(name, binding)| (name.to_string(), binding_to_json(binding)))
            .collect(),
    )
}

pub fn binding_to_json(binding: &Binding) -> Value {
    match binding {
        Binding::Absent => value_to_json(&ArgValue::Undefined),
        Binding::Value(value) => value_to_json(value),
        Binding::Spread(values) => Value::Array(values.iter().map(value_to_json).collect()),
    }
}

fn tagged(tag: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(tag.to_string(), value);
    Value::Object(map)
}

fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

impl Serialize for ArgValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        value_to_json(self).serialize(serializer)
    }
}

impl Serialize for Binding {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        binding_to_json(self).serialize(serializer)
    }
}

impl Serialize for Bindings {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        bindings_to_json(self).serialize(serializer)
    }
}
