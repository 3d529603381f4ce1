//! Schema compilation
//!
//! A schema is an ordered list of surface keys, each paired with a validator.
//! The key syntax encodes how many values a slot takes:
//!
//! | key        | kind             | destructured name |
//! |------------|------------------|-------------------|
//! | `foo`      | `Required`       | `foo`             |
//! | `[foo]`    | `Optional`       | `foo`             |
//! | `...foo`   | `SpreadRequired` | `foo`             |
//! | `[...foo]` | `SpreadOptional` | `foo`             |
//!
//! Keys are parsed once, here. The matcher only ever sees [`Slot`]s.
//!
//! Copyright (c) 2025 Argbind Team
//! Licensed under MIT OR Apache-2.0

use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::spec::{TypeName, ValidatorSpec, WILDCARD};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

const SPREAD_PREFIX: &str = "...";

/// How many values a slot consumes and whether it may go unfilled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SlotKind {
    Required,
    Optional,
    SpreadRequired,
    SpreadOptional,
}

impl SlotKind {
    pub fn is_spread(self) -> bool {
        matches!(self, SlotKind::SpreadRequired | SlotKind::SpreadOptional)
    }

    pub fn is_optional(self) -> bool {
        matches!(self, SlotKind::Optional | SlotKind::SpreadOptional)
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SlotKind::Required => "required",
            SlotKind::Optional => "optional",
            SlotKind::SpreadRequired => "spread",
            SlotKind::SpreadOptional => "optional spread",
        };
        f.write_str(s)
    }
}

/// Classify a surface key and extract its destructured name
pub fn parse_key(key: &str) -> Result<(SlotKind, String)> {
    let malformed = || Error::MalformedKey {
        key: key.to_string(),
    };

    let (optional, inner) = match key.strip_prefix('[') {
        Some(rest) => (true, rest.strip_suffix(']').ok_or_else(malformed)?),
        None => (false, key),
    };
    let (spread, name) = match inner.strip_prefix(SPREAD_PREFIX) {
        Some(rest) => (true, rest),
        None => (false, inner),
    };

    if name.is_empty() || name.contains(['[', ']']) || name.starts_with('.') {
        return Err(malformed());
    }

    let kind = match (optional, spread) {
        (false, false) => SlotKind::Required,
        (true, false) => SlotKind::Optional,
        (false, true) => SlotKind::SpreadRequired,
        (true, true) => SlotKind::SpreadOptional,
    };
    Ok((kind, name.to_string()))
}

/// One compiled schema key
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    /// Surface key as written in the schema
    pub key: String,
    pub kind: SlotKind,
    /// Destructured output name
    pub name: String,
    pub validator: ValidatorSpec,
}

impl Slot {
    pub fn new(key: impl Into<String>, validator: ValidatorSpec) -> Result<Self> {
        let key = key.into();
        let (kind, name) = parse_key(&key)?;
        Ok(Self {
            key,
            kind,
            name,
            validator,
        })
    }

    /// Name used in error messages: `...name` for spread slots
    pub fn label(&self) -> String {
        if self.kind.is_spread() {
            format!("{}{}", SPREAD_PREFIX, self.name)
        } else {
            self.name.clone()
        }
    }
}

/// An ordered, compiled argument schema
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    slots: Vec<Slot>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Compile already-parsed slots, enforcing the schema invariants
    pub fn from_slots(slots: Vec<Slot>) -> Result<Self> {
        let spread_keys: Vec<String> = slots
            .iter()
            .filter(|slot| slot.kind.is_spread())
            .map(|slot| slot.key.clone())
            .collect();
        if spread_keys.len() > 1 {
            return Err(Error::MultipleSpread { keys: spread_keys });
        }

        {
            let mut seen = HashSet::new();
            for slot in &slots {
                if !seen.insert(slot.name.as_str()) {
                    return Err(Error::DuplicateName {
                        name: slot.name.clone(),
                    });
                }
            }
        }

        debug!(slots = slots.len(), "compiled argument schema");
        Ok(Self { slots })
    }

    /// Compile a JSON schema object, resolving names through `registry`
    ///
    /// Keys are taken in document order.
    pub fn from_json(value: &Value, registry: &Registry) -> Result<Self> {
        let object = value.as_object().ok_or(Error::InvalidSchema)?;

        let spread_keys: Vec<String> = object
            .keys()
            .filter(|key| parse_key(key).is_ok_and(|(kind, _)| kind.is_spread()))
            .cloned()
            .collect();
        if spread_keys.len() > 1 {
            return Err(Error::MultipleSpread { keys: spread_keys });
        }

        let slots = object
            .iter()
            .map(|(key, spec)| Slot::new(key.as_str(), spec_from_json(key, spec, registry)?))
            .collect::<Result<Vec<_>>>()?;
        Self::from_slots(slots)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn spread_slot(&self) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.kind.is_spread())
    }
}

/// Resolve one validator from its JSON form
///
/// `"*"` and type names are strings, unions are arrays, and classes and
/// predicates are `{"class": name}` / `{"predicate": name}` references.
pub fn spec_from_json(key: &str, value: &Value, registry: &Registry) -> Result<ValidatorSpec> {
    let invalid = || Error::InvalidValidator {
        key: key.to_string(),
    };

    match value {
        Value::String(s) if s == WILDCARD => Ok(ValidatorSpec::Wildcard),
        Value::String(s) => s
            .parse::<TypeName>()
            .map(ValidatorSpec::Type)
            .map_err(|name| Error::UnknownType {
                key: key.to_string(),
                name,
            }),
        Value::Array(options) => options
            .iter()
            .map(|option| spec_from_json(key, option, registry))
            .collect::<Result<Vec<_>>>()
            .map(ValidatorSpec::Union),
        Value::Object(reference) if reference.len() == 1 => {
            if let Some(name) = reference.get("class").and_then(Value::as_str) {
                let class = registry.class(name).ok_or_else(|| Error::UnknownClass {
                    key: key.to_string(),
                    name: name.to_string(),
                })?;
                Ok(ValidatorSpec::Class(class.clone()))
            } else if let Some(name) = reference.get("predicate").and_then(Value::as_str) {
                let predicate = registry
                    .predicate(name)
                    .ok_or_else(|| Error::UnknownPredicate {
                        key: key.to_string(),
                        name: name.to_string(),
                    })?;
                Ok(ValidatorSpec::Predicate(predicate.clone()))
            } else {
                Err(invalid())
            }
        }
        _ => Err(invalid()),
    }
}

/// Builder for creating schemas programmatically
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    entries: Vec<(String, ValidatorSpec)>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a key; order of calls is matching order
    pub fn arg(mut self, key: impl Into<String>, validator: impl Into<ValidatorSpec>) -> Self {
        self.entries.push((key.into(), validator.into()));
        self
    }

    /// Append a key accepting any value
    pub fn any(self, key: impl Into<String>) -> Self {
        self.arg(key, ValidatorSpec::Wildcard)
    }

    pub fn build(self) -> Result<Schema> {
        let spread_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(key, _)| parse_key(key).is_ok_and(|(kind, _)| kind.is_spread()))
            .map(|(key, _)| key.clone())
            .collect();
        if spread_keys.len() > 1 {
            return Err(Error::MultipleSpread { keys: spread_keys });
        }

        let slots = self
            .entries
            .into_iter()
            .map(|(key, validator)| Slot::new(key, validator))
            .collect::<Result<Vec<_>>>()?;
        Schema::from_slots(slots)
    }
}
