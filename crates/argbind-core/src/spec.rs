//! Validator specifications
//!
//! A [`ValidatorSpec`] says what a slot accepts. It is resolved once when the
//! schema is compiled, so matching never has to inspect raw schema input.
//!
//! Copyright (c) 2025 Argbind Team
//! Licensed under MIT OR Apache-2.0

use crate::value::{ArgValue, ClassRef};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Marker accepting any value
pub const WILDCARD: &str = "*";

/// Primitive type names a slot may require
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeName {
    String,
    Number,
    Boolean,
    Function,
    /// Strict object: no null, arrays, functions, regexps or boxed primitives
    Object,
    Array,
    RegExp,
    Undefined,
}

impl TypeName {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeName::String => "string",
            TypeName::Number => "number",
            TypeName::Boolean => "boolean",
            TypeName::Function => "function",
            TypeName::Object => "object",
            TypeName::Array => "array",
            TypeName::RegExp => "regexp",
            TypeName::Undefined => "undefined",
        }
    }

    pub fn all() -> [TypeName; 8] {
        [
            TypeName::String,
            TypeName::Number,
            TypeName::Boolean,
            TypeName::Function,
            TypeName::Object,
            TypeName::Array,
            TypeName::RegExp,
            TypeName::Undefined,
        ]
    }
}

impl FromStr for TypeName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeName::all()
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type PredicateFn = dyn Fn(&ArgValue) -> Result<(), String> + Send + Sync;

/// A named custom check
///
/// The function returns `Err(message)` to reject a value; the message is
/// reported prefixed with the slot label.
#[derive(Clone)]
pub struct Predicate {
    name: Arc<str>,
    check: Arc<PredicateFn>,
}

impl Predicate {
    pub fn new<F>(name: impl AsRef<str>, check: F) -> Self
    where
        F: Fn(&ArgValue) -> Result<(), String> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name.as_ref()),
            check: Arc::new(check),
        }
    }

    /// Build a predicate from a boolean test and a fixed rejection message
    pub fn from_test<F>(name: impl AsRef<str>, message: impl Into<String>, test: F) -> Self
    where
        F: Fn(&ArgValue) -> bool + Send + Sync + 'static,
    {
        let message = message.into();
        Self::new(name, move |value| {
            if test(value) {
                Ok(())
            } else {
                Err(message.clone())
            }
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn check(&self, value: &ArgValue) -> Result<(), String> {
        (self.check)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").field("name", &self.name).finish()
    }
}

impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.check, &other.check)
    }
}

/// What a schema slot accepts
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatorSpec {
    /// Any value
    Wildcard,
    /// A primitive type, or an instance of its wrapper class
    Type(TypeName),
    /// An instance of a class or subclass
    Class(ClassRef),
    /// A custom check
    Predicate(Predicate),
    /// At least one of the alternatives
    Union(Vec<ValidatorSpec>),
}

impl ValidatorSpec {
    /// Parse the string form: `*` or a primitive type name
    pub fn parse(s: &str) -> Result<Self, String> {
        if s == WILDCARD {
            Ok(ValidatorSpec::Wildcard)
        } else {
            s.parse().map(ValidatorSpec::Type)
        }
    }

    pub fn any_of(options: impl IntoIterator<Item = ValidatorSpec>) -> Self {
        ValidatorSpec::Union(options.into_iter().collect())
    }

    /// Short description used by `explain`
    pub fn describe(&self) -> String {
        match self {
            ValidatorSpec::Wildcard => WILDCARD.to_string(),
            ValidatorSpec::Type(name) => name.to_string(),
            ValidatorSpec::Class(class) => format!("instance of {}", class.name()),
            ValidatorSpec::Predicate(predicate) => format!("predicate {}", predicate.name()),
            ValidatorSpec::Union(options) => options
                .iter()
                .map(ValidatorSpec::describe)
                .collect::<Vec<_>>()
                .join(" | "),
        }
    }
}

impl From<TypeName> for ValidatorSpec {
    fn from(name: TypeName) -> Self {
        ValidatorSpec::Type(name)
    }
}

impl From<ClassRef> for ValidatorSpec {
    fn from(class: ClassRef) -> Self {
        ValidatorSpec::Class(class)
    }
}

impl From<&ClassRef> for ValidatorSpec {
    fn from(class: &ClassRef) -> Self {
        ValidatorSpec::Class(class.clone())
    }
}

impl From<Predicate> for ValidatorSpec {
    fn from(predicate: Predicate) -> Self {
        ValidatorSpec::Predicate(predicate)
    }
}

impl From<Vec<ValidatorSpec>> for ValidatorSpec {
    fn from(options: Vec<ValidatorSpec>) -> Self {
        ValidatorSpec::Union(options)
    }
}
