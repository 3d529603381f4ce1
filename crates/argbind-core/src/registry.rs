//! Named classes and predicates
//!
//! JSON schemas and tagged argument values refer to classes and predicates by
//! name. A [`Registry`] resolves those names; it starts out with the built-in
//! wrapper classes and a few common predicates.
//!
//! Copyright (c) 2025 Argbind Team
//! Licensed under MIT OR Apache-2.0

use crate::error::{Error, Result};
use crate::spec::Predicate;
use crate::value::{builtin, ArgValue, ClassRef};
use std::collections::HashMap;

/// Lookup table for class and predicate names
#[derive(Debug, Clone)]
pub struct Registry {
    classes: HashMap<String, ClassRef>,
    predicates: HashMap<String, Predicate>,
}

impl Registry {
    /// Create a registry with the built-in classes and predicates
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for class in builtin::all() {
            registry.register_class(class.clone());
        }
        for predicate in builtin_predicates() {
            registry.register_predicate(predicate);
        }
        registry
    }

    /// Create a registry with nothing in it
    pub fn empty() -> Self {
        Self {
            classes: HashMap::new(),
            predicates: HashMap::new(),
        }
    }

    /// Register an existing class under its own name
    pub fn register_class(&mut self, class: ClassRef) {
        self.classes.insert(class.name().to_string(), class);
    }

    /// Declare a class by name, optionally extending a known class
    pub fn declare_class(&mut self, name: &str, parent: Option<&str>) -> Result<ClassRef> {
        let class = match parent {
            Some(parent_name) => {
                let parent = self.class(parent_name).ok_or_else(|| Error::UnknownClass {
                    key: name.to_string(),
                    name: parent_name.to_string(),
                })?;
                ClassRef::extending(name, parent)
            }
            None => ClassRef::new(name),
        };
        self.register_class(class.clone());
        Ok(class)
    }

    /// Declare several classes whose parents may appear in any order
    ///
    /// Fails if a parent is never declared or the declarations form a cycle.
    pub fn declare_classes<'a, I>(&mut self, declarations: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    {
        let mut pending: Vec<(&str, Option<&str>)> = declarations.into_iter().collect();
        while !pending.is_empty() {
            let before = pending.len();
            let mut deferred = Vec::new();
            for (name, parent) in pending {
                match parent {
                    Some(parent_name) if !self.has_class(parent_name) => {
                        deferred.push((name, parent))
                    }
                    _ => {
                        self.declare_class(name, parent)?;
                    }
                }
            }
            if deferred.len() == before {
                let (name, parent) = deferred[0];
                return Err(Error::UnknownClass {
                    key: name.to_string(),
                    name: parent.unwrap_or_default().to_string(),
                });
            }
            pending = deferred;
        }
        Ok(())
    }

    pub fn register_predicate(&mut self, predicate: Predicate) {
        self.predicates.insert(predicate.name().to_string(), predicate);
    }

    pub fn class(&self, name: &str) -> Option<&ClassRef> {
        self.classes.get(name)
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn predicate(&self, name: &str) -> Option<&Predicate> {
        self.predicates.get(name)
    }

    /// Sorted class names
    pub fn class_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.classes.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    /// Sorted predicate names
    pub fn predicate_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.predicates.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

fn builtin_predicates() -> Vec<Predicate> {
    vec![
        Predicate::from_test("integer", "must be an integer", |value| {
            value.as_f64().is_some_and(|n| n.is_finite() && n.fract() == 0.0)
        }),
        Predicate::from_test("finite", "must be a finite number", |value| {
            value.as_f64().is_some_and(f64::is_finite)
        }),
        Predicate::from_test("non_empty", "must not be empty", |value| match value {
            ArgValue::String(s) => !s.is_empty(),
            ArgValue::Array(items) => !items.is_empty(),
            ArgValue::Object(fields) => !fields.is_empty(),
            _ => false,
        }),
    ]
}
