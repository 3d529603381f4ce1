//! Dynamic argument values
//!
//! Argument lists handed to the matcher are loosely typed: a single call may
//! mix strings, numbers, callbacks and class instances. `ArgValue` is the
//! closed set of shapes such a list can contain, together with the two
//! "does not exist" sentinels (`Undefined` and `Null`).
//!
//! Copyright (c) 2025 Argbind Team
//! Licensed under MIT OR Apache-2.0

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// A single positional argument value
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// Missing value marker
    Undefined,
    /// Explicit null marker
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<ArgValue>),
    /// Plain object with fields in key order
    Object(BTreeMap<String, ArgValue>),
    /// Regular expression literal, kept as its source pattern
    RegExp(String),
    Function(Function),
    Class(ClassRef),
    Instance(Instance),
}

impl ArgValue {
    /// Whether the value is present (neither `Undefined` nor `Null`)
    pub fn exists(&self) -> bool {
        !matches!(self, ArgValue::Undefined | ArgValue::Null)
    }

    /// The dynamic type tag of the value, as reported by `typeof`
    pub fn type_of(&self) -> &'static str {
        match self {
            ArgValue::Undefined => "undefined",
            ArgValue::Bool(_) => "boolean",
            ArgValue::Number(_) => "number",
            ArgValue::String(_) => "string",
            ArgValue::Function(_) | ArgValue::Class(_) => "function",
            ArgValue::Null
            | ArgValue::Array(_)
            | ArgValue::Object(_)
            | ArgValue::RegExp(_)
            | ArgValue::Instance(_) => "object",
        }
    }

    /// Whether the value is an instance of `class` or one of its subclasses
    ///
    /// Arrays and regular expressions count as instances of the built-in
    /// `Array` and `RegExp` classes. Primitives are never instances.
    pub fn instance_of(&self, class: &ClassRef) -> bool {
        match self {
            ArgValue::Instance(instance) => instance.class.is_subclass_of(class),
            ArgValue::Array(_) => class == builtin::array(),
            ArgValue::RegExp(_) => class == builtin::regexp(),
            _ => false,
        }
    }

    /// Wrap a string primitive in a `String` instance
    pub fn boxed_string(value: impl Into<String>) -> Self {
        ArgValue::Instance(Instance::boxed(
            builtin::string().clone(),
            ArgValue::String(value.into()),
        ))
    }

    /// Wrap a number primitive in a `Number` instance
    pub fn boxed_number(value: f64) -> Self {
        ArgValue::Instance(Instance::boxed(
            builtin::number().clone(),
            ArgValue::Number(value),
        ))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ArgValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            ArgValue::Function(f) => Some(f),
            _ => None,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Undefined => write!(f, "undefined"),
            ArgValue::Null => write!(f, "null"),
            ArgValue::Bool(b) => write!(f, "{}", b),
            ArgValue::Number(n) => write!(f, "{}", n),
            ArgValue::String(s) => write!(f, "{:?}", s),
            ArgValue::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            ArgValue::Object(fields) => {
                write!(f, "{{")?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {}: {}", key, value)?;
                }
                if fields.is_empty() {
                    write!(f, "}}")
                } else {
                    write!(f, " }}")
                }
            }
            ArgValue::RegExp(pattern) => write!(f, "/{}/", pattern),
            ArgValue::Function(func) => write!(f, "[Function: {}]", func.name()),
            ArgValue::Class(class) => write!(f, "[class {}]", class.name()),
            ArgValue::Instance(instance) => match &instance.primitive {
                Some(inner) => write!(f, "[{}: {}]", instance.class.name(), inner),
                None => write!(f, "{} {{..}}", instance.class.name()),
            },
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::String(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::String(value)
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        ArgValue::Number(value)
    }
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        ArgValue::Number(f64::from(value))
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Bool(value)
    }
}

impl From<Function> for ArgValue {
    fn from(value: Function) -> Self {
        ArgValue::Function(value)
    }
}

impl From<ClassRef> for ArgValue {
    fn from(value: ClassRef) -> Self {
        ArgValue::Class(value)
    }
}

impl From<Instance> for ArgValue {
    fn from(value: Instance) -> Self {
        ArgValue::Instance(value)
    }
}

impl From<Vec<ArgValue>> for ArgValue {
    fn from(value: Vec<ArgValue>) -> Self {
        ArgValue::Array(value)
    }
}

/// A callable value. Two functions are equal only if they are the same function.
#[derive(Debug, Clone)]
pub struct Function {
    id: u64,
    name: Arc<str>,
}

impl Function {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            id: next_id(),
            name: Arc::from(name.as_ref()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Function {}

#[derive(Debug)]
struct ClassDef {
    id: u64,
    name: String,
    parent: Option<ClassRef>,
}

/// Shared handle to a class definition
///
/// Classes compare by identity, so two classes declared with the same name
/// are still distinct.
#[derive(Debug, Clone)]
pub struct ClassRef(Arc<ClassDef>);

impl ClassRef {
    /// Declare a new root class
    pub fn new(name: impl Into<String>) -> Self {
        Self(Arc::new(ClassDef {
            id: next_id(),
            name: name.into(),
            parent: None,
        }))
    }

    /// Declare a new class extending `parent`
    pub fn extending(name: impl Into<String>, parent: &ClassRef) -> Self {
        Self(Arc::new(ClassDef {
            id: next_id(),
            name: name.into(),
            parent: Some(parent.clone()),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn parent(&self) -> Option<&ClassRef> {
        self.0.parent.as_ref()
    }

    /// Whether `self` is `other` or inherits from it
    pub fn is_subclass_of(&self, other: &ClassRef) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if class == other {
                return true;
            }
            current = class.parent();
        }
        false
    }

    /// Construct an instance with no fields
    pub fn instantiate(&self) -> Instance {
        Instance::new(self.clone())
    }
}

impl PartialEq for ClassRef {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for ClassRef {}

/// An object constructed from a class
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub class: ClassRef,
    /// Wrapped primitive for boxed values such as `new String("x")`
    pub primitive: Option<Box<ArgValue>>,
    pub fields: BTreeMap<String, ArgValue>,
}

impl Instance {
    pub fn new(class: ClassRef) -> Self {
        Self {
            class,
            primitive: None,
            fields: BTreeMap::new(),
        }
    }

    pub fn boxed(class: ClassRef, primitive: ArgValue) -> Self {
        Self {
            class,
            primitive: Some(Box::new(primitive)),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Whether this instance wraps a primitive (string, number or boolean)
    pub fn is_boxed_primitive(&self) -> bool {
        self.primitive.is_some()
    }
}

/// Built-in classes backing the wrapper and container types
pub mod builtin {
    use super::{ClassRef, OnceLock};

    macro_rules! builtin_class {
        ($fn_name:ident, $name:literal) => {
            pub fn $fn_name() -> &'static ClassRef {
                static CLASS: OnceLock<ClassRef> = OnceLock::new();
                CLASS.get_or_init(|| ClassRef::new($name))
            }
        };
    }

    builtin_class!(string, "String");
    builtin_class!(number, "Number");
    builtin_class!(boolean, "Boolean");
    builtin_class!(array, "Array");
    builtin_class!(regexp, "RegExp");

    /// All built-in classes, in registration order
    pub fn all() -> [&'static ClassRef; 5] {
        [string(), number(), boolean(), array(), regexp()]
    }
}
