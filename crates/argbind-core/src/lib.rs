//! Argbind Core - positional argument matching and destructuring
//!
//! This crate matches an ordered list of runtime values against a declarative
//! schema and binds each value to a named slot. Slots may be:
//! - **Required**: `foo`, exactly one value
//! - **Optional**: `[foo]`, one value if it fits, otherwise left absent
//! - **Spread**: `...foo`, one or more values
//! - **Optional spread**: `[...foo]`, zero or more values
//!
//! Each slot carries a validator: `*`, a primitive type name, a class, a
//! predicate, or a union of those.
//!
//! ## Quick Start
//!
//! ```rust
//! use argbind_core::{ArgValue, Function, Schema, TypeName};
//!
//! let schema = Schema::builder()
//!     .arg("[options]", TypeName::Object)
//!     .arg("...ids", TypeName::Number)
//!     .arg("cb", TypeName::Function)
//!     .build()
//!     .unwrap();
//!
//! let cb = Function::new("cb");
//! let args = vec![ArgValue::from(1), ArgValue::from(2), ArgValue::from(cb.clone())];
//!
//! let bound = schema.bind(&args).unwrap();
//! assert!(bound.get("options").unwrap().is_absent());
//! assert_eq!(bound.spread("ids").unwrap().len(), 2);
//! assert_eq!(bound.value("cb"), Some(&ArgValue::Function(cb)));
//! ```
//!
//! ## JSON
//!
//! Schemas and argument lists can also be given as JSON, see
//! [`match_json`] and the [`json`] module for the value encoding.
//!
//! Copyright (c) 2025 Argbind Team
//! Licensed under MIT OR Apache-2.0

pub mod check;
pub mod error;
pub mod json;
pub mod matcher;
pub mod registry;
pub mod schema;
pub mod spec;
pub mod value;

// Re-export commonly used types for convenience
pub use check::check_one;
pub use error::{Error, ErrorKind, Expected, Mismatch, Result};
pub use matcher::{match_args, match_json, Binding, Bindings};
pub use registry::Registry;
pub use schema::{parse_key, Schema, SchemaBuilder, Slot, SlotKind};
pub use spec::{Predicate, TypeName, ValidatorSpec};
pub use value::{ArgValue, ClassRef, Function, Instance};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
