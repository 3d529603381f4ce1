//! Error types for argument matching
//!
//! Every failure surfaces as a single [`Error`] naming the offending key and
//! the expected shape. Errors are `Clone` because the matcher may hold one
//! back while it decides which failure to report.
//!
//! Copyright (c) 2025 Argbind Team
//! Licensed under MIT OR Apache-2.0

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Main error type for schema compilation and argument matching
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The argument list is not a list
    #[error("\"args\" must be an array or array-like object (arguments)")]
    InvalidArgs,

    /// The schema is not a mapping of keys to validators
    #[error("\"validation\" must be an object")]
    InvalidSchema,

    /// A validator is none of the supported shapes
    #[error("\"validator\" must be a string, class or function")]
    InvalidValidator { key: String },

    /// A type name outside the primitive type table
    #[error("\"{key}\" uses unknown type \"{name}\"")]
    UnknownType { key: String, name: String },

    /// A class name the registry does not know
    #[error("\"{key}\" references unknown class \"{name}\"")]
    UnknownClass { key: String, name: String },

    /// A predicate name the registry does not know
    #[error("\"{key}\" references unknown predicate \"{name}\"")]
    UnknownPredicate { key: String, name: String },

    /// A schema key whose surface syntax cannot be parsed
    #[error("\"{key}\" is not a valid argument key")]
    MalformedKey { key: String },

    /// Two schema keys destructure to the same name
    #[error("\"{name}\" is declared more than once")]
    DuplicateName { name: String },

    /// More than one spread key in a schema
    #[error("only a single spread argument is supported")]
    MultipleSpread { keys: Vec<String> },

    /// A required or required-spread slot ran out of values
    #[error("\"{key}\" is required")]
    Required { key: String },

    /// A present value failed its validator
    #[error("{0}")]
    TypeMismatch(Mismatch),

    /// A tagged JSON value could not be decoded
    #[error("Invalid argument value at {path}: {message}")]
    Decode { path: String, message: String },
}

/// Broad classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed argument list or schema container
    InputShape,
    /// Schema that cannot be compiled
    SchemaShape,
    /// Missing value for a required slot
    RequiredMissing,
    /// Value present but rejected by its validator
    TypeMismatch,
    /// Argument encoding error
    Decode,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidArgs | Error::InvalidSchema => ErrorKind::InputShape,
            Error::InvalidValidator { .. }
            | Error::UnknownType { .. }
            | Error::UnknownClass { .. }
            | Error::UnknownPredicate { .. }
            | Error::MalformedKey { .. }
            | Error::DuplicateName { .. }
            | Error::MultipleSpread { .. } => ErrorKind::SchemaShape,
            Error::Required { .. } => ErrorKind::RequiredMissing,
            Error::TypeMismatch(_) => ErrorKind::TypeMismatch,
            Error::Decode { .. } => ErrorKind::Decode,
        }
    }

    /// The schema label the error refers to, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            Error::InvalidValidator { key }
            | Error::UnknownType { key, .. }
            | Error::UnknownClass { key, .. }
            | Error::UnknownPredicate { key, .. }
            | Error::MalformedKey { key }
            | Error::Required { key } => Some(key),
            Error::DuplicateName { name } => Some(name),
            Error::TypeMismatch(mismatch) => Some(&mismatch.key),
            Error::InvalidArgs
            | Error::InvalidSchema
            | Error::MultipleSpread { .. }
            | Error::Decode { .. } => None,
        }
    }

    pub fn decode(path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Decode {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<Mismatch> for Error {
    fn from(mismatch: Mismatch) -> Self {
        Error::TypeMismatch(mismatch)
    }
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// A value rejected by its validator
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    /// Label of the slot that rejected the value
    pub key: String,
    /// What the validator wanted
    pub expected: Expected,
    /// Whether the slot collects many values
    pub plural: bool,
}

/// The expectation a validator failed to meet
#[derive(Debug, Clone, PartialEq)]
pub enum Expected {
    /// A primitive type name such as `string`
    Type(String),
    /// An instance of the named class
    Instance(String),
    /// A named predicate rejected the value with a message
    Predicate { name: String, message: String },
    /// None of several alternatives accepted the value
    AnyOf(Vec<Expected>),
}

impl Expected {
    fn phrase(&self, plural: bool) -> String {
        match self {
            Expected::Type(name) if plural => format!("{}s", name),
            Expected::Type(name) => format!("{} {}", article(name), name),
            Expected::Instance(name) if plural => format!("instances of \"{}\"", name),
            Expected::Instance(name) => format!("an instance of \"{}\"", name),
            Expected::Predicate { name, message } => {
                format!("accepted by {} ({})", name, message)
            }
            Expected::AnyOf(options) => options
                .iter()
                .map(|option| option.phrase(plural))
                .collect::<Vec<_>>()
                .join(" or "),
        }
    }
}

fn article(word: &str) -> &'static str {
    match word.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.expected {
            Expected::Predicate { message, .. } => write!(f, "\"{}\": {}", self.key, message),
            expected => write!(f, "\"{}\" must be {}", self.key, expected.phrase(self.plural)),
        }
    }
}

impl std::error::Error for Mismatch {}
