//! Shared utilities for command handlers

use crate::config::{declare_classes, ClassConfig, Config};
use crate::error::{Error, Result};
use argbind_core::Registry;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// A schema paired with an argument list, as read from disk
#[derive(Debug, Clone, Deserialize)]
pub struct CaseFile {
    /// Mapping of surface keys to validators
    pub schema: Value,

    /// Argument list; may be supplied on the command line instead
    #[serde(default)]
    pub args: Option<Value>,

    /// Classes declared for this case only
    #[serde(default)]
    pub classes: BTreeMap<String, ClassConfig>,
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s == "yaml" || s == "yml")
        .unwrap_or(false)
}

/// Read a JSON or YAML document, chosen by extension
pub fn load_document(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = content.len(), "read document");

    if is_yaml(path) {
        serde_yaml::from_str(&content).map_err(|_| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "YAML".to_string(),
        })
    } else {
        serde_json::from_str(&content).map_err(|_| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "JSON".to_string(),
        })
    }
}

/// Read a case file with a `schema` entry
pub fn load_case(path: &Path) -> Result<CaseFile> {
    let document = load_document(path)?;
    serde_json::from_value(document).map_err(|_| Error::InvalidFormat {
        path: path.to_path_buf(),
        expected: "a case with a `schema` entry".to_string(),
    })
}

/// Read either a bare schema or a case file and return the schema with its classes
///
/// A document counts as a case file when it has a `schema` entry holding an object.
pub fn load_schema(path: &Path) -> Result<(Value, BTreeMap<String, ClassConfig>)> {
    let document = load_document(path)?;
    if document.get("schema").map_or(false, Value::is_object) {
        let case: CaseFile = serde_json::from_value(document).map_err(|_| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "a case with a `schema` entry".to_string(),
        })?;
        Ok((case.schema, case.classes))
    } else {
        Ok((document, BTreeMap::new()))
    }
}

/// Build the registry for one run: built-ins, configured classes, then case classes
pub fn registry_for(config: &Config, classes: &BTreeMap<String, ClassConfig>) -> Result<Registry> {
    let mut registry = config.registry()?;
    declare_classes(&mut registry, classes)?;
    Ok(registry)
}
