use jsonschema::JSONSchema;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{HarnessError, HarnessResult};

/// JSON Schema documents looked up by name
///
/// `name` resolves to `<dir>/<name>.json`. Documents are read on first use
/// and kept for the life of the registry.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    dir: PathBuf,
    schemas: HashMap<String, Value>,
}

impl SchemaRegistry {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            schemas: HashMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a schema name resolves to
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    /// Register a schema without touching the filesystem
    pub fn register_schema(&mut self, name: impl Into<String>, schema: Value) {
        self.schemas.insert(name.into(), schema);
    }

    /// Read a schema document, caching it
    pub fn load(&mut self, name: &str) -> HarnessResult<&Value> {
        if !self.schemas.contains_key(name) {
            let path = self.path_for(name);
            if !path.exists() {
                return Err(HarnessError::Schema(format!(
                    "Schema file not found: {}",
                    path.display()
                )));
            }
            let raw = fs::read_to_string(&path)?;
            let schema: Value = serde_json::from_str(&raw)?;
            self.schemas.insert(name.to_string(), schema);
        }
        self.schemas
            .get(name)
            .ok_or_else(|| HarnessError::Schema(format!("Schema {name} not registered")))
    }

    /// Validate `instance` against the named schema
    ///
    /// Returns every violation as `"<instance path or root>: <message>"`;
    /// an empty list means the instance conforms.
    pub fn validate(&mut self, name: &str, instance: &Value) -> HarnessResult<Vec<String>> {
        let schema = self.load(name)?;
        let compiled = JSONSchema::compile(schema)
            .map_err(|e| HarnessError::Schema(format!("Invalid schema {name}: {e}")))?;

        let violations = match compiled.validate(instance) {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .map(|error| {
                    let path = error.instance_path.to_string();
                    let path = if path.is_empty() { "root".to_string() } else { path };
                    format!("{path}: {error}")
                })
                .collect(),
        };
        Ok(violations)
    }
}
