//! Gate configuration.
//!
//! A gate is configured by a [`ColumnCatalog`] (which header names are recognized, with display
//! labels, and which are required) and a validator. [`GateConfig`] loads both from JSON, using
//! the same key names upload front-ends already send:
//!
//! ```json
//! {
//!   "columnsKeys": { "id": "ID", "name": "Full name", "score": "Score" },
//!   "requiredCols": ["id", "name"],
//!   "fields": [
//!     { "name": "id", "dataType": "int64" },
//!     { "name": "score", "dataType": "float64", "optional": true, "constraints": [{ "min": 0 }] }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{IngestionError, IngestionResult};
use crate::validation::{FieldSpec, SchemaDefinition, TypedSchema};

/// A recognized column and its display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnKey {
    pub name: String,
    pub label: String,
}

/// Recognized column vocabulary (in declaration order) plus the required subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawCatalog")]
pub struct ColumnCatalog {
    keys: Vec<ColumnKey>,
    required: Vec<String>,
}

impl ColumnCatalog {
    /// Catalog from explicit keys. Nothing is required until [`Self::require`] is called.
    pub fn new(keys: Vec<ColumnKey>) -> Self {
        Self {
            keys,
            required: Vec::new(),
        }
    }

    /// Catalog whose labels equal the column names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            names
                .into_iter()
                .map(|n| {
                    let name = n.into();
                    ColumnKey {
                        label: name.clone(),
                        name,
                    }
                })
                .collect(),
        )
    }

    /// Set the required column list (order is kept for error messages).
    pub fn require<I, S>(mut self, required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = required.into_iter().map(Into::into).collect();
        self
    }

    /// Recognized names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|k| k.name.as_str())
    }

    pub fn is_recognized(&self, name: &str) -> bool {
        self.keys.iter().any(|k| k.name == name)
    }

    pub fn label(&self, name: &str) -> Option<&str> {
        self.keys
            .iter()
            .find(|k| k.name == name)
            .map(|k| k.label.as_str())
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    fn from_json_keys(columns_keys: serde_json::Map<String, serde_json::Value>, required: Vec<String>) -> Self {
        let keys = columns_keys
            .into_iter()
            .map(|(name, label)| ColumnKey {
                label: match label {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                },
                name,
            })
            .collect();
        Self { keys, required }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCatalog {
    columns_keys: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    required_cols: Vec<String>,
}

impl From<RawCatalog> for ColumnCatalog {
    fn from(raw: RawCatalog) -> Self {
        Self::from_json_keys(raw.columns_keys, raw.required_cols)
    }
}

/// Full gate configuration: catalog plus a typed field list for [`TypedSchema`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateConfig {
    columns_keys: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    required_cols: Vec<String>,
    #[serde(default)]
    fields: Vec<FieldSpec>,
}

impl GateConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json_str(json: &str) -> IngestionResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> IngestionResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn catalog(&self) -> ColumnCatalog {
        ColumnCatalog::from_json_keys(self.columns_keys.clone(), self.required_cols.clone())
    }

    /// Build a [`SchemaDefinition`] backed by a [`TypedSchema`] of the configured fields.
    ///
    /// Fails if a typed field or a required column is not part of `columnsKeys`.
    pub fn into_schema(self) -> IngestionResult<SchemaDefinition> {
        let catalog = self.catalog();

        let unknown: Vec<&str> = self
            .fields
            .iter()
            .map(|f| f.name.as_str())
            .chain(catalog.required().iter().map(String::as_str))
            .filter(|name| !catalog.is_recognized(name))
            .collect();
        if !unknown.is_empty() {
            return Err(IngestionError::InvalidConfig {
                message: format!(
                    "columns not declared in columnsKeys: {}",
                    unknown.join(", ")
                ),
            });
        }

        Ok(SchemaDefinition::new(catalog, TypedSchema::new(self.fields)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::DataType;

    #[test]
    fn catalog_keeps_declaration_order_and_labels() {
        let catalog: ColumnCatalog = serde_json::from_str(
            r#"{"columnsKeys": {"zeta": "Z", "alpha": "A", "mid": 3}, "requiredCols": ["alpha"]}"#,
        )
        .unwrap();

        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(catalog.label("zeta"), Some("Z"));
        assert_eq!(catalog.label("mid"), Some("3"));
        assert_eq!(catalog.required(), ["alpha".to_string()]);
    }

    #[test]
    fn gate_config_builds_typed_schema() {
        let cfg = GateConfig::from_json_str(
            r#"{
                "columnsKeys": {"id": "ID", "score": "Score"},
                "requiredCols": ["id"],
                "fields": [
                    {"name": "id", "dataType": "int64"},
                    {"name": "score", "dataType": "float64", "optional": true}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.fields[0].data_type, DataType::Int64);

        let schema = cfg.into_schema().unwrap();
        assert!(schema.catalog().is_recognized("score"));
        assert_eq!(schema.catalog().required(), ["id".to_string()]);
    }

    #[test]
    fn gate_config_rejects_undeclared_fields() {
        let cfg = GateConfig::from_json_str(
            r#"{"columnsKeys": {"id": "ID"}, "requiredCols": ["ghost"], "fields": [{"name": "other", "dataType": "utf8"}]}"#,
        )
        .unwrap();

        let err = cfg.into_schema().unwrap_err();
        assert!(err.to_string().contains("invalid config"));
        assert!(err.to_string().contains("other, ghost"));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let err = GateConfig::from_json_str("{").unwrap_err();
        assert!(matches!(err, IngestionError::Json(_)));
    }
}
