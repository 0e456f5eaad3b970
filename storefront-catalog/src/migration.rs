//! Schema migration history for the product store.
//!
//! The history is plain configuration data: an ordered list of batches,
//! each batch moving the schema forward by one version. It is validated
//! once on construction, and the per-version field-type table and live
//! index set are derived from it rather than stored separately.

use std::collections::BTreeMap;

use serde_json::{Value, json};
use thiserror::Error;

use crate::types::{Field, FieldType};

/// Schema version; equal to the number of batches applied.
pub type SchemaVersion = u32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("Version {version}: index '{index}' is declared on field '{field}' before the field exists")]
    IndexOnUndeclaredField {
        version: SchemaVersion,
        field: Field,
        index: String,
    },
    #[error("Version {version}: index '{index}' is already declared")]
    DuplicateIndex { version: SchemaVersion, index: String },
    #[error("Version {version}: index '{index}' is removed but was never declared")]
    UnknownIndex { version: SchemaVersion, index: String },
    #[error("Version {version}: '{index}' is not a valid index name")]
    InvalidIndexName { version: SchemaVersion, index: String },
}

/// One schema change.
#[derive(Debug, Clone, PartialEq)]
pub enum MigrationStep {
    /// Declares a field (or redeclares its type) and the value existing
    /// documents are backfilled with when they lack it.
    FieldAdded {
        field: Field,
        ty: FieldType,
        default: Value,
    },
    IndexAdded { field: Field, index: String },
    IndexRemoved { index: String },
}

impl MigrationStep {
    pub fn field_added(field: Field, ty: FieldType, default: Value) -> Self {
        MigrationStep::FieldAdded { field, ty, default }
    }

    pub fn index_added(field: Field, index: impl Into<String>) -> Self {
        MigrationStep::IndexAdded {
            field,
            index: index.into(),
        }
    }

    pub fn index_removed(index: impl Into<String>) -> Self {
        MigrationStep::IndexRemoved {
            index: index.into(),
        }
    }

    /// Short human-readable description, used in logs and errors.
    pub fn describe(&self) -> String {
        match self {
            MigrationStep::FieldAdded { field, ty, .. } => format!("add field {field} ({ty})"),
            MigrationStep::IndexAdded { field, index } => format!("add index {index} on {field}"),
            MigrationStep::IndexRemoved { index } => format!("remove index {index}"),
        }
    }
}

/// Steps applied atomically to move the schema forward by one version.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MigrationBatch {
    pub steps: Vec<MigrationStep>,
}

impl MigrationBatch {
    pub fn new(steps: Vec<MigrationStep>) -> Self {
        Self { steps }
    }
}

/// Field types in effect at one schema version.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldTypes(BTreeMap<Field, FieldType>);

impl FieldTypes {
    pub fn get(&self, field: Field) -> Option<FieldType> {
        self.0.get(&field).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, FieldType)> + '_ {
        self.0.iter().map(|(field, ty)| (*field, *ty))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Ordered, validated list of migration batches.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationHistory {
    batches: Vec<MigrationBatch>,
}

impl MigrationHistory {
    /// Build a history, checking that every index step refers to a
    /// declared field or a live index at its point in the history.
    pub fn new(batches: Vec<MigrationBatch>) -> Result<Self, HistoryError> {
        let mut declared: Vec<Field> = Vec::new();
        let mut live: BTreeMap<String, Field> = BTreeMap::new();

        for (i, batch) in batches.iter().enumerate() {
            let version = i as SchemaVersion + 1;
            for step in &batch.steps {
                match step {
                    MigrationStep::FieldAdded { field, .. } => {
                        if !declared.contains(field) {
                            declared.push(*field);
                        }
                    }
                    MigrationStep::IndexAdded { field, index } => {
                        if !is_valid_index_name(index) {
                            return Err(HistoryError::InvalidIndexName {
                                version,
                                index: index.clone(),
                            });
                        }
                        if !declared.contains(field) {
                            return Err(HistoryError::IndexOnUndeclaredField {
                                version,
                                field: *field,
                                index: index.clone(),
                            });
                        }
                        if live.insert(index.clone(), *field).is_some() {
                            return Err(HistoryError::DuplicateIndex {
                                version,
                                index: index.clone(),
                            });
                        }
                    }
                    MigrationStep::IndexRemoved { index } => {
                        if live.remove(index).is_none() {
                            return Err(HistoryError::UnknownIndex {
                                version,
                                index: index.clone(),
                            });
                        }
                    }
                }
            }
        }

        Ok(Self { batches })
    }

    /// The declared schema version (number of batches).
    pub fn version(&self) -> SchemaVersion {
        self.batches.len() as SchemaVersion
    }

    pub fn batches(&self) -> &[MigrationBatch] {
        &self.batches
    }

    /// Batches that move a database from `from` to the declared version,
    /// paired with the version each one produces.
    pub fn pending(&self, from: SchemaVersion) -> impl Iterator<Item = (SchemaVersion, &MigrationBatch)> {
        self.batches
            .iter()
            .enumerate()
            .skip(from as usize)
            .map(|(i, batch)| (i as SchemaVersion + 1, batch))
    }

    /// Field-type table as of `version`. Later declarations of a field
    /// replace earlier ones.
    pub fn field_types_at(&self, version: SchemaVersion) -> FieldTypes {
        let mut types = BTreeMap::new();
        for step in self.steps_through(version) {
            if let MigrationStep::FieldAdded { field, ty, .. } = step {
                types.insert(*field, *ty);
            }
        }
        FieldTypes(types)
    }

    /// Live indexes (index name to field) as of `version`.
    pub fn indexes_at(&self, version: SchemaVersion) -> BTreeMap<String, Field> {
        let mut indexes = BTreeMap::new();
        for step in self.steps_through(version) {
            match step {
                MigrationStep::IndexAdded { field, index } => {
                    indexes.insert(index.clone(), *field);
                }
                MigrationStep::IndexRemoved { index } => {
                    indexes.remove(index);
                }
                MigrationStep::FieldAdded { .. } => {}
            }
        }
        indexes
    }

    fn steps_through(&self, version: SchemaVersion) -> impl Iterator<Item = &MigrationStep> {
        self.batches
            .iter()
            .take(version as usize)
            .flat_map(|batch| batch.steps.iter())
    }
}

impl Default for MigrationHistory {
    /// The storefront's schema history.
    fn default() -> Self {
        use MigrationStep as S;

        let batches = vec![
            MigrationBatch::new(vec![
                S::field_added(Field::Name, FieldType::Text, json!("default")),
                S::field_added(Field::Price, FieldType::Number, json!(0)),
                S::field_added(Field::Date, FieldType::Date, json!("1970-01-01")),
                S::index_added(Field::Price, "price_idx"),
            ]),
            MigrationBatch::new(vec![
                S::field_added(Field::Vendor, FieldType::Text, json!("default")),
                S::field_added(Field::Memory, FieldType::Text, json!("default")),
                S::field_added(Field::Color, FieldType::Text, json!("default")),
                S::field_added(Field::Stock, FieldType::Number, json!(0)),
            ]),
            MigrationBatch::new(vec![S::field_added(
                Field::Image,
                FieldType::Text,
                json!(PLACEHOLDER_IMAGE),
            )]),
            MigrationBatch::new(vec![
                S::field_added(Field::Fans, FieldType::Text, json!("1")),
                S::field_added(Field::Memory, FieldType::Number, json!(0)),
                S::index_added(Field::Vendor, "vendor_idx"),
                S::index_added(Field::Memory, "memory_idx"),
                S::index_added(Field::Color, "color_idx"),
                S::index_added(Field::Stock, "stock_idx"),
                S::index_added(Field::Date, "date_idx"),
                S::index_added(Field::Fans, "fans_idx"),
            ]),
        ];

        // Checked by `default_history_is_valid` in the tests.
        Self { batches }
    }
}

/// Image used for products that predate the image field.
pub const PLACEHOLDER_IMAGE: &str = "assets/images/placeholder.png";

/// Index names are interpolated into DDL, so only plain identifiers are accepted.
fn is_valid_index_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
