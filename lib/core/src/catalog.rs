//! Reference catalog: owner → file → vector
//!
//! Owners and files are kept in `BTreeMap`s so that iteration order is the
//! same on every run, regardless of how the source document was ordered.

use crate::Vector;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Reference vectors of one owner, keyed by file name
pub type OwnerFiles = BTreeMap<String, Vector>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceCatalog {
    owners: BTreeMap<String, OwnerFiles>,
}

impl ReferenceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and convert a JSON document.
    ///
    /// The document must be an object whose values are objects whose values
    /// are flat arrays of numbers. Empty owners and an empty catalog are valid.
    pub fn from_value(value: &Value) -> Result<Self, ShapeError> {
        let root = value.as_object().ok_or(ShapeError::NotAnObject)?;

        let mut owners = BTreeMap::new();
        for (owner, files) in root {
            let files = files
                .as_object()
                .ok_or_else(|| ShapeError::OwnerNotAnObject(owner.clone()))?;

            let mut entries = OwnerFiles::new();
            for (file, raw) in files {
                let vector = Vector::from_value(raw).ok_or_else(|| ShapeError::NotAVector {
                    owner: owner.clone(),
                    file: file.clone(),
                })?;
                entries.insert(file.clone(), vector);
            }
            owners.insert(owner.clone(), entries);
        }

        Ok(Self { owners })
    }

    /// Insert (or replace) a reference vector
    pub fn insert(&mut self, owner: impl Into<String>, file: impl Into<String>, vector: Vector) {
        self.owners
            .entry(owner.into())
            .or_default()
            .insert(file.into(), vector);
    }

    pub fn get(&self, owner: &str, file: &str) -> Option<&Vector> {
        self.owners.get(owner)?.get(file)
    }

    pub fn owners(&self) -> impl Iterator<Item = (&str, &OwnerFiles)> {
        self.owners.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Every `(owner, file, vector)` in stable order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, &Vector)> {
        self.owners.iter().flat_map(|(owner, files)| {
            files
                .iter()
                .map(move |(file, vector)| (owner.as_str(), file.as_str(), vector))
        })
    }

    pub fn owner_count(&self) -> usize {
        self.owners.len()
    }

    /// Total number of reference vectors
    pub fn len(&self) -> usize {
        self.owners.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Reasons a document is not a valid catalog
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShapeError {
    #[error("catalog must be a JSON object of owners")]
    NotAnObject,

    #[error("owner '{0}' must map to an object of files")]
    OwnerNotAnObject(String),

    #[error("'{owner}/{file}' is not a flat array of numbers")]
    NotAVector { owner: String, file: String },
}
