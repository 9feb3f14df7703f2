use crate::{Error, Result, Vector};
use serde_json::Value;

/// Non-empty, ordered batch of query vectors
#[derive(Debug, Clone, PartialEq)]
pub struct InputBatch {
    vectors: Vec<Vector>,
}

impl InputBatch {
    pub fn new(vectors: Vec<Vector>) -> Result<Self> {
        if vectors.is_empty() {
            return Err(Error::InvalidInput("input batch is empty".to_string()));
        }
        Ok(Self { vectors })
    }

    /// Validate a raw payload: a non-empty array of flat number arrays.
    pub fn from_value(value: &Value) -> Result<Self> {
        let items = value
            .as_array()
            .ok_or_else(|| Error::InvalidInput("payload is not an array".to_string()))?;

        let vectors = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                Vector::from_value(item).ok_or_else(|| {
                    Error::InvalidInput(format!("element {i} is not a flat array of numbers"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(vectors)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Always false for a constructed batch
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vector> {
        self.vectors.iter()
    }

    pub fn as_slice(&self) -> &[Vector] {
        &self.vectors
    }
}

impl<'a> IntoIterator for &'a InputBatch {
    type Item = &'a Vector;
    type IntoIter = std::slice::Iter<'a, Vector>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
