use crate::similarity::{self, Score};
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A vector of floating point numbers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Vector {
    data: Vec<f32>,
}

impl Vector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    /// Parse a flat JSON array of numbers.
    ///
    /// Returns `None` for anything else, including nested arrays and numbers
    /// outside the `f32` range.
    pub fn from_value(value: &Value) -> Option<Self> {
        let items = value.as_array()?;
        let data = items
            .iter()
            .map(|v| v.as_f64().map(|x| x as f32).filter(|x| x.is_finite()))
            .collect::<Option<Vec<f32>>>()?;
        Some(Self { data })
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Compute cosine similarity with another vector
    #[inline]
    pub fn cosine_similarity(&self, other: &Vector) -> Result<Score> {
        similarity::cosine_similarity(&self.data, &other.data)
    }
}

impl From<Vec<f32>> for Vector {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cosine_similarity() {
        let v1 = Vector::new(vec![1.0, 0.0]);
        let v2 = Vector::new(vec![1.0, 0.0]);
        assert_eq!(v1.cosine_similarity(&v2).unwrap(), Score::Similarity(1.0));

        let v3 = Vector::new(vec![0.0, 1.0]);
        let s = v1.cosine_similarity(&v3).unwrap().value().unwrap();
        assert!(s.abs() < 1e-6);
    }

    #[test]
    fn test_from_value() {
        let v = Vector::from_value(&json!([1, 2.5, -3])).unwrap();
        assert_eq!(v.as_slice(), &[1.0, 2.5, -3.0]);

        assert!(Vector::from_value(&json!([])).unwrap().is_empty());
        assert!(Vector::from_value(&json!([[1, 2]])).is_none());
        assert!(Vector::from_value(&json!([1, "2"])).is_none());
        assert!(Vector::from_value(&json!({"a": 1})).is_none());
        assert!(Vector::from_value(&json!(null)).is_none());
        assert!(Vector::from_value(&json!([1e300, 1])).is_none());
        assert!(Vector::from_value(&json!([-1e39])).is_none());
    }

    #[test]
    fn test_serde_transparent() {
        let v: Vector = serde_json::from_str("[0.5, 1.0]").unwrap();
        assert_eq!(v.dim(), 2);
        assert_eq!(serde_json::to_string(&v).unwrap(), "[0.5,1.0]");
    }
}
