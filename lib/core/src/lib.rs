//! # vecmatch Core
//!
//! Core library for vecmatch: cosine similarity between query vectors and a
//! catalog of reference vectors grouped by owner and file.
//!
//! This crate provides:
//!
//! - [`Vector`] - Dense `f32` vector
//! - [`ReferenceCatalog`] - owner → file → vector, validated from JSON
//! - [`InputBatch`] - Non-empty ordered batch of query vectors
//! - [`similarity`] - The cosine similarity engine and its [`Score`]
//! - [`matcher`] - Best-match / all-matches aggregation with threshold filtering
//!
//! ## Example
//!
//! ```rust
//! use vecmatch_core::{InputBatch, MatchPolicy, ReferenceCatalog, matcher};
//! use serde_json::json;
//!
//! let catalog = ReferenceCatalog::from_value(&json!({
//!     "alice": {"f1": [1.0, 0.0]},
//!     "bob": {"f1": [0.0, 1.0]}
//! })).unwrap();
//! let inputs = InputBatch::from_value(&json!([[1.0, 0.0], [0.0, 1.0]])).unwrap();
//!
//! let results = matcher::match_batch(&inputs, &catalog, 0.5, MatchPolicy::Best).unwrap();
//! assert_eq!(results[0]["alice"]["f1"], 1.0);
//! assert_eq!(results[1]["bob"]["f1"], 1.0);
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod input;
pub mod matcher;
pub mod similarity;
pub mod vector;

/// Single-pass dot product and norm accumulation
pub mod kernel;

pub use catalog::{OwnerFiles, ReferenceCatalog, ShapeError};
pub use config::{ConfigEcho, MatchConfig, MatchOptions, MatchPolicy, SourceKind};
pub use error::{Error, Result};
pub use input::InputBatch;
pub use matcher::{FileScores, MatchOutput, MatchResult};
pub use similarity::{cosine_similarity, Score};
pub use vector::Vector;
