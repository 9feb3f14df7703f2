//! # vecmatch
//!
//! Match a batch of feature vectors against a catalog of reference vectors
//! grouped by owner and file, using cosine similarity.
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! echo '[[1, 0], [0, 1]]' | vecmatch match --file faces.json --threshold 0.5
//! vecmatch serve --http-port 6333 --file-type flow --file faces
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use vecmatch::prelude::*;
//! use serde_json::json;
//!
//! let catalog = ReferenceCatalog::from_value(&json!({
//!     "alice": {"f1": [1.0, 0.0]},
//!     "bob": {"f1": [0.0, 1.0]}
//! })).unwrap();
//! let inputs = InputBatch::from_value(&json!([[0.9, 0.1]])).unwrap();
//!
//! let config = MatchConfig { threshold: 0.5, ..Default::default() };
//! let output = vecmatch::matcher::run(&inputs, &catalog, &config).unwrap();
//! assert!(output.payload[0].contains_key("alice"));
//! ```
//!
//! ## Crate Structure
//!
//! - [`vecmatch-core`](https://docs.rs/vecmatch-core) - Similarity engine, catalog, match aggregation
//! - [`vecmatch-storage`](https://docs.rs/vecmatch-storage) - Catalog sources (files, flow/global stores)
//! - [`vecmatch-api`](https://docs.rs/vecmatch-api) - Invocation pipeline and REST API

// Re-export core types
pub use vecmatch_core::{
    cosine_similarity, matcher, ConfigEcho, Error, InputBatch, MatchConfig, MatchOptions,
    MatchOutput, MatchPolicy, MatchResult, ReferenceCatalog, Result, Score, SourceKind, Vector,
};

// Re-export storage
pub use vecmatch_storage::{CatalogLoader, ContextStore, ContextStores, MemoryStore, Scope};

// Re-export API
pub use vecmatch_api::{MatchRequest, Pipeline, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CatalogLoader, ContextStore, ContextStores, Error, InputBatch, MatchConfig, MatchOptions,
        MatchOutput, MatchPolicy, MatchRequest, MatchResult, MemoryStore, Pipeline,
        ReferenceCatalog, Result, Score, SourceKind, Vector,
    };
}
