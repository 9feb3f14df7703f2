//! # vecmatch API
//!
//! The invocation pipeline ([`Pipeline`]) that replaces a per-message host
//! callback, and a small REST surface ([`RestApi`]) around it.

pub mod pipeline;
pub mod rest;

pub use pipeline::{MatchRequest, Pipeline};
pub use rest::RestApi;
