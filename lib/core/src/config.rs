//! Invocation configuration
//!
//! [`MatchConfig`] holds the static defaults; [`MatchOptions`] carries the
//! per-call overrides exactly as they arrived. Overrides are checked against
//! the same constraints as the defaults and dropped (with a warning) when
//! they do not satisfy them.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Where the reference catalog is retrieved from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// JSON document on the file system
    #[default]
    Path,
    /// Flow-scoped context variable
    Flow,
    /// Global-scoped context variable
    Global,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Path => "path",
            SourceKind::Flow => "flow",
            SourceKind::Global => "global",
        }
    }
}

impl FromStr for SourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "path" => Ok(SourceKind::Path),
            "flow" => Ok(SourceKind::Flow),
            "global" => Ok(SourceKind::Global),
            other => Err(Error::InvalidConfig(format!(
                "unknown file type '{other}' (expected path, flow or global)"
            ))),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How per-input results are aggregated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// Keep only the highest scoring (owner, file) per input
    #[default]
    Best,
    /// Keep every (owner, file) score per input
    All,
}

impl MatchPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchPolicy::Best => "best",
            MatchPolicy::All => "all",
        }
    }
}

impl FromStr for MatchPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "best" => Ok(MatchPolicy::Best),
            "all" => Ok(MatchPolicy::All),
            other => Err(Error::InvalidConfig(format!(
                "unknown policy '{other}' (expected best or all)"
            ))),
        }
    }
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check that a threshold lies in [0, 1]
pub fn validate_threshold(threshold: f32) -> Result<f32> {
    if threshold.is_finite() && (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(Error::InvalidConfig(format!(
            "threshold {threshold} is outside [0, 1]"
        )))
    }
}

/// Static defaults for a matcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchConfig {
    #[serde(default)]
    pub file_type: SourceKind,
    /// File path or context variable name, depending on `file_type`
    #[serde(default, alias = "filePath")]
    pub file: String,
    #[serde(default)]
    pub threshold: f32,
    #[serde(default)]
    pub policy: MatchPolicy,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            file_type: SourceKind::Path,
            file: String::new(),
            threshold: 0.0,
            policy: MatchPolicy::Best,
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.threshold)?;
        Ok(())
    }

    /// Apply the valid subset of `options` on top of these defaults.
    pub fn resolve(&self, options: &MatchOptions) -> MatchConfig {
        let mut resolved = self.clone();

        if let Some(raw) = &options.file_type {
            match raw.as_str().map(SourceKind::from_str) {
                Some(Ok(kind)) => resolved.file_type = kind,
                _ => warn!(value = %raw, "ignoring invalid fileType override"),
            }
        }

        if let Some(raw) = &options.file {
            match raw.as_str() {
                Some(file) if !file.is_empty() => resolved.file = file.to_string(),
                Some(_) => {}
                None => warn!(value = %raw, "ignoring non-string file override"),
            }
        }

        if let Some(raw) = &options.threshold {
            match parse_threshold(raw) {
                Some(threshold) => resolved.threshold = threshold,
                None => warn!(value = %raw, "ignoring invalid threshold override"),
            }
        }

        if let Some(raw) = &options.policy {
            match raw.as_str().map(MatchPolicy::from_str) {
                Some(Ok(policy)) => resolved.policy = policy,
                _ => warn!(value = %raw, "ignoring invalid policy override"),
            }
        }

        resolved
    }

    pub fn echo(&self) -> ConfigEcho {
        ConfigEcho {
            threshold: self.threshold,
            file_type: self.file_type,
            file_path: self.file.clone(),
            policy: self.policy,
        }
    }
}

/// Numbers and numeric strings are accepted
fn parse_threshold(raw: &Value) -> Option<f32> {
    let value = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    validate_threshold(value as f32).ok()
}

/// Per-call overrides, kept loosely typed so one bad field cannot reject
/// the whole request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<Value>,
    #[serde(default, alias = "filePath", skip_serializing_if = "Option::is_none")]
    pub file: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<Value>,
}

/// Configuration actually used for an invocation, echoed in the output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigEcho {
    pub threshold: f32,
    pub file_type: SourceKind,
    pub file_path: String,
    pub policy: MatchPolicy,
}
