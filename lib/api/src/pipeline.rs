use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use vecmatch_core::{matcher, InputBatch, MatchConfig, MatchOptions, MatchOutput, Result};
use vecmatch_storage::CatalogLoader;

/// One invocation: raw input vectors plus optional overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchRequest {
    #[serde(default)]
    pub payload: Value,
    #[serde(default, rename = "cosineOptions")]
    pub options: MatchOptions,
}

/// Resolves options, loads the catalog and runs the matcher
#[derive(Clone)]
pub struct Pipeline {
    defaults: MatchConfig,
    loader: CatalogLoader,
}

impl Pipeline {
    pub fn new(defaults: MatchConfig, loader: CatalogLoader) -> Result<Self> {
        defaults.validate()?;
        Ok(Self { defaults, loader })
    }

    pub fn defaults(&self) -> &MatchConfig {
        &self.defaults
    }

    pub fn loader(&self) -> &CatalogLoader {
        &self.loader
    }

    /// Run one match.
    ///
    /// The input batch is validated first, then the catalog is awaited; any
    /// failure up to that point returns before a single comparison is made.
    pub async fn invoke(&self, request: &MatchRequest) -> Result<MatchOutput> {
        let config = self.defaults.resolve(&request.options);
        debug!(
            file_type = %config.file_type,
            file = %config.file,
            threshold = config.threshold,
            policy = %config.policy,
            "resolved match config"
        );

        let inputs = InputBatch::from_value(&request.payload)?;
        let catalog = self.loader.load(config.file_type, &config.file).await?;

        let output = matcher::run(&inputs, &catalog, &config);
        if let Err(e) = &output {
            warn!(error = %e, "match failed");
        }
        output
    }
}
