//! Catalog retrieval
//!
//! Every failure here is reported before the matcher runs, so the similarity
//! engine is never invoked on a catalog that failed to load.

use crate::store::{ContextStores, Scope};
use serde_json::Value;
use std::path::Path;
use tracing::debug;
use vecmatch_core::{Error, ReferenceCatalog, Result, SourceKind};

/// Retrieves reference catalogs from files or context stores
#[derive(Clone, Default)]
pub struct CatalogLoader {
    stores: ContextStores,
}

impl CatalogLoader {
    pub fn new(stores: ContextStores) -> Self {
        Self { stores }
    }

    pub fn stores(&self) -> &ContextStores {
        &self.stores
    }

    /// Load the catalog named by `name` from the given source.
    ///
    /// # Errors
    /// - [`Error::CatalogParseFailure`] when a file cannot be read, parsed, or validated
    /// - [`Error::CatalogNotFound`] when a context variable is absent
    /// - [`Error::CatalogShapeInvalid`] when a context variable has the wrong shape
    pub async fn load(&self, kind: SourceKind, name: &str) -> Result<ReferenceCatalog> {
        match Scope::for_source(kind) {
            None => Self::load_file(name).await,
            Some(scope) => self.load_variable(scope, name),
        }
    }

    /// Read and validate a JSON catalog document
    pub async fn load_file<P: AsRef<Path>>(path: P) -> Result<ReferenceCatalog> {
        let path = path.as_ref();
        let parse_failure = |reason: String| {
            Error::CatalogParseFailure(format!("{}: {}", path.display(), reason))
        };

        let data = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| parse_failure(e.to_string()))?;
        let value: Value = serde_json::from_str(&data).map_err(|e| parse_failure(e.to_string()))?;
        let catalog = ReferenceCatalog::from_value(&value).map_err(|e| parse_failure(e.to_string()))?;

        debug!(
            path = %path.display(),
            owners = catalog.owner_count(),
            references = catalog.len(),
            "catalog loaded from file"
        );
        Ok(catalog)
    }

    /// Look up and validate a context variable
    pub fn load_variable(&self, scope: Scope, name: &str) -> Result<ReferenceCatalog> {
        let value = match self.stores.scope(scope).get(name) {
            None | Some(Value::Null) => {
                return Err(Error::CatalogNotFound(format!("{scope}.{name}")));
            }
            Some(value) => value,
        };

        let catalog = ReferenceCatalog::from_value(&value)
            .map_err(|e| Error::CatalogShapeInvalid(format!("{scope}.{name}: {e}")))?;

        debug!(
            %scope,
            name,
            owners = catalog.owner_count(),
            references = catalog.len(),
            "catalog loaded from context"
        );
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn loader_with(scope: Scope, name: &str, value: Value) -> CatalogLoader {
        let loader = CatalogLoader::default();
        loader.stores().scope(scope).set(name, value);
        loader
    }

    #[tokio::test]
    async fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"alice": {{"f1": [1, 0]}}, "bob": {{"f1": [0, 1]}}}}"#).unwrap();

        let loader = CatalogLoader::default();
        let catalog = loader
            .load(SourceKind::Path, file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[tokio::test]
    async fn test_load_file_failures() {
        let loader = CatalogLoader::default();

        let err = loader
            .load(SourceKind::Path, "/nonexistent/vectors.json")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CatalogParseFailure(_)));

        let mut broken = tempfile::NamedTempFile::new().unwrap();
        write!(broken, "{{\"alice\": ").unwrap();
        let err = CatalogLoader::load_file(broken.path()).await.unwrap_err();
        assert!(matches!(err, Error::CatalogParseFailure(_)));

        let mut wrong_shape = tempfile::NamedTempFile::new().unwrap();
        write!(wrong_shape, r#"{{"alice": [[1, 0]]}}"#).unwrap();
        let err = CatalogLoader::load_file(wrong_shape.path()).await.unwrap_err();
        assert!(matches!(err, Error::CatalogParseFailure(_)));
    }

    #[tokio::test]
    async fn test_load_flow_and_global() {
        let loader = loader_with(Scope::Flow, "faces", json!({"alice": {"f1": [1, 0]}}));
        loader
            .stores()
            .scope(Scope::Global)
            .set("faces", json!({"bob": {"f1": [0, 1], "f2": [1, 1]}}));

        let flow = loader.load(SourceKind::Flow, "faces").await.unwrap();
        assert!(flow.get("alice", "f1").is_some());

        let global = loader.load(SourceKind::Global, "faces").await.unwrap();
        assert_eq!(global.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_variable() {
        let loader = CatalogLoader::default();
        let err = loader.load(SourceKind::Flow, "faces").await.unwrap_err();
        assert!(matches!(err, Error::CatalogNotFound(_)));

        let loader = loader_with(Scope::Global, "faces", Value::Null);
        let err = loader.load(SourceKind::Global, "faces").await.unwrap_err();
        assert!(matches!(err, Error::CatalogNotFound(_)));
    }

    #[tokio::test]
    async fn test_wrong_shape_variable() {
        let loader = loader_with(Scope::Flow, "faces", json!([[1, 0]]));
        let err = loader.load(SourceKind::Flow, "faces").await.unwrap_err();
        assert!(matches!(err, Error::CatalogShapeInvalid(_)));
    }
}
