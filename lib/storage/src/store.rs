use ahash::AHashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use vecmatch_core::{Error, Result, SourceKind};

/// Key-value lookup for named context variables
pub trait ContextStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value);
    fn remove(&self, key: &str) -> Option<Value>;
    fn keys(&self) -> Vec<String>;
}

/// In-process context store
#[derive(Debug, Default)]
pub struct MemoryStore {
    vars: RwLock<AHashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vars(vars: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            vars: RwLock::new(vars.into_iter().collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.vars.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.read().is_empty()
    }
}

impl ContextStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.vars.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        self.vars.write().insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) -> Option<Value> {
        self.vars.write().remove(key)
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.vars.read().keys().cloned().collect();
        keys.sort();
        keys
    }
}

/// Context variable scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Flow,
    Global,
}

impl Scope {
    /// Scope backing a catalog source, `None` for file paths
    pub fn for_source(kind: SourceKind) -> Option<Self> {
        match kind {
            SourceKind::Path => None,
            SourceKind::Flow => Some(Scope::Flow),
            SourceKind::Global => Some(Scope::Global),
        }
    }
}

impl FromStr for Scope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "flow" => Ok(Scope::Flow),
            "global" => Ok(Scope::Global),
            other => Err(Error::InvalidConfig(format!(
                "unknown scope '{other}' (expected flow or global)"
            ))),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Flow => f.write_str("flow"),
            Scope::Global => f.write_str("global"),
        }
    }
}

/// Preload document: `{"flow": {name: value}, "global": {name: value}}`
#[derive(Debug, Default, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    flow: serde_json::Map<String, Value>,
    #[serde(default)]
    global: serde_json::Map<String, Value>,
}

/// The flow and global stores used by one matcher instance
#[derive(Clone)]
pub struct ContextStores {
    pub flow: Arc<dyn ContextStore>,
    pub global: Arc<dyn ContextStore>,
}

impl ContextStores {
    pub fn new(flow: Arc<dyn ContextStore>, global: Arc<dyn ContextStore>) -> Self {
        Self { flow, global }
    }

    /// Two empty in-memory stores
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
    }

    /// In-memory stores seeded from a JSON preload document
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let doc: StoreDocument = serde_json::from_str(&data).map_err(|e| {
            Error::InvalidConfig(format!(
                "store file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Ok(Self::new(
            Arc::new(MemoryStore::with_vars(doc.flow)),
            Arc::new(MemoryStore::with_vars(doc.global)),
        ))
    }

    pub fn scope(&self, scope: Scope) -> &Arc<dyn ContextStore> {
        match scope {
            Scope::Flow => &self.flow,
            Scope::Global => &self.global,
        }
    }
}

impl Default for ContextStores {
    fn default() -> Self {
        Self::in_memory()
    }
}
