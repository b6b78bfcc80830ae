//! Catalog sources
//!
//! The matcher's only external dependency: "give me the catalog" and "give me
//! the rows whose sun/soil/water/size lists each contain these values".
//! Sources are read-only; nothing is ever written back.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{load_catalog, Catalog, Plant};
use crate::matching::filter::{filter_catalog, SiteConditions};

/// Failure to obtain a catalog snapshot.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog source unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read catalog {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog {}: {message}", .path.display())]
    Malformed { path: PathBuf, message: String },
}

impl CatalogError {
    /// Whether asking again may succeed. Malformed data will not fix itself.
    pub fn is_retryable(&self) -> bool {
        match self {
            CatalogError::Unavailable(_) | CatalogError::Io { .. } => true,
            CatalogError::Malformed { .. } => false,
        }
    }
}

/// Read-only access to the plant catalog.
pub trait CatalogSource: Send + Sync {
    /// Full catalog, in stored order.
    fn snapshot(&self) -> Result<Arc<Catalog>, CatalogError>;

    /// Rows whose four condition lists each contain the selected value,
    /// in catalog order.
    fn query_matching(&self, conditions: &SiteConditions) -> Result<Vec<Plant>, CatalogError> {
        let catalog = self.snapshot()?;
        Ok(filter_catalog(catalog.plants(), conditions)
            .into_iter()
            .cloned()
            .collect())
    }
}

/// Catalog held in memory (loaded once at startup, or built in tests).
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    catalog: Arc<Catalog>,
}

impl InMemoryCatalog {
    pub fn new(catalog: Catalog) -> Self {
        InMemoryCatalog {
            catalog: Arc::new(catalog),
        }
    }

    pub fn from_plants(plants: Vec<Plant>) -> Self {
        Self::new(Catalog::new(plants))
    }
}

impl CatalogSource for InMemoryCatalog {
    fn snapshot(&self) -> Result<Arc<Catalog>, CatalogError> {
        Ok(Arc::clone(&self.catalog))
    }
}

/// Catalog re-read from disk on every fetch, so edits to the export show up
/// without a restart and read errors surface per request.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileCatalog { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for FileCatalog {
    fn snapshot(&self) -> Result<Arc<Catalog>, CatalogError> {
        std::fs::metadata(&self.path).map_err(|source| CatalogError::Io {
            path: self.path.clone(),
            source,
        })?;

        match load_catalog(&self.path) {
            Ok(catalog) => Ok(Arc::new(catalog)),
            Err(e) => {
                tracing::warn!("Catalog fetch failed for {}: {:#}", self.path.display(), e);
                match io_cause(&e) {
                    Some(source) => Err(CatalogError::Io {
                        path: self.path.clone(),
                        source,
                    }),
                    None => Err(CatalogError::Malformed {
                        path: self.path.clone(),
                        message: format!("{:#}", e),
                    }),
                }
            }
        }
    }
}

/// I/O failure anywhere in a load error chain, including a JSON reader
/// that failed mid-read.
fn io_cause(error: &anyhow::Error) -> Option<std::io::Error> {
    error.chain().find_map(|cause| {
        if let Some(io) = cause.downcast_ref::<std::io::Error>() {
            return Some(std::io::Error::new(io.kind(), io.to_string()));
        }
        cause
            .downcast_ref::<serde_json::Error>()
            .filter(|json| json.is_io())
            .map(|json| std::io::Error::new(std::io::ErrorKind::Other, json.to_string()))
    })
}
