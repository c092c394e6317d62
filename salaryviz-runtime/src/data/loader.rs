use ahash::RandomState;
use async_trait::async_trait;
use salaryviz_common::data::table::SalaryTable;
use salaryviz_common::error::{Result, SalaryVizError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Source of raw salary tables.
///
/// Every failure to produce a table, whether the resource is missing, unreadable or not valid
/// CSV, is reported as a `ResourceLoadError`.
#[async_trait]
pub trait DatasetLoader: Send + Sync {
    fn id(&self) -> String;

    async fn load(&self, url: &str) -> Result<SalaryTable>;
}

/// Loads CSV files from the local file system, resolving relative urls against `root`
#[derive(Debug, Clone)]
pub struct FileLoader {
    root: PathBuf,
}

impl Default for FileLoader {
    fn default() -> Self {
        Self::new(".")
    }
}

impl FileLoader {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn resolve(&self, url: &str) -> PathBuf {
        let url = url.strip_prefix("file://").unwrap_or(url);
        let path = Path::new(url);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

#[async_trait]
impl DatasetLoader for FileLoader {
    fn id(&self) -> String {
        format!("file:{}", self.root.display())
    }

    async fn load(&self, url: &str) -> Result<SalaryTable> {
        let path = self.resolve(url);
        let bytes = read_file(&path).await?;
        log::debug!("Read {} bytes from {}", bytes.len(), path.display());
        parse_csv(url, &bytes)
    }
}

/// Serves CSV content registered in memory under a url
#[derive(Debug, Clone, Default)]
pub struct InlineLoader {
    datasets: HashMap<String, Arc<Vec<u8>>, RandomState>,
}

impl InlineLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset<S: Into<String>, B: Into<Vec<u8>>>(mut self, url: S, content: B) -> Self {
        self.datasets.insert(url.into(), Arc::new(content.into()));
        self
    }
}

#[async_trait]
impl DatasetLoader for InlineLoader {
    fn id(&self) -> String {
        "inline".to_string()
    }

    async fn load(&self, url: &str) -> Result<SalaryTable> {
        let bytes = self
            .datasets
            .get(url)
            .cloned()
            .ok_or_else(|| SalaryVizError::resource_load(format!("No inline dataset named {url}")))?;
        parse_csv(url, &bytes)
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "fs")] {
        async fn read_file(path: &Path) -> Result<Vec<u8>> {
            tokio::fs::read(path).await.map_err(|err| {
                SalaryVizError::resource_load(format!("Failed to read {}: {err}", path.display()))
            })
        }
    } else {
        async fn read_file(_path: &Path) -> Result<Vec<u8>> {
            Err(SalaryVizError::internal(
                "The `fs` feature flag must be enabled for file system support",
            ))
        }
    }
}

fn parse_csv(url: &str, bytes: &[u8]) -> Result<SalaryTable> {
    SalaryTable::from_csv_bytes(bytes).map_err(|err| {
        if err.is_resource_load() {
            err.with_context(|| format!("Failed to load {url}"))
        } else {
            SalaryVizError::resource_load(format!("Failed to parse CSV from {url}: {err}"))
        }
    })
}
