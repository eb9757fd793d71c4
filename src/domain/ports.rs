use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Whole-file text access for the patcher.
pub trait TextStore {
    fn read_text(&self, path: &Path) -> Result<String>;
    fn write_text(&self, path: &Path, content: &str) -> Result<()>;
    /// Entries of `dir` (not recursive) whose extension is in `extensions`, sorted.
    fn list_files(&self, dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>>;
}

#[async_trait]
pub trait TableProbe: Send + Sync {
    /// Exact row count of `table`; errors carry the remote error text.
    async fn count_rows(&self, table: &str) -> Result<u64>;
}
