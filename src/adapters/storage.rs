use crate::domain::ports::TextStore;
use crate::utils::error::{Result, ToolError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Files under a project root. Relative paths are resolved against the root.
#[derive(Debug, Clone)]
pub struct LocalStore {
    base_path: PathBuf,
}

impl LocalStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.base_path.join(path)
    }
}

fn not_found_as(path: &Path) -> impl FnOnce(std::io::Error) -> ToolError + '_ {
    move |e| match e.kind() {
        ErrorKind::NotFound => ToolError::FileNotFoundError {
            path: path.to_path_buf(),
        },
        _ => ToolError::IoError(e),
    }
}

impl TextStore for LocalStore {
    fn read_text(&self, path: &Path) -> Result<String> {
        let full_path = self.resolve(path);
        fs::read_to_string(&full_path).map_err(not_found_as(&full_path))
    }

    fn write_text(&self, path: &Path, content: &str) -> Result<()> {
        let full_path = self.resolve(path);
        fs::write(&full_path, content)?;
        Ok(())
    }

    fn list_files(&self, dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
        let full_dir = self.resolve(dir);
        let mut files = Vec::new();

        for entry in fs::read_dir(&full_dir).map_err(not_found_as(&full_dir))? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }

            let name = entry.file_name();
            let matches = Path::new(&name)
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| extensions.iter().any(|allowed| allowed == ext));

            if matches {
                files.push(dir.join(name));
            }
        }

        files.sort();
        Ok(files)
    }
}
