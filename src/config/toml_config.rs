use crate::domain::model::{FileErrorPolicy, PatchSet, Replacement, Target};
use crate::utils::error::{Result, ToolError};
use crate::utils::validation::{
    validate_extensions, validate_non_empty_string, validate_path, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Patch sets declared in a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchConfig {
    pub patches: Vec<PatchDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchDefinition {
    pub name: String,
    pub description: Option<String>,
    pub on_error: Option<FileErrorPolicy>,
    pub files: Option<Vec<String>>,
    pub directories: Option<Vec<DirectoryTarget>>,
    pub replacements: Vec<Replacement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryTarget {
    pub dir: String,
    pub extensions: Vec<String>,
}

impl PatchConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ToolError::FileNotFoundError {
                path: path.to_path_buf(),
            },
            _ => ToolError::IoError(e),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses the document as is. `${...}` is left alone since patch text
    /// carries template literals.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ToolError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn validate_config(&self) -> Result<()> {
        if self.patches.is_empty() {
            return Err(ToolError::ConfigValidationError {
                field: "patches".to_string(),
                message: "At least one [[patches]] entry is required".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for (index, patch) in self.patches.iter().enumerate() {
            let prefix = format!("patches[{}]", index);
            validate_non_empty_string(&format!("{}.name", prefix), &patch.name)?;

            if !seen.insert(patch.name.as_str()) {
                return Err(ToolError::ConfigValidationError {
                    field: format!("{}.name", prefix),
                    message: format!("Duplicate patch name '{}'", patch.name),
                });
            }

            let files = patch.files.as_deref().unwrap_or_default();
            let directories = patch.directories.as_deref().unwrap_or_default();
            if files.is_empty() && directories.is_empty() {
                return Err(ToolError::ConfigValidationError {
                    field: prefix.clone(),
                    message: "Declare at least one entry in files or directories".to_string(),
                });
            }

            for file in files {
                validate_path(&format!("{}.files", prefix), file)?;
            }
            for directory in directories {
                validate_path(&format!("{}.directories.dir", prefix), &directory.dir)?;
                validate_extensions(
                    &format!("{}.directories.extensions", prefix),
                    &directory.extensions,
                )?;
            }

            if patch.replacements.is_empty() {
                return Err(ToolError::ConfigValidationError {
                    field: format!("{}.replacements", prefix),
                    message: "At least one replacement is required".to_string(),
                });
            }
            for (r_index, replacement) in patch.replacements.iter().enumerate() {
                if replacement.old.is_empty() {
                    return Err(ToolError::InvalidConfigValueError {
                        field: format!("{}.replacements[{}].old", prefix, r_index),
                        value: String::new(),
                        reason: "Text to replace cannot be empty".to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn into_patch_sets(self) -> Vec<PatchSet> {
        self.patches.into_iter().map(PatchDefinition::into_patch_set).collect()
    }
}

impl PatchDefinition {
    pub fn into_patch_set(self) -> PatchSet {
        let mut targets: Vec<Target> = self
            .files
            .unwrap_or_default()
            .into_iter()
            .map(|file| Target::File(PathBuf::from(file)))
            .collect();
        targets.extend(self.directories.unwrap_or_default().into_iter().map(|d| {
            Target::Directory {
                dir: PathBuf::from(d.dir),
                extensions: d.extensions,
            }
        }));

        let replacements = self
            .replacements
            .into_iter()
            .enumerate()
            .map(|(index, mut r)| {
                if r.label.is_empty() {
                    r.label = format!("replacement {}", index + 1);
                }
                r
            })
            .collect();

        PatchSet {
            name: self.name,
            description: self.description.unwrap_or_default(),
            targets,
            replacements,
            on_error: self.on_error.unwrap_or_default(),
        }
    }
}

impl Validate for PatchConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
