use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One literal substitution. Every occurrence of `old` is replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    #[serde(default)]
    pub label: String,
    pub old: String,
    pub new: String,
    /// Anchor guard: report when `old` is not found.
    #[serde(default)]
    pub required: bool,
}

impl Replacement {
    pub fn new(label: impl Into<String>, old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            old: old.into(),
            new: new.into(),
            required: false,
        }
    }

    pub fn anchored(
        label: impl Into<String>,
        old: impl Into<String>,
        new: impl Into<String>,
    ) -> Self {
        Self {
            required: true,
            ..Self::new(label, old, new)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    File(PathBuf),
    /// Non-recursive scan, files sorted by name.
    Directory {
        dir: PathBuf,
        extensions: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileErrorPolicy {
    #[default]
    Abort,
    Skip,
}

#[derive(Debug, Clone)]
pub struct PatchSet {
    pub name: String,
    pub description: String,
    pub targets: Vec<Target>,
    pub replacements: Vec<Replacement>,
    /// What a missing or unreadable target does to the run.
    pub on_error: FileErrorPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementReport {
    pub label: String,
    pub occurrences: usize,
    pub required: bool,
}

impl ReplacementReport {
    pub fn anchor_missing(&self) -> bool {
        self.required && self.occurrences == 0
    }
}

#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub changed: bool,
    pub reports: Vec<ReplacementReport>,
}

impl FileOutcome {
    pub fn missing_anchors(&self) -> impl Iterator<Item = &ReplacementReport> {
        self.reports.iter().filter(|r| r.anchor_missing())
    }
}

#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct PatchRunReport {
    pub set: String,
    pub dry_run: bool,
    pub files: Vec<FileOutcome>,
    pub skipped: Vec<SkippedFile>,
}

impl PatchRunReport {
    pub fn changed_files(&self) -> impl Iterator<Item = &FileOutcome> {
        self.files.iter().filter(|f| f.changed)
    }

    pub fn has_missing_anchors(&self) -> bool {
        self.files.iter().any(|f| f.missing_anchors().next().is_some())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Exists { count: u64 },
    Missing,
    Unclassified { message: String },
}
