use crate::core::TextStore;
use crate::domain::model::{
    FileErrorPolicy, FileOutcome, PatchRunReport, PatchSet, Replacement, ReplacementReport,
    SkippedFile, Target,
};
use crate::utils::error::Result;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Applies `replacements` in order, each one seeing the output of the previous.
///
/// `old` is matched literally first. Only when it matches nothing and the
/// content has CRLF line endings, `\n` inside `old` and `new` is matched and
/// written as `\r\n`.
pub fn apply_replacements(
    content: &str,
    replacements: &[Replacement],
) -> (String, Vec<ReplacementReport>) {
    let crlf = content.contains("\r\n");
    let mut current = content.to_string();
    let mut reports = Vec::with_capacity(replacements.len());

    for replacement in replacements {
        let (old, new, occurrences) = match count(&current, &replacement.old) {
            0 if crlf => {
                let old = line_endings(&replacement.old);
                let occurrences = count(&current, &old);
                (old, line_endings(&replacement.new), occurrences)
            }
            occurrences => (
                Cow::Borrowed(replacement.old.as_str()),
                Cow::Borrowed(replacement.new.as_str()),
                occurrences,
            ),
        };

        if occurrences > 0 {
            current = current.replace(old.as_ref(), new.as_ref());
        }

        reports.push(ReplacementReport {
            label: replacement.label.clone(),
            occurrences,
            required: replacement.required,
        });
    }

    (current, reports)
}

fn count(content: &str, old: &str) -> usize {
    if old.is_empty() {
        0
    } else {
        content.matches(old).count()
    }
}

fn line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\n') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\n', "\r\n"))
    } else {
        Cow::Borrowed(text)
    }
}

pub struct Patcher<S: TextStore> {
    store: S,
    dry_run: bool,
}

impl<S: TextStore> Patcher<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Patches one file. The file is written only when its content changed.
    pub fn patch_file(&self, path: &Path, replacements: &[Replacement]) -> Result<FileOutcome> {
        let original = self.store.read_text(path)?;
        let (patched, reports) = apply_replacements(&original, replacements);

        for report in &reports {
            if report.anchor_missing() {
                tracing::error!(
                    "❌ Anchor not found for '{}' in {}",
                    report.label,
                    path.display()
                );
            } else {
                tracing::debug!(
                    "'{}': {} occurrence(s) in {}",
                    report.label,
                    report.occurrences,
                    path.display()
                );
            }
        }

        let changed = patched != original;
        if changed && !self.dry_run {
            self.store.write_text(path, &patched)?;
            tracing::info!("✏️ Updated {}", path.display());
        } else if changed {
            tracing::info!("🔍 Would update {}", path.display());
        } else {
            tracing::debug!("No changes for {}", path.display());
        }

        Ok(FileOutcome {
            path: path.to_path_buf(),
            changed,
            reports,
        })
    }

    pub fn run(&self, set: &PatchSet) -> Result<PatchRunReport> {
        tracing::info!("🔧 Applying patch set '{}'", set.name);

        let mut report = PatchRunReport {
            set: set.name.clone(),
            dry_run: self.dry_run,
            files: Vec::new(),
            skipped: Vec::new(),
        };

        for target in &set.targets {
            let files = match self.resolve(target) {
                Ok(files) => files,
                Err(e) if set.on_error == FileErrorPolicy::Skip => {
                    tracing::warn!("⚠️ Skipping target {:?}: {}", target, e);
                    report.skipped.push(SkippedFile {
                        path: target_path(target).to_path_buf(),
                        reason: e.to_string(),
                    });
                    continue;
                }
                Err(e) => return Err(e),
            };

            for file in files {
                match self.patch_file(&file, &set.replacements) {
                    Ok(outcome) => report.files.push(outcome),
                    Err(e) if set.on_error == FileErrorPolicy::Skip => {
                        tracing::warn!("⚠️ Skipping {}: {}", file.display(), e);
                        report.skipped.push(SkippedFile {
                            path: file,
                            reason: e.to_string(),
                        });
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        tracing::info!(
            "✅ Patch set '{}' done: {} changed, {} unchanged, {} skipped",
            set.name,
            report.changed_files().count(),
            report.files.len() - report.changed_files().count(),
            report.skipped.len()
        );

        Ok(report)
    }

    fn resolve(&self, target: &Target) -> Result<Vec<PathBuf>> {
        match target {
            Target::File(path) => Ok(vec![path.clone()]),
            Target::Directory { dir, extensions } => self.store.list_files(dir, extensions),
        }
    }
}

fn target_path(target: &Target) -> &Path {
    match target {
        Target::File(path) => path,
        Target::Directory { dir, .. } => dir,
    }
}
