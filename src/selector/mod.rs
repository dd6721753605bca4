use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::catalog::matcher::file_name;
use crate::catalog::CompiledCatalog;

pub mod git;

pub use git::{parse_name_list, GitStagedFiles, StagedFiles, StaticStagedFiles};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Every candidate under the workspace root
    Full,
    /// Only files staged for the next commit
    Staged,
}

/// A file chosen for analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Location on disk
    pub path: PathBuf,
    /// Workspace-relative path with forward slashes, used in reports
    pub relative: PathBuf,
}

#[derive(Debug, Default)]
pub struct Selection {
    /// Sorted by relative path
    pub candidates: Vec<Candidate>,
    pub license_files: Vec<PathBuf>,
    /// Problems worth telling the user about that did not stop selection
    pub warnings: Vec<String>,
}

/// Enumerates the files a scan looks at
pub struct FileSelector<'a> {
    catalog: &'a CompiledCatalog,
}

impl<'a> FileSelector<'a> {
    pub fn new(catalog: &'a CompiledCatalog) -> Self {
        Self { catalog }
    }

    /// Recursively walk `root`, pruning excluded directories before descending
    pub fn select_full_tree(&self, root: &Path) -> Selection {
        let mut selection = Selection::default();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || !self.catalog.is_excluded(&format!("{}/", relative_str(root, entry.path())))
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            self.consider(root, entry.path(), &mut selection);
        }

        finish(selection)
    }

    /// Select from the files `source` reports as staged.
    ///
    /// A failed or empty query yields zero candidates plus a warning; it never
    /// falls back to walking the whole tree.
    pub fn select_staged(&self, root: &Path, source: &dyn StagedFiles) -> Selection {
        let mut selection = Selection::default();

        let staged = match source.staged_files(root) {
            Ok(staged) => staged,
            Err(e) => {
                let message = format!("Could not list staged files ({:#}); no files were checked", e);
                warn!("{}", message);
                selection.warnings.push(message);
                return selection;
            }
        };

        if staged.is_empty() {
            let message = "No staged files found; no files were checked".to_string();
            warn!("{}", message);
            selection.warnings.push(message);
            return selection;
        }

        let mut missing = Vec::new();
        for file in staged {
            let path = if file.is_absolute() { file } else { root.join(file) };
            if !path.is_file() {
                missing.push(relative_str(root, &path));
                continue;
            }
            self.consider(root, &path, &mut selection);
        }

        if !missing.is_empty() {
            let message = format!(
                "{} staged path(s) not found under {}: {}",
                missing.len(),
                root.display(),
                missing.join(", ")
            );
            warn!("{}", message);
            selection.warnings.push(message);
        }

        finish(selection)
    }

    fn consider(&self, root: &Path, path: &Path, selection: &mut Selection) {
        let relative = relative_str(root, path);
        if self.catalog.is_excluded(&relative) {
            debug!("Excluded {}", relative);
            return;
        }

        let relative = PathBuf::from(relative);
        if is_license_file(path) {
            selection.license_files.push(relative.clone());
        }
        if self.catalog.is_candidate(path) {
            selection.candidates.push(Candidate {
                path: path.to_path_buf(),
                relative,
            });
        }
    }
}

fn finish(mut selection: Selection) -> Selection {
    selection.candidates.sort_by(|a, b| a.relative.cmp(&b.relative));
    selection.candidates.dedup_by(|a, b| a.relative == b.relative);
    selection.license_files.sort();
    selection.license_files.dedup();
    selection
}

fn is_license_file(path: &Path) -> bool {
    let name = file_name(path).to_uppercase();
    ["LICENSE", "LICENCE", "COPYING"].iter().any(|prefix| name.starts_with(prefix))
}

/// Path relative to `root` joined with `/`, whatever the platform separator
pub fn relative_str(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
