use goprune_core::PackageSet;
use serde::Serialize;
use std::path::PathBuf;

/// What a pruning pass deleted and what it failed to delete.
#[derive(Debug, Clone, Default)]
pub struct PruneOutcome {
    pub removed_files: Vec<PathBuf>,
    pub removed_dirs: Vec<PathBuf>,
    pub errors: Vec<String>,
}

impl PruneOutcome {
    pub fn is_empty(&self) -> bool {
        self.removed_files.is_empty() && self.removed_dirs.is_empty() && self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub root_package: String,
    pub project_dir: PathBuf,
    /// The project's own packages
    pub packages: PackageSet,
    /// External packages the project transitively needs
    pub imports: PackageSet,
    pub removed_files: Vec<PathBuf>,
    pub removed_dirs: Vec<PathBuf>,
    pub errors: Vec<String>,
}

impl CheckResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
