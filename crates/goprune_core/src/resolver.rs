use log::trace;
use path_clean::clean;
use std::path::{Component, Path, PathBuf};

use crate::types::PackageSet;

/// Where a project lives on disk and what it is called.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    /// Absolute project directory
    pub dir: PathBuf,
    /// Vendor directory, relative to `dir`
    pub target: PathBuf,
    /// Identifier of the project itself, e.g. `example.com/app`
    pub root_package: String,
}

impl ProjectLayout {
    pub fn new(dir: impl Into<PathBuf>, target: impl Into<PathBuf>, root_package: &str) -> Self {
        Self { dir: dir.into(), target: target.into(), root_package: root_package.to_string() }
    }

    pub fn target_dir(&self) -> PathBuf {
        self.dir.join(&self.target)
    }

    /// Maps a package identifier to the directory holding its sources.
    pub fn package_dir(&self, pkg: &str) -> PathBuf {
        if pkg == self.root_package {
            return self.dir.clone();
        }
        match pkg.strip_prefix(&self.root_package).and_then(|rest| rest.strip_prefix('/')) {
            Some(rel) => self.dir.join(rel),
            None => self.target_dir().join(pkg),
        }
    }

    /// Maps a directory under the project to its internal package identifier.
    pub fn internal_package(&self, dir: &Path) -> Option<String> {
        let rel = dir.strip_prefix(&self.dir).ok()?;
        let rel = slash_path(rel);
        if rel.is_empty() {
            Some(self.root_package.clone())
        } else {
            Some(format!("{}/{}", self.root_package, rel))
        }
    }

    /// Packages outside the project are read from the vendor directory.
    pub fn is_vendored(&self, pkg: &str) -> bool {
        !is_internal(&self.root_package, pkg)
    }
}

/// Returns true when the first path segment looks like a domain.
pub fn is_external(path: &str) -> bool {
    path.split('/').next().is_some_and(|first| first.contains('.'))
}

pub fn is_internal(root: &str, id: &str) -> bool {
    id == root || id.strip_prefix(root).is_some_and(|rest| rest.starts_with('/'))
}

/// Lexically cleans a package identifier, keeping `/` as the separator.
pub fn clean_id(id: &str) -> String {
    slash_path(&clean(id))
}

pub fn join_id(pkg: &str, rel: &str) -> String {
    clean_id(&format!("{}/{}", pkg, rel))
}

/// Resolves an import path declared in package `pkg`.
///
/// Returns `None` for standard library imports and for imports of the
/// project's own packages.
pub fn resolve_import(root: &str, pkg: &str, request: &str) -> Option<String> {
    if !is_external(request) {
        trace!("Skipping standard library import: '{}'", request);
        return None;
    }
    let first = request.split('/').next().unwrap_or_default();
    let id = if first == "." || first == ".." {
        join_id(pkg, request)
    } else {
        request.to_string()
    };
    if is_internal(root, &id) {
        trace!("Skipping internal import: '{}'", id);
        return None;
    }
    Some(id)
}

/// Every proper prefix of `id`: `a/b/c` gives `a/b` and `a`.
pub fn ancestor_packages(id: &str) -> PackageSet {
    let mut parents = PackageSet::new();
    let mut cur = id.trim_end_matches('/');
    while let Some(idx) = cur.rfind('/') {
        cur = &cur[..idx];
        if !cur.is_empty() {
            parents.insert(cur.to_string());
        }
    }
    parents
}

/// Renders a relative path as a `/`-separated identifier.
pub fn slash_path(p: &Path) -> String {
    let parts: Vec<String> = p
        .components()
        .map(|c| match c {
            Component::RootDir => String::new(),
            other => other.as_os_str().to_string_lossy().into_owned(),
        })
        .collect();
    if parts.len() == 1 && parts[0].is_empty() { "/".to_string() } else { parts.join("/") }
}
