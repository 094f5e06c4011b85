use goprune_core::{PackageSet, ancestor_packages, is_go_source, is_go_test, slash_path};
use log::{debug, error, info, trace};
use std::{
    collections::BTreeSet,
    fs, io,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

use crate::types::PruneOutcome;

/// Every proper prefix of every package in `imports`.
pub fn ancestor_set(imports: &PackageSet) -> PackageSet {
    imports.iter().flat_map(|i| ancestor_packages(i)).collect()
}

/// Deletes everything under `target_dir` that `imports` does not need.
///
/// Directories that are neither a needed package nor on the way to one are
/// removed whole. Go files are removed when they are tests or when their
/// directory is not a needed package; other files are left alone. Errors are
/// logged and collected, the walk carries on.
pub fn remove_unused_packages(imports: &PackageSet, target_dir: &Path) -> PruneOutcome {
    let parents = ancestor_set(imports);
    let mut outcome = PruneOutcome::default();

    let mut walker = WalkDir::new(target_dir).sort_by_file_name().into_iter();
    while let Some(res) = walker.next() {
        let entry = match res {
            Ok(entry) => entry,
            Err(e) if is_not_found(&e) => {
                trace!("removeUnusedImports, already gone: {}", e);
                continue;
            }
            Err(e) => {
                error!("Error walking '{}': {}", target_dir.display(), e);
                outcome.errors.push(e.to_string());
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }
        let path = entry.path();
        let Ok(rel) = path.strip_prefix(target_dir) else {
            continue;
        };
        trace!("removeUnusedImports, path: '{}'", path.display());

        if !entry.file_type().is_dir() {
            let name = entry.file_name().to_string_lossy();
            let pkg = rel.parent().map(slash_path).unwrap_or_default();
            if is_go_test(&name) || (is_go_source(&name) && !imports.contains(&pkg)) {
                debug!("Removing unused source file: '{}'", path.display());
                match fs::remove_file(path) {
                    Ok(()) => outcome.removed_files.push(path.to_path_buf()),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => {
                        error!("Error removing file: '{}', err: '{}'", path.display(), e);
                        outcome.errors.push(format!("{}: {}", path.display(), e));
                    }
                }
            }
            continue;
        }

        let pkg = slash_path(rel);
        if imports.contains(&pkg) || parents.contains(&pkg) {
            continue;
        }
        info!("Removing unused dir: '{}'", path.display());
        match fs::remove_dir_all(path) {
            Ok(()) => outcome.removed_dirs.push(path.to_path_buf()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                error!("Error removing unused dir, path: '{}', err: '{}'", path.display(), e);
                outcome.errors.push(format!("{}: {}", path.display(), e));
            }
        }
        walker.skip_current_dir();
    }

    outcome
}

/// Removes directories under `target_dir` left without any entries.
///
/// Runs full passes until one removes nothing, since emptying a directory
/// can leave its parent empty. `target_dir` itself is kept. A directory that
/// cannot be removed is reported once, however many passes run.
pub fn remove_empty_dirs(target_dir: &Path) -> PruneOutcome {
    let mut outcome = PruneOutcome::default();
    let mut failed: BTreeSet<PathBuf> = BTreeSet::new();

    loop {
        let mut count = 0;
        let mut walker = WalkDir::new(target_dir).sort_by_file_name().into_iter();
        while let Some(res) = walker.next() {
            let entry = match res {
                Ok(entry) => entry,
                Err(e) if is_not_found(&e) => continue,
                Err(e) => {
                    error!("Error walking '{}': {}", target_dir.display(), e);
                    outcome.errors.push(e.to_string());
                    continue;
                }
            };
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                continue;
            }
            let path = entry.path();
            match fs::remove_dir(path) {
                Ok(()) => {
                    info!("Removed Empty dir: '{}'", path.display());
                    outcome.removed_dirs.push(path.to_path_buf());
                    count += 1;
                    walker.skip_current_dir();
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => walker.skip_current_dir(),
                Err(e) if e.kind() == io::ErrorKind::DirectoryNotEmpty => {}
                Err(e) => {
                    if failed.insert(path.to_path_buf()) {
                        error!("Error removing empty dir: '{}', err: '{}'", path.display(), e);
                        outcome.errors.push(format!("{}: {}", path.display(), e));
                    }
                }
            }
        }
        debug!("removeEmptyDirs, removed {} dirs in this pass", count);
        if count == 0 {
            break;
        }
    }

    outcome
}

fn is_not_found(e: &walkdir::Error) -> bool {
    e.io_error().is_some_and(|io| io.kind() == io::ErrorKind::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str, content: &str) {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
    }

    fn set(ids: &[&str]) -> PackageSet {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_ancestor_set() {
        let parents = ancestor_set(&set(&["github.com/foo/bar", "gopkg.in/yaml.v2"]));
        assert_eq!(parents, set(&["github.com", "github.com/foo", "gopkg.in"]));
    }

    #[test]
    fn test_removes_unused_package_and_keeps_used_one() {
        let temp_dir = TempDir::new().unwrap();
        let vendor = temp_dir.path();
        create_test_file(vendor, "github.com/foo/bar/bar.go", "package bar\n");
        create_test_file(vendor, "github.com/foo/baz/baz.go", "package baz\n");
        create_test_file(vendor, "golang.org/x/net/net.go", "package net\n");

        let outcome = remove_unused_packages(&set(&["github.com/foo/bar"]), vendor);
        assert!(outcome.errors.is_empty());
        assert!(vendor.join("github.com/foo/bar/bar.go").exists());
        assert!(!vendor.join("github.com/foo/baz").exists());
        assert!(!vendor.join("golang.org").exists());
        assert_eq!(outcome.removed_dirs.len(), 2);
    }

    #[test]
    fn test_ancestor_dirs_survive() {
        let temp_dir = TempDir::new().unwrap();
        let vendor = temp_dir.path();
        create_test_file(vendor, "github.com/foo/LICENSE", "MIT");
        create_test_file(vendor, "github.com/foo/bar/deep/pkg/pkg.go", "package pkg\n");

        let outcome = remove_unused_packages(&set(&["github.com/foo/bar/deep/pkg"]), vendor);
        assert!(outcome.errors.is_empty());
        assert!(vendor.join("github.com/foo/LICENSE").exists());
        assert!(vendor.join("github.com/foo/bar/deep/pkg/pkg.go").exists());
    }

    #[test]
    fn test_stale_sources_in_ancestor_dirs_are_removed() {
        let temp_dir = TempDir::new().unwrap();
        let vendor = temp_dir.path();
        create_test_file(vendor, "github.com/foo/bar/bar.go", "package bar\n");
        create_test_file(vendor, "github.com/foo/bar/sub/sub.go", "package sub\n");
        create_test_file(vendor, "github.com/foo/bar/sub/data.json", "{}");

        let outcome = remove_unused_packages(&set(&["github.com/foo/bar/sub"]), vendor);
        // bar is only an ancestor of a needed package
        assert!(!vendor.join("github.com/foo/bar/bar.go").exists());
        assert!(vendor.join("github.com/foo/bar/sub/sub.go").exists());
        assert!(vendor.join("github.com/foo/bar/sub/data.json").exists());
        assert_eq!(outcome.removed_files, vec![vendor.join("github.com/foo/bar/bar.go")]);
    }

    #[test]
    fn test_test_files_are_removed_from_used_packages() {
        let temp_dir = TempDir::new().unwrap();
        let vendor = temp_dir.path();
        create_test_file(vendor, "github.com/foo/bar/bar.go", "package bar\n");
        create_test_file(vendor, "github.com/foo/bar/bar_test.go", "package bar\n");
        create_test_file(vendor, "github.com/foo/bar/testdata/x.txt", "x");

        remove_unused_packages(&set(&["github.com/foo/bar"]), vendor);
        assert!(vendor.join("github.com/foo/bar/bar.go").exists());
        assert!(!vendor.join("github.com/foo/bar/bar_test.go").exists());
        assert!(!vendor.join("github.com/foo/bar/testdata").exists());
    }

    #[test]
    fn test_top_level_files() {
        let temp_dir = TempDir::new().unwrap();
        let vendor = temp_dir.path();
        create_test_file(vendor, "vendor.json", "{}");
        create_test_file(vendor, "stray.go", "package stray\n");

        remove_unused_packages(&PackageSet::new(), vendor);
        assert!(vendor.join("vendor.json").exists());
        assert!(!vendor.join("stray.go").exists());
    }

    #[test]
    fn test_missing_target_dir() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("vendor");

        assert!(remove_unused_packages(&set(&["a.io/b"]), &missing).is_empty());
        assert!(remove_empty_dirs(&missing).is_empty());
    }

    #[test]
    fn test_remove_empty_dirs_cascades() {
        let temp_dir = TempDir::new().unwrap();
        let vendor = temp_dir.path();
        fs::create_dir_all(vendor.join("a.io/b/c/d")).unwrap();
        fs::create_dir_all(vendor.join("a.io/e")).unwrap();
        create_test_file(vendor, "x.io/keep/keep.go", "package keep\n");

        let outcome = remove_empty_dirs(vendor);
        assert!(outcome.errors.is_empty());
        assert!(!vendor.join("a.io").exists());
        assert!(vendor.join("x.io/keep/keep.go").exists());
        assert!(vendor.exists());
        assert_eq!(outcome.removed_dirs.len(), 5);
    }

    #[test]
    fn test_pruning_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let vendor = temp_dir.path();
        create_test_file(vendor, "github.com/foo/bar/bar.go", "package bar\n");
        create_test_file(vendor, "github.com/foo/bar/bar_test.go", "package bar\n");
        create_test_file(vendor, "github.com/foo/baz/baz.go", "package baz\n");
        create_test_file(vendor, "github.com/foo/bar/old/old.go", "package old\n");
        let imports = set(&["github.com/foo/bar", "github.com/foo/bar/old/gone"]);

        let first = remove_unused_packages(&imports, vendor);
        let first_empty = remove_empty_dirs(vendor);
        assert!(!first.is_empty());
        assert!(!first_empty.is_empty());

        let second = remove_unused_packages(&imports, vendor);
        let second_empty = remove_empty_dirs(vendor);
        assert!(second.is_empty());
        assert!(second_empty.is_empty());
        assert!(vendor.join("github.com/foo/bar/bar.go").exists());
    }

    /// Makes `dir` read-only. Returns false when the current user can still
    /// write into it (root), in which case permission tests cannot fail anything.
    #[cfg(unix)]
    fn make_read_only(dir: &Path) -> bool {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o555)).unwrap();
        let marker = dir.join(".writable");
        if fs::write(&marker, "").is_ok() {
            fs::remove_file(&marker).unwrap();
            make_writable(dir);
            return false;
        }
        true
    }

    #[cfg(unix)]
    fn make_writable(dir: &Path) {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_unused_package_removal_error_is_collected() {
        let temp_dir = TempDir::new().unwrap();
        let vendor = temp_dir.path();
        create_test_file(vendor, "a.io/keep/keep.go", "package keep\n");
        create_test_file(vendor, "a.io/unused/unused.go", "package unused\n");
        create_test_file(vendor, "b.io/gone/gone.go", "package gone\n");
        if !make_read_only(&vendor.join("a.io")) {
            return;
        }

        let outcome = remove_unused_packages(&set(&["a.io/keep"]), vendor);
        make_writable(&vendor.join("a.io"));

        assert_eq!(outcome.errors.len(), 1, "errors: {:?}", outcome.errors);
        assert!(outcome.errors[0].contains("a.io/unused"));
        assert!(vendor.join("a.io/unused").exists());
        // The walk carries on past the failure
        assert!(!vendor.join("b.io").exists());
        assert!(vendor.join("a.io/keep/keep.go").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_empty_dir_removal_error_is_collected() {
        let temp_dir = TempDir::new().unwrap();
        let vendor = temp_dir.path();
        fs::create_dir_all(vendor.join("a.io/empty")).unwrap();
        create_test_file(vendor, "a.io/keep/keep.go", "package keep\n");
        fs::create_dir_all(vendor.join("c.io/d/e")).unwrap();
        if !make_read_only(&vendor.join("a.io")) {
            return;
        }

        let outcome = remove_empty_dirs(vendor);
        make_writable(&vendor.join("a.io"));

        // Reported once even though several passes ran
        assert_eq!(outcome.errors.len(), 1, "errors: {:?}", outcome.errors);
        assert!(outcome.errors[0].contains("a.io/empty"));
        assert!(vendor.join("a.io/empty").is_dir());
        assert!(!vendor.join("c.io").exists());
        assert!(vendor.join("a.io/keep/keep.go").exists());
    }
}
