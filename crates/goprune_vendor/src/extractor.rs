use goprune_core::{
    CGO_PSEUDO_PACKAGE, GoFile, LOCAL_INCLUDE_PREFIX, PackageSet, ParseMode, ProjectLayout,
    clean_id, is_go_test, join_id, parse_dir, resolve_import,
};
use log::{debug, error, info, trace};
use std::path::Path;

use crate::merge::merge_package_sets;

/// Lists the packages `pkg` needs to keep working, `pkg` itself included.
///
/// Two passes run over the package's files: declared imports, then local
/// includes found in cgo preambles. Test files of vendored packages are
/// never read. A package whose directory is missing or does not parse
/// contributes only itself.
pub fn list_imports(layout: &ProjectLayout, pkg: &str) -> PackageSet {
    let pkg_path = layout.package_dir(pkg);
    debug!("listImports, pkgPath: '{}'", pkg_path.display());

    let vendored = layout.is_vendored(pkg);
    let no_vendored_tests = |file: &Path| {
        !(vendored && file.file_name().and_then(|n| n.to_str()).is_some_and(is_go_test))
    };

    let mut found = PackageSet::from([pkg.to_string()]);

    let files = match parse_dir(&pkg_path, no_vendored_tests, ParseMode::ImportsOnly) {
        Ok(Some(files)) => files,
        Ok(None) => {
            debug!("listImports, pkgPath does not exist: '{}'", pkg_path.display());
            return found;
        }
        Err(e) => {
            error!("Error parsing imports, pkgPath: '{}', err: '{:#}'", pkg_path.display(), e);
            return found;
        }
    };
    info!("Collecting imports for package '{}'", pkg);
    found.extend(merge_package_sets(&files, |f| declared_imports(&layout.root_package, pkg, f)));

    let files = match parse_dir(&pkg_path, no_vendored_tests, ParseMode::ImportsWithComments) {
        Ok(Some(files)) => files,
        Ok(None) => {
            debug!("listImports, pkgPath does not exist: '{}'", pkg_path.display());
            return found;
        }
        Err(e) => {
            error!("Error parsing comments, pkgPath: '{}', err: '{:#}'", pkg_path.display(), e);
            return found;
        }
    };
    info!("Collecting CGO imports for package '{}'", pkg);
    found.extend(merge_package_sets(&files, |f| preamble_includes(pkg, &pkg_path, f)));

    found
}

/// External packages imported by `file`, resolved against `pkg`.
pub fn declared_imports(root: &str, pkg: &str, file: &GoFile) -> PackageSet {
    file.import_paths()
        .filter_map(|imp| resolve_import(root, pkg, imp))
        .inspect(|imp| trace!("listImports, found '{}' in '{}'", imp, pkg))
        .collect()
}

/// Packages holding the headers a cgo preamble includes.
///
/// Only `#include "..."` directives count, and only when the header's
/// directory exists next to the package's sources.
pub fn preamble_includes(pkg: &str, pkg_path: &Path, file: &GoFile) -> PackageSet {
    let mut found = PackageSet::new();
    for decl in &file.imports {
        for spec in decl.specs.iter().filter(|s| s.path == CGO_PSEUDO_PACKAGE) {
            let Some(preamble) = decl.preamble_for(spec) else {
                continue;
            };
            for include_dir in include_dirs(preamble) {
                // Absolute include paths still live under the package
                let dir = pkg_path.join(include_dir.trim_start_matches('/'));
                // Anything but a definite "not there" keeps the directory
                if matches!(dir.try_exists(), Ok(false)) {
                    trace!("Include dir does not exist: '{}'", include_dir);
                    continue;
                }
                let id = join_id(pkg, &include_dir);
                trace!("listImports, found cgo include dir '{}'", id);
                found.insert(id);
            }
        }
    }
    found
}

/// Directories of the local headers included by a C preamble, `.` excluded.
pub(crate) fn include_dirs(preamble: &str) -> Vec<String> {
    preamble
        .lines()
        .map(str::trim)
        .filter_map(|line| line.strip_prefix(LOCAL_INCLUDE_PREFIX))
        .filter_map(|rest| rest.split_once('"').map(|(header, _)| header))
        .map(|header| match header.rfind('/') {
            Some(0) => "/".to_string(),
            Some(idx) => clean_id(&header[..idx]),
            None => ".".to_string(),
        })
        .filter(|dir| dir != ".")
        .collect()
}
