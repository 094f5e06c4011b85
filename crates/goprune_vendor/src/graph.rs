use goprune_core::{PackageSet, ProjectLayout, collect_packages, is_internal};
use log::{debug, info, trace};

use crate::{extractor::list_imports, merge::merge_package_sets};

/// Computes every external package the project transitively needs.
pub fn collect_imports(layout: &ProjectLayout) -> PackageSet {
    let packages = collect_packages(layout);
    info!("Found {} packages in '{}'", packages.len(), layout.root_package);
    compute_closure(layout, packages)
}

/// Expands `initial` level by level until no unseen package is left.
///
/// Each level scans its packages in parallel and every package is scanned
/// at most once. Project packages drive the traversal but are never part
/// of the result.
pub fn compute_closure(layout: &ProjectLayout, initial: PackageSet) -> PackageSet {
    let mut imports = PackageSet::new();
    let mut seen = PackageSet::new();
    let mut frontier = initial;
    let mut level = 0;

    while !frontier.is_empty() {
        level += 1;
        debug!("Level {}: scanning {} packages", level, frontier.len());
        let wave: Vec<&str> = frontier.iter().map(String::as_str).collect();
        let found = merge_package_sets(&wave, |pkg| list_imports(layout, pkg));
        trace!("Level {} produced {} packages", level, found.len());
        imports.extend(found);

        seen.append(&mut frontier);
        frontier = imports.difference(&seen).cloned().collect();
    }

    imports.retain(|p| !is_internal(&layout.root_package, p));
    for p in &imports {
        debug!("Keeping: '{}'", p);
    }
    debug!("imports len: {} after {} levels", imports.len(), level);
    imports
}
