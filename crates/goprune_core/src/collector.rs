use ignore::WalkBuilder;
use log::{debug, error, info, trace, warn};

use crate::{
    parser::parse_dir,
    resolver::ProjectLayout,
    types::{PackageSet, ParseMode},
};

/// Lists the project's own packages.
///
/// Every directory under the project holding a Go file with a package
/// clause is a package. Hidden directories and the vendor directory are
/// not descended into.
pub fn collect_packages(layout: &ProjectLayout) -> PackageSet {
    info!("Collecting packages in '{}'", layout.root_package);
    let mut packages = PackageSet::new();
    let root = &layout.dir;
    let target = layout.target_dir();
    debug!("Walking directory tree from root: {}", root.display());

    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .hidden(true)
        .filter_entry(move |dent| dent.path() != target)
        .build();

    for res in walker {
        let dent = match res {
            Ok(dent) => dent,
            Err(e) => {
                warn!("{}", e);
                continue;
            }
        };
        if !dent.file_type().is_some_and(|ft| ft.is_dir()) {
            continue;
        }
        let path = dent.path();
        trace!("path: '{}'", path.display());

        match parse_dir(path, |_| true, ParseMode::PackageClauseOnly) {
            Ok(Some(files)) if !files.is_empty() => {
                if let Some(pkg) = layout.internal_package(path) {
                    debug!("Adding package: '{}'", pkg);
                    packages.insert(pkg);
                }
            }
            Ok(_) => {}
            Err(e) => error!("Error parsing package clause in '{}': {:#}", path.display(), e),
        }
    }

    debug!("Collected {} packages", packages.len());
    packages
}
