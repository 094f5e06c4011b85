use anyhow::Result;
use goprune_core::{PackageSet, ProjectLayout, collect_packages};
use log::{debug, info, warn};

use crate::{
    config::Config,
    graph::compute_closure,
    pruner::{remove_empty_dirs, remove_unused_packages},
    types::CheckResult,
};

/// Prunes the project's vendor directory down to what it transitively imports.
///
/// Configuration problems are returned before anything is read. Failures while
/// deleting are logged and gathered into [`CheckResult::errors`]; both pruning
/// stages always run.
pub fn run_vendor_prune(mut cfg: Config) -> Result<CheckResult> {
    info!("Starting vendor prune");
    cfg.initialize()?;
    let layout = cfg.layout()?;

    let (packages, imports) = closure_for(&layout);
    let mut result = new_result(&layout, packages, imports);

    let target_dir = layout.target_dir();
    info!("Pruning '{}'", target_dir.display());
    let unused = remove_unused_packages(&result.imports, &target_dir);
    debug!(
        "Removed {} unused dirs and {} files",
        unused.removed_dirs.len(),
        unused.removed_files.len()
    );
    let empty = remove_empty_dirs(&target_dir);
    debug!("Removed {} empty dirs", empty.removed_dirs.len());

    for outcome in [unused, empty] {
        result.removed_files.extend(outcome.removed_files);
        result.removed_dirs.extend(outcome.removed_dirs);
        result.errors.extend(outcome.errors);
    }

    if result.has_errors() {
        warn!("Vendor prune finished with {} errors", result.errors.len());
    } else {
        info!("Vendor prune complete");
    }
    Ok(result)
}

/// Computes the closure without touching the vendor directory.
pub fn run_list_closure(mut cfg: Config) -> Result<CheckResult> {
    info!("Starting closure listing");
    cfg.initialize()?;
    let layout = cfg.layout()?;

    let (packages, imports) = closure_for(&layout);
    Ok(new_result(&layout, packages, imports))
}

fn closure_for(layout: &ProjectLayout) -> (PackageSet, PackageSet) {
    let packages = collect_packages(layout);
    info!("Found {} packages in '{}'", packages.len(), layout.root_package);
    let imports = compute_closure(layout, packages.clone());
    info!("Project needs {} external packages", imports.len());
    (packages, imports)
}

fn new_result(layout: &ProjectLayout, packages: PackageSet, imports: PackageSet) -> CheckResult {
    CheckResult {
        root_package: layout.root_package.clone(),
        project_dir: layout.dir.clone(),
        packages,
        imports,
        removed_files: Vec::new(),
        removed_dirs: Vec::new(),
        errors: Vec::new(),
    }
}
