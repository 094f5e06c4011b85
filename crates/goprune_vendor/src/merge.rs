use goprune_core::PackageSet;
use rayon::prelude::*;

/// Runs `produce` for every item on the rayon pool and unions the results.
///
/// Returns only once every producer has finished.
pub fn merge_package_sets<T, F>(items: &[T], produce: F) -> PackageSet
where
    T: Sync,
    F: Fn(&T) -> PackageSet + Sync + Send,
{
    items.par_iter().map(produce).reduce(PackageSet::new, |mut acc, mut set| {
        if acc.len() < set.len() {
            std::mem::swap(&mut acc, &mut set);
        }
        acc.extend(set);
        acc
    })
}
