use log::{debug, trace};
use path_clean::clean;
use std::{
    env, fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::resolver::slash_path;

/// Problems with the environment that stop a run before any work starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GOPATH not set")]
    SourceRootUnset,

    #[error("GOPATH '{0}' is not a single path")]
    AmbiguousSourceRoot(String),

    #[error("Your project dir '{dir}' is not a subdir of '{src}'")]
    NotUnderSourceRoot { dir: PathBuf, src: PathBuf },

    #[error("'{src}' does not exist or cannot be read")]
    MissingSourceRoot {
        src: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Derives the project's package identifier from its location under
/// `$GOPATH/src`.
///
/// `dir` is expected to be absolute and free of `.`/`..` components.
pub fn guess_root_package(dir: &Path, gopath: Option<&str>) -> Result<String, ConfigError> {
    debug!("GOPATH is '{}'", gopath.unwrap_or_default());
    let gopath = gopath.filter(|g| !g.is_empty()).ok_or(ConfigError::SourceRootUnset)?;
    if env::split_paths(gopath).count() > 1 {
        return Err(ConfigError::AmbiguousSourceRoot(gopath.to_string()));
    }

    let src = clean(Path::new(gopath).join("src"));
    trace!("srcPath: '{}'", src.display());
    // GOPATH may go through a symlink while `dir` is usually canonical
    let canonical = src.canonicalize().ok();
    let rel = [Some(&src), canonical.as_ref()]
        .into_iter()
        .flatten()
        .find_map(|s| dir.strip_prefix(s).ok())
        .filter(|rel| !rel.as_os_str().is_empty())
        .ok_or_else(|| ConfigError::NotUnderSourceRoot {
            dir: dir.to_path_buf(),
            src: src.clone(),
        })?;

    fs::metadata(&src)
        .map_err(|source| ConfigError::MissingSourceRoot { src: src.clone(), source })?;

    let root_package = slash_path(rel);
    debug!("rootPackage: '{}'", root_package);
    Ok(root_package)
}
