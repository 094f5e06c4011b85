use anyhow::{Context, Result, anyhow};
use clap::Parser;
use goprune_core::{DEFAULT_TARGET_DIR, GOPATH_ENV, ProjectLayout, guess_root_package};
use log::{debug, info};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "vendor")]
#[command(about = "Remove unused packages and files from your Go project's ./vendor dir")]
pub struct Config {
    /// The directory in which to run
    #[arg(short = 'C', long, default_value = ".")]
    pub directory: PathBuf,

    /// The directory to prune, relative to the project directory
    #[arg(short = 'T', long, default_value = DEFAULT_TARGET_DIR, hide = true)]
    pub target: PathBuf,

    /// The Go workspace the project lives in
    #[arg(long, env = GOPATH_ENV, hide = true)]
    pub gopath: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    #[clap(skip)]
    pub root_package: Option<String>,
}

impl Config {
    /// Initialize the config by resolving the project directory and its root package.
    ///
    /// Fails before anything is read or deleted when GOPATH does not fit.
    pub fn initialize(&mut self) -> Result<()> {
        let dir = self
            .directory
            .canonicalize()
            .with_context(|| format!("Cannot use directory '{}'", self.directory.display()))?;
        debug!("dir: '{}'", dir.display());

        let root_package = guess_root_package(&dir, self.gopath.as_deref())?;
        info!("Using root package: {}", root_package);

        self.directory = dir;
        self.root_package = Some(root_package);
        Ok(())
    }

    /// Get the project layout, returning an error if not initialized
    pub fn layout(&self) -> Result<ProjectLayout> {
        let root_package = self
            .root_package
            .as_deref()
            .ok_or_else(|| anyhow!("Config not initialized - call initialize() first"))?;
        Ok(ProjectLayout::new(&self.directory, &self.target, root_package))
    }
}
