//! Vendor directory pruning for Go projects.
//!
//! This crate works out which vendored packages a Go project transitively
//! imports, following cgo `#include "..."` directives as well as import
//! declarations, and deletes everything else from the vendor directory.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use goprune_vendor::{Config, run_vendor_prune};
//! use std::io::{BufWriter, Write};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = Config {
//!     directory: std::path::PathBuf::from("/go/src/example.com/app"),
//!     target: std::path::PathBuf::from("vendor"),
//!     gopath: Some("/go".to_string()),
//!     json: false,
//!     root_package: None,
//! };
//!
//! let result = run_vendor_prune(cfg)?;
//!
//! // Use buffered output for better performance
//! let mut stdout = BufWriter::new(std::io::stdout());
//! goprune_vendor::print_report(&mut stdout, &result)?;
//! stdout.flush()?;
//! # Ok(())
//! # }
//! ```

mod checker;
mod config;
mod extractor;
mod graph;
mod merge;
mod pruner;
mod reporter;
mod types;

// Re-export public API
pub use checker::{run_list_closure, run_vendor_prune};
pub use config::Config;
pub use extractor::{declared_imports, list_imports, preamble_includes};
pub use graph::{collect_imports, compute_closure};
pub use merge::merge_package_sets;
pub use pruner::{ancestor_set, remove_empty_dirs, remove_unused_packages};
pub use reporter::{print_closure, print_json, print_report};
pub use types::{CheckResult, PruneOutcome};
