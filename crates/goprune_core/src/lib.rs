//! Core utilities for goprune tools.
//!
//! This crate provides shared functionality for analyzing Go projects laid
//! out under a GOPATH, including:
//! - Parsing package clauses and import declarations from Go files
//! - Resolving import paths to package identifiers
//! - Collecting the packages a project is made of
//! - Deriving the project's root package from GOPATH

mod collector;
mod config;
mod constants;
mod parser;
mod resolver;
mod types;

// Re-export public API
pub use collector::collect_packages;
pub use config::{ConfigError, guess_root_package};
pub use constants::{
    CGO_PSEUDO_PACKAGE, DEFAULT_TARGET_DIR, GO_SOURCE_SUFFIX, GO_TEST_SUFFIX, GOPATH_ENV,
    LOCAL_INCLUDE_PREFIX, is_go_source, is_go_test,
};
pub use parser::{parse_dir, parse_file, parse_source};
pub use resolver::{
    ProjectLayout, ancestor_packages, clean_id, is_external, is_internal, join_id, resolve_import,
    slash_path,
};
pub use types::{GoFile, ImportDecl, ImportSpec, PackageSet, ParseMode};
