//! Constants for Go source detection and vendor layout.
//!
//! These names are shared by parsing, package discovery and pruning so the
//! notion of "source file" and "test file" stays identical across the tools.

/// Suffix of files the Go toolchain compiles
pub const GO_SOURCE_SUFFIX: &str = ".go";

/// Suffix of test-only Go files
pub const GO_TEST_SUFFIX: &str = "_test.go";

/// The cgo pseudo-package whose doc comment carries the C preamble
pub const CGO_PSEUDO_PACKAGE: &str = "C";

/// Local include directive prefix inside a C preamble
pub const LOCAL_INCLUDE_PREFIX: &str = "#include \"";

/// Default name of the directory holding vendored packages
pub const DEFAULT_TARGET_DIR: &str = "vendor";

/// Environment variable naming the Go workspace
pub const GOPATH_ENV: &str = "GOPATH";

/// Returns true for files the Go toolchain would compile (tests included).
pub fn is_go_source(name: &str) -> bool {
    name.ends_with(GO_SOURCE_SUFFIX)
}

/// Returns true for `_test.go` files.
pub fn is_go_test(name: &str) -> bool {
    name.ends_with(GO_TEST_SUFFIX)
}
