use std::collections::BTreeSet;

/// A set of slash-separated package identifiers.
///
/// Ordered so that logs and reports list packages deterministically.
pub type PackageSet = BTreeSet<String>;

/// How much of a Go file the parser looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Stop after the `package` clause
    PackageClauseOnly,
    /// Package clause and import declarations, comments dropped
    ImportsOnly,
    /// Package clause and import declarations with their doc comments
    ImportsWithComments,
}

impl ParseMode {
    pub fn collects_imports(self) -> bool {
        !matches!(self, ParseMode::PackageClauseOnly)
    }

    pub fn collects_comments(self) -> bool {
        matches!(self, ParseMode::ImportsWithComments)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Unquoted import path
    pub path: String,
    /// Doc comment text; only set for specs inside a parenthesized list
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    /// Doc comment text of the whole `import` declaration
    pub doc: Option<String>,
    pub specs: Vec<ImportSpec>,
}

impl ImportDecl {
    /// The comment carrying a spec's preamble: its own doc, or the
    /// declaration's doc when the spec is the declaration's only one.
    pub fn preamble_for<'a>(&'a self, spec: &'a ImportSpec) -> Option<&'a str> {
        match &spec.doc {
            Some(doc) => Some(doc.as_str()),
            None if self.specs.len() == 1 => self.doc.as_deref(),
            None => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoFile {
    pub package: String,
    pub imports: Vec<ImportDecl>,
}

impl GoFile {
    pub fn import_paths(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().flat_map(|d| d.specs.iter().map(|s| s.path.as_str()))
    }
}
