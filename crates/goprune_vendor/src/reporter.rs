use std::{
    io::{self, Write},
    path::Path,
};

use colored::Colorize;
use log::{debug, trace};

use crate::types::CheckResult;

/// Shows `path` relative to the project so it stays short and clickable.
fn display_path(project_dir: &Path, path: &Path) -> String {
    let shown = path.strip_prefix(project_dir).unwrap_or(path);
    trace!("Displaying '{}' as '{}'", path.display(), shown.display());
    shown.display().to_string()
}

pub fn print_report<W: Write>(writer: &mut W, result: &CheckResult) -> io::Result<()> {
    debug!(
        "Printing report: {} dirs, {} files, {} errors",
        result.removed_dirs.len(),
        result.removed_files.len(),
        result.errors.len()
    );

    writeln!(
        writer,
        "{} {} ({} packages, {} external packages needed)",
        "●".bright_blue(),
        result.root_package.bold(),
        result.packages.len().to_string().cyan(),
        result.imports.len().to_string().cyan()
    )?;

    if result.removed_dirs.is_empty() && result.removed_files.is_empty() {
        writeln!(writer, "{} Nothing to prune", "✓".green().bold())?;
    } else {
        if !result.removed_dirs.is_empty() {
            let count = result.removed_dirs.len().to_string();
            writeln!(writer, "\nRemoved {} directories", count.yellow())?;
            for dir in &result.removed_dirs {
                let shown = display_path(&result.project_dir, dir);
                writeln!(writer, "  {} {}", "-".red(), shown.blue())?;
            }
        }
        if !result.removed_files.is_empty() {
            let count = result.removed_files.len().to_string();
            writeln!(writer, "\nRemoved {} files", count.yellow())?;
            for file in &result.removed_files {
                writeln!(writer, "  {} {}", "-".red(), display_path(&result.project_dir, file))?;
            }
        }
    }

    if result.has_errors() {
        let count = result.errors.len();
        writeln!(writer, "\n{} {} errors while pruning", "⚠".yellow().bold(), count)?;
        for err in &result.errors {
            writeln!(writer, "  {}", err.red())?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Lists the external packages the project needs, one per line.
pub fn print_closure<W: Write>(writer: &mut W, result: &CheckResult) -> io::Result<()> {
    debug!("Printing closure of {} packages", result.imports.len());
    for pkg in &result.imports {
        writeln!(writer, "{}", pkg)?;
    }
    writeln!(
        writer,
        "\n{} {} needs {} external packages",
        "●".bright_blue(),
        result.root_package.bold(),
        result.imports.len().to_string().cyan()
    )?;
    writer.flush()?;
    Ok(())
}

pub fn print_json<W: Write>(writer: &mut W, result: &CheckResult) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, result)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use goprune_core::PackageSet;
    use std::path::PathBuf;

    fn result() -> CheckResult {
        colored::control::set_override(false);
        CheckResult {
            root_package: "example.com/app".to_string(),
            project_dir: PathBuf::from("/go/src/example.com/app"),
            packages: PackageSet::from(["example.com/app".to_string()]),
            imports: PackageSet::from(["github.com/foo/bar".to_string()]),
            removed_files: vec![PathBuf::from(
                "/go/src/example.com/app/vendor/github.com/foo/bar/bar_test.go",
            )],
            removed_dirs: vec![PathBuf::from("/go/src/example.com/app/vendor/github.com/foo/baz")],
            errors: Vec::new(),
        }
    }

    fn render(print: fn(&mut Vec<u8>, &CheckResult) -> io::Result<()>, r: &CheckResult) -> String {
        let mut out = Vec::new();
        print(&mut out, r).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_display_path() {
        let project = Path::new("/go/src/example.com/app");
        assert_eq!(display_path(project, &project.join("vendor/a.io/b")), "vendor/a.io/b");
        assert_eq!(display_path(project, Path::new("/elsewhere/x")), "/elsewhere/x");
    }

    #[test]
    fn test_print_report() {
        let out = render(print_report, &result());
        assert!(out.contains("example.com/app"));
        assert!(out.contains("(1 packages, 1 external packages needed)"));
        assert!(out.contains("Removed 1 directories"));
        assert!(out.contains("vendor/github.com/foo/baz"));
        assert!(out.contains("vendor/github.com/foo/bar/bar_test.go"));
        assert!(!out.contains("/go/src/example.com/app/vendor"));
        assert!(!out.contains("errors while pruning"));
    }

    #[test]
    fn test_print_report_nothing_removed_with_errors() {
        let mut r = result();
        r.removed_files.clear();
        r.removed_dirs.clear();
        r.errors.push("vendor/x: permission denied".to_string());

        let out = render(print_report, &r);
        assert!(out.contains("Nothing to prune"));
        assert!(out.contains("1 errors while pruning"));
        assert!(out.contains("vendor/x: permission denied"));
    }

    #[test]
    fn test_print_closure() {
        let out = render(print_closure, &result());
        assert!(out.starts_with("github.com/foo/bar\n"));
        assert!(out.contains("needs 1 external packages"));
    }

    #[test]
    fn test_print_json() {
        let out = render(print_json, &result());
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["root_package"], "example.com/app");
        assert_eq!(value["imports"][0], "github.com/foo/bar");
        assert_eq!(value["errors"].as_array().map(Vec::len), Some(0));
    }
}
