use anyhow::{Context, Result, anyhow, bail};
use log::{debug, trace};
use rayon::prelude::*;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tree_sitter::{Node, Parser as TsParser};

use crate::{
    constants::is_go_source,
    types::{GoFile, ImportDecl, ImportSpec, ParseMode},
};

/// Parses the leading section of a Go source file.
///
/// Only the package clause and the import declarations are checked for
/// syntax errors; whatever follows them is never inspected.
pub fn parse_source(src: &str, mode: ParseMode) -> Result<GoFile> {
    let mut parser = TsParser::new();
    parser
        .set_language(&tree_sitter_go::language())
        .map_err(|e| anyhow!("Failed to load Go grammar: {}", e))?;
    let tree = parser.parse(src, None).ok_or_else(|| anyhow!("Parser produced no tree"))?;
    let root = tree.root_node();

    let mut package: Option<String> = None;
    let mut imports = Vec::new();

    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        match child.kind() {
            "comment" => continue,
            "package_clause" if package.is_none() => {
                if child.has_error() {
                    return Err(syntax_error(child, "package clause"));
                }
                package = Some(package_name(child, src)?);
                if !mode.collects_imports() {
                    break;
                }
            }
            "import_declaration" if package.is_some() => {
                if child.has_error() {
                    return Err(syntax_error(child, "import declaration"));
                }
                imports.push(import_decl(child, src, mode)?);
            }
            _ if package.is_none() => bail!(
                "{}:{}: expected 'package', found {}",
                child.start_position().row + 1,
                child.start_position().column + 1,
                child.kind()
            ),
            _ if child.is_error() && starts_with_keyword(child, src, "import") => {
                return Err(syntax_error(child, "import declaration"));
            }
            // First declaration after the imports: the leading section is done
            _ => break,
        }
    }

    let package = package.ok_or_else(|| anyhow!("expected 'package', found EOF"))?;
    trace!("Parsed package '{}' with {} import declarations", package, imports.len());
    Ok(GoFile { package, imports })
}

pub fn parse_file(file: &Path, mode: ParseMode) -> Result<GoFile> {
    trace!("Parsing file: {}", file.display());
    let src =
        fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    parse_source(&src, mode).with_context(|| format!("Failed to parse {}", file.display()))
}

/// Parses every `.go` file in `dir` accepted by `filter`.
///
/// Returns `Ok(None)` when the directory does not exist. Files are parsed
/// in parallel; the first failing file fails the whole directory.
pub fn parse_dir<F>(dir: &Path, filter: F, mode: ParseMode) -> Result<Option<Vec<GoFile>>>
where
    F: Fn(&Path) -> bool,
{
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            trace!("Directory does not exist: {}", dir.display());
            return Ok(None);
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to read {}", dir.display())),
    };

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read {}", dir.display()))?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            continue;
        }
        let is_source = path.file_name().and_then(|n| n.to_str()).is_some_and(is_go_source);
        if is_source && filter(&path) {
            files.push(path);
        } else if is_source {
            trace!("Filtered out: {}", path.display());
        }
    }
    files.sort();

    let parsed = files.par_iter().map(|f| parse_file(f, mode)).collect::<Result<Vec<_>>>()?;
    debug!("Parsed {} files in {}", parsed.len(), dir.display());
    Ok(Some(parsed))
}

fn import_decl(node: Node, src: &str, mode: ParseMode) -> Result<ImportDecl> {
    let doc = if mode.collects_comments() { doc_comment(node, src)? } else { None };

    let mut specs = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            // A lone spec has no doc of its own; the declaration's doc covers it
            "import_spec" => specs.push(import_spec(child, src, None)?),
            "import_spec_list" => {
                let mut list_cursor = child.walk();
                for spec in child.named_children(&mut list_cursor) {
                    if spec.kind() != "import_spec" {
                        continue;
                    }
                    let doc = if mode.collects_comments() { doc_comment(spec, src)? } else { None };
                    specs.push(import_spec(spec, src, doc)?);
                }
            }
            _ => {}
        }
    }

    Ok(ImportDecl { doc, specs })
}

fn import_spec(node: Node, src: &str, doc: Option<String>) -> Result<ImportSpec> {
    let path_node = node
        .child_by_field_name("path")
        .ok_or_else(|| syntax_error(node, "import path"))?;
    let path = unquote(node_text(path_node, src)?).to_string();
    trace!("Found import: '{}'", path);
    Ok(ImportSpec { path, doc })
}

fn package_name(node: Node, src: &str) -> Result<String> {
    let name = node.named_child(0).ok_or_else(|| syntax_error(node, "package name"))?;
    Ok(node_text(name, src)?.to_string())
}

/// Collects the comment group ending on the line right before `node`.
///
/// Comments within the group may be separated by at most a line break; a
/// blank line ends the group. Comments trailing the previous token on its
/// own line belong to that token, not to `node`.
fn doc_comment(node: Node, src: &str) -> Result<Option<String>> {
    let mut group: Vec<Node> = Vec::new();
    let mut next_row = node.start_position().row;
    let mut anchor_row: Option<usize> = None;

    let mut cur = node.prev_sibling();
    while let Some(prev) = cur {
        match prev.kind() {
            "comment" => {
                let end_row = prev.end_position().row;
                let adjacent =
                    if group.is_empty() { end_row + 1 == next_row } else { end_row + 1 >= next_row };
                if !adjacent {
                    break;
                }
                group.push(prev);
                next_row = prev.start_position().row;
            }
            "\n" | "\0" => {}
            _ => {
                anchor_row = Some(prev.end_position().row);
                break;
            }
        }
        cur = prev.prev_sibling();
    }

    if let Some(row) = anchor_row {
        group.retain(|c| c.start_position().row > row);
    }
    if group.is_empty() {
        return Ok(None);
    }
    group.reverse();

    let mut texts = Vec::with_capacity(group.len());
    for comment in group {
        texts.push(node_text(comment, src)?);
    }
    Ok(Some(comment_text(&texts)))
}

/// Strips comment markers the way `go/ast.CommentGroup.Text` does.
pub(crate) fn comment_text(comments: &[&str]) -> String {
    let mut lines: Vec<String> = Vec::new();
    for c in comments {
        if let Some(body) = c.strip_prefix("//") {
            lines.push(body.strip_prefix(' ').unwrap_or(body).trim_end().to_string());
        } else if let Some(body) = c.strip_prefix("/*") {
            let body = body.strip_suffix("*/").unwrap_or(body);
            lines.extend(body.lines().map(|l| l.trim_end().to_string()));
        }
    }

    // Drop leading/trailing blank lines and collapse inner runs
    let mut out: Vec<String> = Vec::new();
    for line in lines {
        if line.is_empty() && out.last().is_none_or(|l| l.is_empty()) {
            continue;
        }
        out.push(line);
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }

    let mut text = out.join("\n");
    if !text.is_empty() {
        text.push('\n');
    }
    text
}

fn node_text<'a>(node: Node, src: &'a str) -> Result<&'a str> {
    Ok(node.utf8_text(src.as_bytes())?)
}

fn starts_with_keyword(node: Node, src: &str, keyword: &str) -> bool {
    node.utf8_text(src.as_bytes()).is_ok_and(|t| t.trim_start().starts_with(keyword))
}

fn unquote(lit: &str) -> &str {
    let quoted = lit.len() >= 2
        && ((lit.starts_with('"') && lit.ends_with('"'))
            || (lit.starts_with('`') && lit.ends_with('`')));
    if quoted { &lit[1..lit.len() - 1] } else { lit }
}

fn syntax_error(node: Node, what: &str) -> anyhow::Error {
    let pos = node.start_position();
    anyhow!("{}:{}: syntax error in {}", pos.row + 1, pos.column + 1, what)
}
