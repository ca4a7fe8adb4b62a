//! Merging a skill into one markdown document.
//!
//! Tools that want a single file get the main document (front matter removed)
//! followed by every reference document, in a fixed order. The output depends only
//! on the source files: same files in, same bytes out.

use std::cmp::Ordering;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use walkdir::WalkDir;

use crate::error::{Error, IoContext, Result};
use crate::models::{SkillDefinition, MAIN_DOCUMENT, REFERENCES_DIR};

/// Name written into the provenance header.
pub const GENERATOR: &str = "skillport";

static FRONT_MATTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A---[ \t]*\r?\n(?s:.*?\r?\n)?---[ \t]*(?:\r?\n|\z)").expect("valid regex")
});

/// Precedence of well-known reference categories. Anything else sorts last.
fn category_rank(name: &OsStr) -> u8 {
    match name.to_str() {
        Some("foundations") => 1,
        Some("components") => 2,
        Some("patterns") => 3,
        _ => 99,
    }
}

/// Sibling order within the references tree: category precedence, then name.
///
/// Names compare case-insensitively, so `alpha.md` sorts before `Zeta.md`. Names
/// differing only in case fall back to a byte comparison.
fn reference_order(a: &OsStr, b: &OsStr) -> Ordering {
    category_rank(a)
        .cmp(&category_rank(b))
        .then_with(|| {
            let la = a.to_string_lossy().to_lowercase();
            let lb = b.to_string_lossy().to_lowercase();
            la.cmp(&lb)
        })
        .then_with(|| a.cmp(b))
}

/// Remove a leading `---` delimited metadata block.
pub fn strip_front_matter(content: &str) -> &str {
    match FRONT_MATTER.find(content) {
        Some(m) => &content[m.end()..],
        None => content,
    }
}

/// Every markdown file under `refs_dir`, in consolidation order.
pub fn collect_references(refs_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(refs_dir)
        .min_depth(1)
        .sort_by(|a, b| reference_order(a.file_name(), b.file_name()));

    for entry in walker {
        let entry = entry.map_err(|e| Error::Io {
            path: e.path().unwrap_or(refs_dir).to_path_buf(),
            source: e.into(),
        })?;
        // `Path::is_file` follows links, so a linked reference document counts.
        if entry.path().is_file()
            && entry.path().extension().is_some_and(|ext| ext == "md")
        {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Where consolidated content is read from: the primary installation when there
/// is one (so local edits show up), otherwise the packaged templates.
pub fn source_dir(skill: &SkillDefinition, project_dir: &Path, primary_base: &Path) -> PathBuf {
    let primary = project_dir.join(skill.primary_path(primary_base));
    if primary.is_dir() {
        primary
    } else {
        skill.templates_dir.clone()
    }
}

/// Build the consolidated document for a skill.
pub fn consolidate(
    skill: &SkillDefinition,
    project_dir: &Path,
    primary_base: &Path,
) -> Result<String> {
    let source = source_dir(skill, project_dir, primary_base);
    let mut parts = Vec::new();

    let main = source.join(MAIN_DOCUMENT);
    if main.is_file() {
        let content = fs::read_to_string(&main).at(&main)?;
        parts.push(strip_front_matter(&content).trim().to_string());
    }

    let refs_dir = source.join(REFERENCES_DIR);
    if refs_dir.is_dir() {
        for file in collect_references(&refs_dir)? {
            let content = fs::read_to_string(&file).at(&file)?;
            parts.push(format!(
                "\n---\n\n<!-- Reference: {} -->\n\n{}",
                display_relative(&refs_dir, &file),
                content.trim()
            ));
        }
    }

    Ok(header(skill, primary_base) + &parts.join("\n\n"))
}

fn header(skill: &SkillDefinition, primary_base: &Path) -> String {
    let source = slash_path(&skill.primary_path(primary_base));
    format!(
        "<!--\n  {} - Consolidated Rules\n  Generated by {}\n  Source: {}/\n\n  This is a consolidated version for AI tools that prefer single files.\n  For the full structured version, see {}/\n-->\n\n",
        skill.display_name(),
        GENERATOR,
        source,
        source
    )
}

/// `/`-separated path of `file` relative to `root`, identical on every platform.
fn display_relative(root: &Path, file: &Path) -> String {
    slash_path(file.strip_prefix(root).unwrap_or(file))
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
