use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// How a tool wants to receive a skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectionFormat {
    /// A private copy of the templates at `{destination}/{id}`.
    Mirror,
    /// A relative symlink at `{destination}/{id}` pointing at the primary installation.
    Symlink,
    /// One consolidated markdown file at `{destination}/{id}.md`.
    SingleFile,
    /// A delimited block inside the shared file `{destination}/{file_name}`.
    AppendBlock { file_name: String },
}

impl ProjectionFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mirror => "mirror",
            Self::Symlink => "symlink",
            Self::SingleFile => "single",
            Self::AppendBlock { .. } => "append",
        }
    }
}

/// One downstream AI tool and where its copy of a skill lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolTarget {
    pub id: String,
    pub label: String,
    /// Destination directory, relative to the project root.
    pub destination: PathBuf,
    pub format: ProjectionFormat,
    pub description: String,
}

impl ToolTarget {
    pub fn new(
        id: &str,
        label: &str,
        destination: &str,
        format: ProjectionFormat,
        description: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            destination: PathBuf::from(destination),
            format,
            description: description.to_string(),
        }
    }

    /// The artifact path for a skill, relative to the project root.
    ///
    /// For append blocks this is the shared file, which holds every skill's block.
    pub fn artifact_path(&self, skill_id: &str) -> PathBuf {
        match &self.format {
            ProjectionFormat::Mirror | ProjectionFormat::Symlink => self.destination.join(skill_id),
            ProjectionFormat::SingleFile => self.destination.join(format!("{}.md", skill_id)),
            ProjectionFormat::AppendBlock { file_name } => self.destination.join(file_name),
        }
    }
}

/// The fixed table of known tools plus the default selection.
///
/// Built once at startup and handed to whatever needs it; nothing reads it from
/// global state.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    targets: Vec<ToolTarget>,
    defaults: Vec<String>,
}

impl ToolRegistry {
    pub fn new(targets: Vec<ToolTarget>, defaults: &[&str]) -> Self {
        Self {
            targets,
            defaults: defaults.iter().map(|d| d.to_string()).collect(),
        }
    }

    /// The tools skillport knows about out of the box.
    pub fn builtin() -> Self {
        Self::new(
            vec![
                ToolTarget::new(
                    "claude",
                    "Claude Code",
                    ".claude/skills",
                    ProjectionFormat::Symlink,
                    "Symlink to the primary install",
                ),
                ToolTarget::new(
                    "cursor",
                    "Cursor",
                    ".cursor/rules",
                    ProjectionFormat::Symlink,
                    "Symlink to the primary install",
                ),
                ToolTarget::new(
                    "windsurf",
                    "Windsurf",
                    ".windsurf/rules",
                    ProjectionFormat::SingleFile,
                    "Consolidated rules file",
                ),
                ToolTarget::new(
                    "copilot",
                    "GitHub Copilot",
                    ".github",
                    ProjectionFormat::AppendBlock {
                        file_name: "copilot-instructions.md".to_string(),
                    },
                    "Appended to copilot-instructions.md",
                ),
                ToolTarget::new(
                    "gemini",
                    "Gemini CLI",
                    ".gemini/skills",
                    ProjectionFormat::Mirror,
                    "Private copy of the templates",
                ),
            ],
            &["claude", "cursor", "windsurf"],
        )
    }

    pub fn all(&self) -> &[ToolTarget] {
        &self.targets
    }

    pub fn get(&self, id: &str) -> Option<&ToolTarget> {
        self.targets.iter().find(|t| t.id == id)
    }

    pub fn is_default(&self, id: &str) -> bool {
        self.defaults.iter().any(|d| d == id)
    }

    pub fn defaults(&self) -> Vec<&ToolTarget> {
        self.targets
            .iter()
            .filter(|t| self.is_default(&t.id))
            .collect()
    }

    pub fn ids(&self) -> Vec<String> {
        self.targets.iter().map(|t| t.id.clone()).collect()
    }

    /// Look up one tool by id, ignoring case and surrounding whitespace.
    pub fn lookup(&self, name: &str) -> Result<&ToolTarget> {
        let id = name.trim().to_lowercase();
        self.get(&id).ok_or_else(|| Error::UnknownTool {
            name: id,
            available: self.ids(),
        })
    }

    /// Resolve a `--tools` value: `all`, or a comma-separated list of ids.
    pub fn resolve_list(&self, list: &str) -> Result<Vec<&ToolTarget>> {
        if list.trim().eq_ignore_ascii_case("all") {
            return Ok(self.targets.iter().collect());
        }
        let mut selected: Vec<&ToolTarget> = Vec::new();
        for name in list.split(',').filter(|n| !n.trim().is_empty()) {
            let target = self.lookup(name)?;
            if !selected.iter().any(|t| t.id == target.id) {
                selected.push(target);
            }
        }
        Ok(selected)
    }
}

/// Relative path from directory `from` to `to`, both relative to the same root.
///
/// Used to build symlinks that keep working when the project is moved.
pub fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from: Vec<_> = from.components().collect();
    let to: Vec<_> = to.components().collect();
    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in common..from.len() {
        rel.push("..");
    }
    for part in &to[common..] {
        rel.push(part.as_os_str());
    }
    rel
}
