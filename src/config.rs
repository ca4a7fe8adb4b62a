//! Run configuration.
//!
//! Configuration is via flags, each with an environment fallback:
//! - `SKILLPORT_PROJECT_DIR` - Project to install into (default: current directory)
//! - `SKILLPORT_SKILLS_DIR` - Package skills root (default: `<exe dir>/../skills`, then `./skills`)
//! - `SKILLPORT_PRIMARY_PATH` - Primary base path inside the project (default: `.agents/skills`)

use std::path::{Path, PathBuf};

/// Default primary base path, relative to the project root.
pub const DEFAULT_PRIMARY_PATH: &str = ".agents/skills";

/// Everything a run needs to know about where things live.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Absolute root of the project being installed into.
    pub project_dir: PathBuf,
    /// Directory containing one subdirectory per packaged skill.
    pub skills_root: PathBuf,
    /// Primary base path, relative to `project_dir`.
    pub primary_base: PathBuf,
}

impl Settings {
    pub fn new(
        project_dir: impl Into<PathBuf>,
        skills_root: impl Into<PathBuf>,
        primary_base: impl Into<PathBuf>,
    ) -> Self {
        Self {
            project_dir: project_dir.into(),
            skills_root: skills_root.into(),
            primary_base: primary_base.into(),
        }
    }

    /// Build settings from optional overrides, filling the gaps with defaults.
    pub fn resolve(
        project_dir: Option<PathBuf>,
        skills_root: Option<PathBuf>,
        primary_base: Option<PathBuf>,
    ) -> std::io::Result<Self> {
        let project_dir = match project_dir {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };
        let skills_root = skills_root.unwrap_or_else(default_skills_root);
        let primary_base = primary_base.unwrap_or_else(|| PathBuf::from(DEFAULT_PRIMARY_PATH));
        Ok(Self::new(project_dir, skills_root, primary_base))
    }

    /// Absolute path of a project-relative path.
    pub fn in_project(&self, relative: &Path) -> PathBuf {
        self.project_dir.join(relative)
    }
}

/// The skills directory shipped next to the binary, as in `<prefix>/bin/skillport`
/// with skills in `<prefix>/skills`.
fn default_skills_root() -> PathBuf {
    let packaged = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().and_then(Path::parent).map(|p| p.join("skills")));

    match packaged {
        Some(dir) if dir.is_dir() => dir,
        _ => PathBuf::from("skills"),
    }
}
