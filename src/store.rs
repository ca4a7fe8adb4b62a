//! The primary installation: the one canonical copy of each skill in the project.
//!
//! A directory counts as installed when it holds the skill's main document.
//! Installing never overwrites; updating backs the current content up into a
//! `.backup-<stamp>/` subdirectory first and then copies the templates over it.
//! Updates are additive: files dropped from the templates stay behind.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Settings;
use crate::error::Result;
use crate::mirror::{self, BACKUP_PREFIX};
use crate::models::{Action, ArtifactState, Outcome, Reason, SkillDefinition, MAIN_DOCUMENT};

/// State of a template copy rooted at `relative` inside the project.
pub fn inspect_tree(project_dir: &Path, relative: &Path) -> ArtifactState {
    if project_dir.join(relative).join(MAIN_DOCUMENT).is_file() {
        ArtifactState::Installed(relative.to_path_buf())
    } else {
        ArtifactState::Absent
    }
}

/// Copy the skill's templates into `relative` unless a copy is already there.
pub fn install_tree(skill: &SkillDefinition, project_dir: &Path, relative: &Path) -> Result<Outcome> {
    if let ArtifactState::Installed(_) = inspect_tree(project_dir, relative) {
        return Ok(Outcome::Refused(Reason::AlreadyInstalled));
    }

    let root = project_dir.join(relative);
    mirror::copy_entries(&skill.templates_dir, &root, |_| false)?;
    debug!("Installed {} into {:?}", skill.id, root);

    Ok(Outcome::applied(relative, Action::Installed))
}

/// Back up the copy at `relative`, then refresh it from the skill's templates.
pub fn update_tree(skill: &SkillDefinition, project_dir: &Path, relative: &Path) -> Result<Outcome> {
    if inspect_tree(project_dir, relative) == ArtifactState::Absent {
        return Ok(Outcome::Refused(Reason::NotInstalled));
    }

    let root = project_dir.join(relative);
    let backup = mirror::unique_backup_path(&root, BACKUP_PREFIX, "");
    mirror::copy_entries(&root, &backup, |name| name.starts_with(BACKUP_PREFIX))?;
    mirror::copy_entries(&skill.templates_dir, &root, |_| false)?;
    debug!("Updated {} in {:?}, previous content in {:?}", skill.id, root, backup);

    let backup = backup
        .strip_prefix(project_dir)
        .map(Path::to_path_buf)
        .unwrap_or(backup);
    Ok(Outcome::applied(relative, Action::Updated { backup }))
}

/// Owner of the primary installations under one project.
#[derive(Debug, Clone)]
pub struct PrimaryStore {
    project_dir: PathBuf,
    base: PathBuf,
}

impl PrimaryStore {
    pub fn new(settings: &Settings) -> Self {
        Self {
            project_dir: settings.project_dir.clone(),
            base: settings.primary_base.clone(),
        }
    }

    /// Project-relative path of a skill's primary installation.
    pub fn path_of(&self, skill: &SkillDefinition) -> PathBuf {
        skill.primary_path(&self.base)
    }

    pub fn inspect(&self, skill: &SkillDefinition) -> ArtifactState {
        inspect_tree(&self.project_dir, &self.path_of(skill))
    }

    pub fn is_installed(&self, skill: &SkillDefinition) -> bool {
        matches!(self.inspect(skill), ArtifactState::Installed(_))
    }

    pub fn install(&self, skill: &SkillDefinition) -> Result<Outcome> {
        install_tree(skill, &self.project_dir, &self.path_of(skill))
    }

    pub fn update(&self, skill: &SkillDefinition) -> Result<Outcome> {
        update_tree(skill, &self.project_dir, &self.path_of(skill))
    }
}
