//! Projection of skills into tool-specific artifacts.
//!
//! Every [`ProjectionFormat`] gets an `inspect`, an `install`, and an `update`.
//! Installs never overwrite; updates back up before they write. The filesystem is
//! the only record of what is installed, so both paths start from [`Projector::inspect`].

mod append_block;
mod symlink;
mod single_file;

pub use append_block::{begin_marker, end_marker};

use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::error::Result;
use crate::models::{ArtifactState, Outcome, ProjectionFormat, SkillDefinition, ToolTarget};
use crate::store;

/// Applies tool targets to skills inside one project.
#[derive(Debug, Clone)]
pub struct Projector {
    project_dir: PathBuf,
    primary_base: PathBuf,
}

impl Projector {
    pub fn new(settings: &Settings) -> Self {
        Self {
            project_dir: settings.project_dir.clone(),
            primary_base: settings.primary_base.clone(),
        }
    }

    pub(crate) fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Project-relative path of the skill's primary installation.
    pub(crate) fn primary_path(&self, skill: &SkillDefinition) -> PathBuf {
        skill.primary_path(&self.primary_base)
    }

    /// What is currently at the artifact location for this skill and target.
    pub fn inspect(&self, skill: &SkillDefinition, target: &ToolTarget) -> Result<ArtifactState> {
        let relative = target.artifact_path(&skill.id);
        match &target.format {
            ProjectionFormat::Mirror => Ok(store::inspect_tree(&self.project_dir, &relative)),
            ProjectionFormat::Symlink => Ok(symlink::inspect(self, skill, target)),
            ProjectionFormat::SingleFile => Ok(single_file::inspect(self, &relative)),
            ProjectionFormat::AppendBlock { .. } => append_block::inspect(self, skill, &relative),
        }
    }

    pub fn install(&self, skill: &SkillDefinition, target: &ToolTarget) -> Result<Outcome> {
        match &target.format {
            ProjectionFormat::Mirror => store::install_tree(
                skill,
                &self.project_dir,
                &target.artifact_path(&skill.id),
            ),
            ProjectionFormat::Symlink => symlink::install(self, skill, target),
            ProjectionFormat::SingleFile => single_file::install(self, skill, target),
            ProjectionFormat::AppendBlock { .. } => append_block::install(self, skill, target),
        }
    }

    pub fn update(&self, skill: &SkillDefinition, target: &ToolTarget) -> Result<Outcome> {
        match &target.format {
            ProjectionFormat::Mirror => store::update_tree(
                skill,
                &self.project_dir,
                &target.artifact_path(&skill.id),
            ),
            ProjectionFormat::Symlink => symlink::update(self, skill, target),
            ProjectionFormat::SingleFile => single_file::update(self, skill, target),
            ProjectionFormat::AppendBlock { .. } => append_block::update(self, skill, target),
        }
    }

    /// Fresh consolidated content for a skill.
    pub(crate) fn consolidated(&self, skill: &SkillDefinition) -> Result<String> {
        crate::consolidate::consolidate(skill, &self.project_dir, &self.primary_base)
    }

    /// Strip the project root from an absolute path for reporting.
    pub(crate) fn relative(&self, path: PathBuf) -> PathBuf {
        path.strip_prefix(&self.project_dir)
            .map(Path::to_path_buf)
            .unwrap_or(path)
    }
}
