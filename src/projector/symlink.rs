use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::Projector;
use crate::error::{IoContext, Result};
use crate::models::{
    relative_path, Action, ArtifactState, Conflict, Outcome, Reason, SkillDefinition, ToolTarget,
};

/// What the link should contain: the primary installation, relative to the link's directory.
fn link_target(projector: &Projector, skill: &SkillDefinition, target: &ToolTarget) -> PathBuf {
    let primary = projector.primary_path(skill);
    if primary.is_absolute() || target.destination.is_absolute() {
        projector.project_dir().join(primary)
    } else {
        relative_path(&target.destination, &primary)
    }
}

pub(super) fn inspect(
    projector: &Projector,
    skill: &SkillDefinition,
    target: &ToolTarget,
) -> ArtifactState {
    let relative = target.artifact_path(&skill.id);
    let link = projector.project_dir().join(&relative);

    let Ok(metadata) = fs::symlink_metadata(&link) else {
        return ArtifactState::Absent;
    };

    if metadata.file_type().is_symlink() {
        match fs::read_link(&link) {
            Ok(actual) if actual == link_target(projector, skill, target) => {
                ArtifactState::Installed(relative)
            }
            Ok(actual) => ArtifactState::Conflicting(Conflict::LinkElsewhere(actual)),
            Err(_) => ArtifactState::Conflicting(Conflict::Occupied),
        }
    } else if metadata.is_dir() {
        ArtifactState::Conflicting(Conflict::RealDirectory)
    } else {
        ArtifactState::Conflicting(Conflict::Occupied)
    }
}

fn primary_exists(projector: &Projector, skill: &SkillDefinition) -> bool {
    projector
        .project_dir()
        .join(projector.primary_path(skill))
        .is_dir()
}

pub(super) fn install(
    projector: &Projector,
    skill: &SkillDefinition,
    target: &ToolTarget,
) -> Result<Outcome> {
    if !primary_exists(projector, skill) {
        return Ok(Outcome::Refused(Reason::PrimaryNotInstalled));
    }

    match inspect(projector, skill, target) {
        ArtifactState::Installed(_)
        | ArtifactState::Conflicting(Conflict::LinkElsewhere(_))
        | ArtifactState::Conflicting(Conflict::RealDirectory) => {
            Ok(Outcome::Refused(Reason::AlreadyInstalled))
        }
        _ => create(projector, skill, target),
    }
}

/// Verify the link and repair it if something moved it.
pub(super) fn update(
    projector: &Projector,
    skill: &SkillDefinition,
    target: &ToolTarget,
) -> Result<Outcome> {
    if !primary_exists(projector, skill) {
        return Ok(Outcome::Refused(Reason::PrimaryNotInstalled));
    }

    let relative = target.artifact_path(&skill.id);
    match inspect(projector, skill, target) {
        ArtifactState::Installed(path) => Ok(Outcome::applied(path, Action::LinkValid)),
        ArtifactState::Conflicting(Conflict::RealDirectory) => {
            Ok(Outcome::applied(relative, Action::UserDirectory))
        }
        ArtifactState::Conflicting(Conflict::LinkElsewhere(actual)) => {
            let link = projector.project_dir().join(&relative);
            debug!("Link {:?} points at {:?}, recreating", link, actual);
            remove_link(&link).at(&link)?;
            create(projector, skill, target)
        }
        _ => create(projector, skill, target),
    }
}

fn create(projector: &Projector, skill: &SkillDefinition, target: &ToolTarget) -> Result<Outcome> {
    let tool_dir = projector.project_dir().join(&target.destination);
    fs::create_dir_all(&tool_dir).at(&tool_dir)?;

    let relative = target.artifact_path(&skill.id);
    let link = projector.project_dir().join(&relative);
    let points_to = link_target(projector, skill, target);

    match symlink_dir(&points_to, &link) {
        Ok(()) => {
            debug!("Linked {:?} -> {:?}", link, points_to);
            Ok(Outcome::applied(
                relative,
                Action::Linked {
                    target: projector.primary_path(skill),
                },
            ))
        }
        Err(e) => {
            warn!("Could not create symlink {:?}: {}", link, e);
            Ok(Outcome::Refused(Reason::SymlinkFailed(e.to_string())))
        }
    }
}

#[cfg(unix)]
fn symlink_dir(original: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

#[cfg(windows)]
fn symlink_dir(original: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(original, link)
}

#[cfg(unix)]
fn remove_link(link: &Path) -> io::Result<()> {
    fs::remove_file(link)
}

#[cfg(windows)]
fn remove_link(link: &Path) -> io::Result<()> {
    // Directory symlinks are directories as far as Windows is concerned.
    fs::remove_dir(link).or_else(|_| fs::remove_file(link))
}
