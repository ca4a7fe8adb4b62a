use std::fs;
use std::path::Path;

use tracing::debug;

use super::Projector;
use crate::error::{IoContext, Result};
use crate::mirror;
use crate::models::{Action, ArtifactState, Outcome, Reason, SkillDefinition, ToolTarget};

pub(super) fn inspect(projector: &Projector, relative: &Path) -> ArtifactState {
    if projector.project_dir().join(relative).exists() {
        ArtifactState::Installed(relative.to_path_buf())
    } else {
        ArtifactState::Absent
    }
}

pub(super) fn install(
    projector: &Projector,
    skill: &SkillDefinition,
    target: &ToolTarget,
) -> Result<Outcome> {
    let relative = target.artifact_path(&skill.id);
    if inspect(projector, &relative) != ArtifactState::Absent {
        return Ok(Outcome::Refused(Reason::AlreadyInstalled));
    }

    let dir = projector.project_dir().join(&target.destination);
    fs::create_dir_all(&dir).at(&dir)?;

    let file = projector.project_dir().join(&relative);
    let content = projector.consolidated(skill)?;
    fs::write(&file, content).at(&file)?;
    debug!("Wrote consolidated {:?}", file);

    Ok(Outcome::applied(relative, Action::Installed))
}

/// Back up the file and regenerate it in full.
pub(super) fn update(
    projector: &Projector,
    skill: &SkillDefinition,
    target: &ToolTarget,
) -> Result<Outcome> {
    let relative = target.artifact_path(&skill.id);
    if inspect(projector, &relative) == ArtifactState::Absent {
        return Ok(Outcome::Refused(Reason::NotInstalled));
    }

    let file = projector.project_dir().join(&relative);
    let backup = mirror::backup_file(&file)?;
    let content = projector.consolidated(skill)?;
    fs::write(&file, content).at(&file)?;
    debug!("Regenerated {:?}", file);

    Ok(Outcome::applied(
        relative,
        Action::Updated {
            backup: projector.relative(backup),
        },
    ))
}
