use std::fs;
use std::io::Write;
use std::path::Path;

use regex::{NoExpand, Regex};
use tracing::debug;

use super::Projector;
use crate::error::{IoContext, Result};
use crate::mirror;
use crate::models::{
    Action, ArtifactState, Conflict, Outcome, Reason, SkillDefinition, ToolTarget,
};

pub fn begin_marker(skill_id: &str) -> String {
    format!("<!-- BEGIN: {} skill -->", skill_id)
}

pub fn end_marker(skill_id: &str) -> String {
    format!("<!-- END: {} skill -->", skill_id)
}

/// Header written once, when the shared file is first created.
fn file_header(target: &ToolTarget) -> String {
    format!(
        "# {} Instructions\n\nThis file contains instructions for {}.\n",
        target.label, target.label
    )
}

/// Non-greedy match of one skill's block, markers included.
fn block_pattern(skill_id: &str) -> Result<Regex> {
    let pattern = format!(
        r"(?s){}.*?{}",
        regex::escape(&begin_marker(skill_id)),
        regex::escape(&end_marker(skill_id))
    );
    Ok(Regex::new(&pattern)?)
}

fn block_state(existing: &str, skill_id: &str, relative: &Path) -> ArtifactState {
    match existing.find(&begin_marker(skill_id)) {
        None => ArtifactState::Absent,
        Some(start) if existing[start..].contains(&end_marker(skill_id)) => {
            ArtifactState::Installed(relative.to_path_buf())
        }
        Some(_) => ArtifactState::Conflicting(Conflict::UnterminatedBlock),
    }
}

pub(super) fn inspect(
    projector: &Projector,
    skill: &SkillDefinition,
    relative: &Path,
) -> Result<ArtifactState> {
    let file = projector.project_dir().join(relative);
    if !file.is_file() {
        return Ok(ArtifactState::Absent);
    }
    let existing = fs::read_to_string(&file).at(&file)?;
    Ok(block_state(&existing, &skill.id, relative))
}

pub(super) fn install(
    projector: &Projector,
    skill: &SkillDefinition,
    target: &ToolTarget,
) -> Result<Outcome> {
    let dir = projector.project_dir().join(&target.destination);
    fs::create_dir_all(&dir).at(&dir)?;

    let relative = target.artifact_path(&skill.id);
    let file = projector.project_dir().join(&relative);

    let content = projector.consolidated(skill)?;
    let block = format!(
        "\n\n{}\n{}\n{}\n",
        begin_marker(&skill.id),
        content,
        end_marker(&skill.id)
    );

    if file.is_file() {
        if inspect(projector, skill, &relative)? != ArtifactState::Absent {
            return Ok(Outcome::Refused(Reason::AlreadyInstalled));
        }
        let mut handle = fs::OpenOptions::new().append(true).open(&file).at(&file)?;
        handle.write_all(block.as_bytes()).at(&file)?;
        debug!("Appended {} block to {:?}", skill.id, file);
    } else {
        fs::write(&file, file_header(target) + &block).at(&file)?;
        debug!("Created {:?} with {} block", file, skill.id);
    }

    Ok(Outcome::applied(relative, Action::Installed))
}

/// Replace this skill's block and nothing else.
pub(super) fn update(
    projector: &Projector,
    skill: &SkillDefinition,
    target: &ToolTarget,
) -> Result<Outcome> {
    let relative = target.artifact_path(&skill.id);
    match inspect(projector, skill, &relative)? {
        ArtifactState::Absent => return Ok(Outcome::Refused(Reason::NotInstalled)),
        ArtifactState::Conflicting(_) => return Ok(Outcome::Refused(Reason::UnterminatedBlock)),
        ArtifactState::Installed(_) => {}
    }

    let file = projector.project_dir().join(&relative);
    let existing = fs::read_to_string(&file).at(&file)?;
    let backup = mirror::backup_file(&file)?;

    let section = format!(
        "{}\n{}\n{}",
        begin_marker(&skill.id),
        projector.consolidated(skill)?,
        end_marker(&skill.id)
    );
    let replaced = block_pattern(&skill.id)?.replace_all(&existing, NoExpand(&section));
    fs::write(&file, replaced.as_bytes()).at(&file)?;
    debug!("Replaced {} block in {:?}", skill.id, file);

    Ok(Outcome::applied(
        relative,
        Action::Updated {
            backup: projector.relative(backup),
        },
    ))
}
