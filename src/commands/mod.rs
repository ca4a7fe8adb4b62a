//! The `list`, `init`, and `update` commands.
//!
//! Commands resolve what to act on first; any problem there is an [`Error`] and
//! nothing is written. Once resolved, each selected skill gets its primary step and
//! then one step per tool. A failing step never stops the other skills.

pub mod render;

use tracing::{error, info};

use crate::catalog;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::models::{Outcome, Reason, SkillDefinition, ToolRegistry, ToolTarget};
use crate::projector::Projector;
use crate::store::PrimaryStore;

/// Which command produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Init,
    Update,
}

/// Result of one step: an outcome, or the I/O error that aborted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    Done(Outcome),
    Failed(String),
}

impl StepResult {
    fn from_result(result: Result<Outcome>) -> Self {
        match result {
            Ok(outcome) => Self::Done(outcome),
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Done(outcome) if outcome.is_applied())
    }

    pub fn reason(&self) -> Option<&Reason> {
        match self {
            Self::Done(outcome) => outcome.reason(),
            Self::Failed(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TargetReport {
    pub tool_id: String,
    pub label: String,
    pub result: StepResult,
}

#[derive(Debug, Clone)]
pub struct SkillReport {
    pub skill_id: String,
    pub display_name: String,
    pub primary: StepResult,
    pub targets: Vec<TargetReport>,
}

/// Everything that happened during one `init` or `update` run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub command: Command,
    pub tools: Vec<ToolTarget>,
    pub skills: Vec<SkillReport>,
}

impl RunReport {
    fn target_results(&self) -> impl Iterator<Item = &StepResult> {
        self.skills
            .iter()
            .flat_map(|s| s.targets.iter().map(|t| &t.result))
    }

    /// Skill-tool combinations that were installed or updated.
    pub fn applied(&self) -> usize {
        self.target_results().filter(|r| r.is_applied()).count()
    }

    /// Combinations skipped because of their state: already installed on `init`,
    /// not installed on `update`.
    pub fn skipped(&self) -> usize {
        let expected = match self.command {
            Command::Init => Reason::AlreadyInstalled,
            Command::Update => Reason::NotInstalled,
        };
        self.target_results()
            .filter(|r| r.reason() == Some(&expected))
            .count()
    }

    /// Combinations or primary steps that failed outright.
    pub fn failed(&self) -> usize {
        let skipped_primary = self
            .skills
            .iter()
            .filter(|s| matches!(s.primary, StepResult::Failed(_)))
            .count();
        let failed_targets = self
            .target_results()
            .filter(|r| match r {
                StepResult::Failed(_) => true,
                StepResult::Done(Outcome::Refused(reason)) => !matches!(
                    reason,
                    Reason::AlreadyInstalled | Reason::NotInstalled
                ),
                StepResult::Done(_) => false,
            })
            .count();
        skipped_primary + failed_targets
    }
}

/// Skills to install: the named ones, all of them, or the only one there is.
pub fn select_for_init<'a>(
    skills: &'a [SkillDefinition],
    names: &[String],
    all: bool,
) -> Result<Vec<&'a SkillDefinition>> {
    if all {
        return Ok(skills.iter().collect());
    }
    if names.is_empty() {
        return match skills {
            [] => Err(Error::NoSkills(Default::default())),
            [only] => Ok(vec![only]),
            _ => Err(Error::AmbiguousSelection(
                skills.iter().map(|s| s.id.clone()).collect(),
            )),
        };
    }
    select_named(skills, names)
}

/// Skills to update: the named ones, or with `all` every skill installed in the project.
pub fn select_for_update<'a>(
    skills: &'a [SkillDefinition],
    names: &[String],
    all: bool,
    store: &PrimaryStore,
) -> Result<Vec<&'a SkillDefinition>> {
    if all {
        let installed: Vec<_> = skills.iter().filter(|s| store.is_installed(s)).collect();
        if installed.is_empty() {
            return Err(Error::NothingInstalled);
        }
        return Ok(installed);
    }
    if names.is_empty() {
        return Err(Error::NoUpdateSelection);
    }
    select_named(skills, names)
}

fn select_named<'a>(
    skills: &'a [SkillDefinition],
    names: &[String],
) -> Result<Vec<&'a SkillDefinition>> {
    let mut selected: Vec<&SkillDefinition> = Vec::new();
    for name in names {
        let skill =
            catalog::find(skills, name).ok_or_else(|| Error::UnknownSkill(name.clone()))?;
        if !selected.iter().any(|s| s.id == skill.id) {
            selected.push(skill);
        }
    }
    Ok(selected)
}

/// Runs commands against one project with one tool table.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    settings: Settings,
    registry: ToolRegistry,
    store: PrimaryStore,
    projector: Projector,
}

impl Orchestrator {
    pub fn new(settings: Settings, registry: ToolRegistry) -> Self {
        let store = PrimaryStore::new(&settings);
        let projector = Projector::new(&settings);
        Self {
            settings,
            registry,
            store,
            projector,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn store(&self) -> &PrimaryStore {
        &self.store
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    pub fn catalog(&self) -> Result<Vec<SkillDefinition>> {
        catalog::discover(&self.settings.skills_root)
    }

    /// Resolve `--tools` / `--only` into targets. `--only` wins; neither means the defaults.
    pub fn select_tools(&self, tools: Option<&str>, only: Option<&str>) -> Result<Vec<ToolTarget>> {
        let selected = match (only, tools) {
            (Some(one), _) => vec![self.registry.lookup(one)?],
            (None, Some(list)) => self.registry.resolve_list(list)?,
            (None, None) => self.registry.defaults(),
        };
        Ok(selected.into_iter().cloned().collect())
    }

    /// Render the catalog and the supported tools.
    pub fn list(&self) -> Result<String> {
        let skills = self.catalog()?;
        Ok(render::render_list(&skills, &self.registry))
    }

    pub fn init(&self, names: &[String], all: bool, tools: &[ToolTarget]) -> Result<RunReport> {
        let skills = self.catalog()?;
        let selected = select_for_init(&skills, names, all).map_err(|e| match e {
            Error::NoSkills(_) => Error::NoSkills(self.settings.skills_root.clone()),
            other => other,
        })?;
        info!(
            "Installing {} skill(s) for {} tool(s)",
            selected.len(),
            tools.len()
        );

        let reports = selected
            .into_iter()
            .map(|skill| self.run_skill(Command::Init, skill, tools))
            .collect();
        Ok(RunReport {
            command: Command::Init,
            tools: tools.to_vec(),
            skills: reports,
        })
    }

    pub fn update(&self, names: &[String], all: bool, tools: &[ToolTarget]) -> Result<RunReport> {
        let skills = self.catalog()?;
        let selected = select_for_update(&skills, names, all, &self.store)?;
        info!(
            "Updating {} skill(s) for {} tool(s)",
            selected.len(),
            tools.len()
        );

        let reports = selected
            .into_iter()
            .map(|skill| self.run_skill(Command::Update, skill, tools))
            .collect();
        Ok(RunReport {
            command: Command::Update,
            tools: tools.to_vec(),
            skills: reports,
        })
    }

    /// Primary step, then every target. The primary is a hard prerequisite.
    fn run_skill(&self, command: Command, skill: &SkillDefinition, tools: &[ToolTarget]) -> SkillReport {
        let primary = StepResult::from_result(match command {
            Command::Init => self.store.install(skill),
            Command::Update => self.store.update(skill),
        });

        let mut report = SkillReport {
            skill_id: skill.id.clone(),
            display_name: skill.display_name().to_string(),
            primary,
            targets: Vec::new(),
        };

        let proceed = match (&report.primary, command) {
            (StepResult::Failed(e), _) => {
                error!("Primary step for {} failed: {}", skill.id, e);
                false
            }
            (StepResult::Done(Outcome::Applied { .. }), _) => true,
            (StepResult::Done(Outcome::Refused(Reason::AlreadyInstalled)), Command::Init) => true,
            (StepResult::Done(Outcome::Refused(_)), _) => false,
        };
        if !proceed {
            return report;
        }

        for target in tools {
            let result = StepResult::from_result(match command {
                Command::Init => self.projector.install(skill, target),
                Command::Update => self.projector.update(skill, target),
            });
            let aborted = matches!(result, StepResult::Failed(_));
            if let StepResult::Failed(e) = &result {
                error!("{} for {} failed, skipping remaining tools: {}", target.id, skill.id, e);
            }
            report.targets.push(TargetReport {
                tool_id: target.id.clone(),
                label: target.label.clone(),
                result,
            });
            if aborted {
                break;
            }
        }
        report
    }
}
