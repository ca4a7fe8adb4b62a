//! Plain-text rendering of command output.

use std::fmt::Write;
use std::path::Path;

use super::{Command, RunReport, SkillReport, StepResult};
use crate::catalog;
use crate::config::Settings;
use crate::models::{Action, Outcome, Reason, SkillDefinition, ToolRegistry};

const INFO: char = 'ℹ';
const SUCCESS: char = '✓';
const WARN: char = '⚠';
const STEP: char = '→';
const TOOL: char = '◆';

/// `a/b` rendered with forward slashes and a trailing slash, as users see directories.
fn dir_display(path: &Path) -> String {
    let mut s = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    s.push('/');
    s
}

fn file_display(path: &Path) -> String {
    let mut s = dir_display(path);
    s.pop();
    s
}

/// Catalog listing followed by the supported tools.
///
/// Example output:
/// ```text
/// Available skills (1):
///
///   ui  v1.0.0
///     Design system rules
///     12 markdown files
///     Tags: ui, css
///
/// Supported Tools:
///   claude (default)
///     .claude/skills - Symlink to the primary install
/// ```
pub fn render_list(skills: &[SkillDefinition], registry: &ToolRegistry) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Available skills ({}):\n", skills.len());

    for skill in skills {
        let _ = writeln!(out, "  {}  v{}", skill.id, skill.version());
        let _ = writeln!(out, "    {}", skill.description());
        if skill.templates_dir.is_dir() {
            let count = catalog::count_markdown_files(&skill.templates_dir);
            let _ = writeln!(out, "    {} markdown files", count);
        }
        if !skill.tags().is_empty() {
            let _ = writeln!(out, "    Tags: {}", skill.tags().join(", "));
        }
        out.push('\n');
    }

    out.push_str("Supported Tools:\n");
    for target in registry.all() {
        let default_tag = if registry.is_default(&target.id) {
            " (default)"
        } else {
            ""
        };
        let _ = writeln!(out, "  {}{}", target.id, default_tag);
        let _ = writeln!(
            out,
            "    {} - {}",
            file_display(&target.destination),
            target.description
        );
    }
    out
}

fn primary_line(report: &SkillReport, command: Command, settings: &Settings) -> String {
    let location = dir_display(&settings.primary_base.join(&report.skill_id));
    let text = match (&report.primary, command) {
        (StepResult::Done(Outcome::Applied { path, .. }), Command::Init) => {
            format!("installed {} {}", STEP, dir_display(path))
        }
        (StepResult::Done(Outcome::Applied { path, .. }), Command::Update) => {
            format!("updated {} {}", STEP, dir_display(path))
        }
        (StepResult::Done(Outcome::Refused(Reason::AlreadyInstalled)), _) => {
            format!("already exists at {}", location)
        }
        (StepResult::Done(Outcome::Refused(Reason::NotInstalled)), _) => {
            "not installed (use init first)".to_string()
        }
        (StepResult::Done(Outcome::Refused(reason)), _) => format!("failed ({})", reason),
        (StepResult::Failed(e), _) => format!("failed ({})", e),
    };
    format!("  {} Primary: {}", STEP, text)
}

fn applied_text(path: &Path, action: &Action, command: Command) -> String {
    let verb = match command {
        Command::Init => "installed",
        Command::Update => "updated",
    };
    match action {
        Action::Linked { target } => format!(
            "{} {} {} {} {}",
            verb,
            STEP,
            dir_display(path),
            STEP,
            dir_display(target)
        ),
        Action::LinkValid => format!("{} {} {} (symlink valid)", verb, STEP, dir_display(path)),
        Action::UserDirectory => {
            format!("{} {} {} (directory exists)", verb, STEP, dir_display(path))
        }
        Action::Installed | Action::Updated { .. } => {
            format!("{} {} {}", verb, STEP, file_display(path))
        }
    }
}

fn target_line(label: &str, result: &StepResult, command: Command) -> String {
    let text = match result {
        StepResult::Done(Outcome::Applied { path, action }) => applied_text(path, action, command),
        StepResult::Done(Outcome::Refused(Reason::AlreadyInstalled)) => {
            "already exists (use update)".to_string()
        }
        StepResult::Done(Outcome::Refused(Reason::NotInstalled)) => "not installed".to_string(),
        StepResult::Done(Outcome::Refused(reason)) => format!("failed ({})", reason),
        StepResult::Failed(e) => format!("failed ({})", e),
    };
    format!("  {} {}: {}", TOOL, label, text)
}

/// Progress lines and summary for an `init` or `update` run.
pub fn render_report(report: &RunReport, settings: &Settings) -> String {
    let mut out = String::new();
    let verb = match report.command {
        Command::Init => "Installing",
        Command::Update => "Updating",
    };
    let _ = writeln!(
        out,
        "{} {} {} skill(s) for {} tool(s)...\n",
        INFO,
        verb,
        report.skills.len(),
        report.tools.len()
    );

    for skill in &report.skills {
        let _ = writeln!(out, "{}", skill.display_name);
        let _ = writeln!(out, "{}", primary_line(skill, report.command, settings));
        for target in &skill.targets {
            let _ = writeln!(out, "{}", target_line(&target.label, &target.result, report.command));
        }
        out.push('\n');
    }

    match report.command {
        Command::Init => render_init_summary(&mut out, report, settings),
        Command::Update => render_update_summary(&mut out, report),
    }
    out
}

fn render_init_summary(out: &mut String, report: &RunReport, settings: &Settings) {
    let (installed, skipped) = (report.applied(), report.skipped());
    if installed > 0 {
        let _ = writeln!(out, "{} Installed {} skill-tool combination(s)", SUCCESS, installed);
        if skipped > 0 {
            let _ = writeln!(out, "{} Skipped {} (already installed)", WARN, skipped);
        }
        out.push('\n');
        render_next_steps(out, report, settings);
    } else if skipped > 0 {
        let _ = writeln!(
            out,
            "{} All skills already installed. Use \"update\" to refresh.",
            WARN
        );
    }
}

fn render_update_summary(out: &mut String, report: &RunReport) {
    let (updated, skipped) = (report.applied(), report.skipped());
    if updated > 0 {
        let _ = writeln!(out, "{} Updated {} skill-tool combination(s)", SUCCESS, updated);
    }
    if skipped > 0 {
        let _ = writeln!(out, "{} Skipped {} (not installed)", WARN, skipped);
    }
}

fn render_next_steps(out: &mut String, report: &RunReport, settings: &Settings) {
    let primary = dir_display(&settings.primary_base);

    out.push_str("Installation Locations:\n");
    let _ = writeln!(out, "  Primary: {} (source of truth)", primary);
    for target in &report.tools {
        let _ = writeln!(
            out,
            "  {}: {} ({})",
            target.label,
            dir_display(&target.destination),
            target.format.as_str()
        );
    }

    out.push_str("\nNext Steps:\n");
    out.push_str("  1. Your AI tools will automatically detect the installed rules\n");
    out.push_str("  2. Start coding with the installed skills in context\n");
    let _ = writeln!(
        out,
        "  3. Edit files in {} - run \"update\" to refresh generated copies",
        primary
    );

    if let Some(claude) = report.tools.iter().find(|t| t.id == "claude") {
        out.push_str("\nFor Claude Code, you can add to your CLAUDE.md:\n");
        for skill in &report.skills {
            let _ = writeln!(
                out,
                "  \"Use the {} skill in {} for this project.\"",
                skill.skill_id,
                dir_display(&claude.destination.join(&skill.skill_id))
            );
        }
    }
}
