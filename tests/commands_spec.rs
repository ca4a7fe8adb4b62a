mod common;

use std::fs;

use common::Fixture;
use skillport::commands::{render, Command, StepResult};
use skillport::models::*;
use skillport::Error;
use speculate2::speculate;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

speculate! {
    before {
        let fx = Fixture::new();
        let orchestrator = fx.orchestrator();
    }

    describe "list" {
        it "shows declared tags and omits the line when there are none" {
            fx.write_manifest("a", r#"{"version": "1.0.0", "description": "Skill A"}"#);
            fx.write_template("a", "SKILL.md", "# A\n");
            fx.write_manifest("b", r#"{"version": "2.0.0", "description": "Skill B", "tags": ["x", "y"]}"#);
            fx.write_template("b", "SKILL.md", "# B\n");
            fx.write_template("b", "references/one.md", "# One\n");

            let out = orchestrator.list().expect("Failed to list");

            assert!(out.contains("Available skills (2):"));
            assert!(out.contains("  a  v1.0.0\n    Skill A\n    1 markdown files\n\n"));
            assert!(out.contains("  b  v2.0.0\n    Skill B\n    2 markdown files\n    Tags: x, y\n\n"));
            assert_eq!(out.matches("Tags:").count(), 1);
        }

        it "fails when the skills directory is missing" {
            fs::remove_dir_all(&fx.skills_root).unwrap();

            let err = orchestrator.list().unwrap_err();

            assert!(matches!(err, Error::SkillsRootMissing(_)));
            assert!(err.is_selection());
        }
    }

    describe "tool selection" {
        it "uses the defaults when nothing is given" {
            let tools = orchestrator.select_tools(None, None).expect("Failed");
            let ids: Vec<_> = tools.iter().map(|t| t.id.as_str()).collect();
            assert_eq!(ids, vec!["claude", "cursor", "windsurf"]);
        }

        it "lets --only win over --tools" {
            let tools = orchestrator.select_tools(Some("all"), Some("Copilot")).expect("Failed");
            assert_eq!(tools.len(), 1);
            assert_eq!(tools[0].id, "copilot");
        }

        it "rejects unknown tools" {
            let err = orchestrator.select_tools(Some("claude,emacs"), None).unwrap_err();
            assert!(matches!(err, Error::UnknownTool { .. }));
        }
    }

    describe "init" {
        before {
            fx.add_skill("ui");
        }

        it "installs the only skill when none is named" {
            let tools = orchestrator.select_tools(Some("all"), None).expect("Failed");

            let report = orchestrator.init(&[], false, &tools).expect("Failed to init");

            assert_eq!(report.command, Command::Init);
            assert_eq!(report.skills.len(), 1);
            assert_eq!(report.applied(), 5);
            assert_eq!(report.failed(), 0);
            assert!(fx.path(".agents/skills/ui/SKILL.md").is_file());
            assert!(fx.path(".windsurf/rules/ui.md").is_file());
            assert!(fx.path(".github/copilot-instructions.md").is_file());
            assert!(fx.path(".gemini/skills/ui/SKILL.md").is_file());
        }

        it "requires a choice when several skills exist" {
            fx.add_skill("forms");
            let tools = orchestrator.select_tools(None, None).expect("Failed");

            let err = orchestrator.init(&[], false, &tools).unwrap_err();

            assert!(matches!(err, Error::AmbiguousSelection(_)));
            assert!(fx.snapshot().is_empty());
        }

        it "rejects unknown skills before writing anything" {
            let tools = orchestrator.select_tools(None, None).expect("Failed");

            let err = orchestrator.init(&names(&["ui", "nope"]), false, &tools).unwrap_err();

            assert!(matches!(err, Error::UnknownSkill(ref n) if n == "nope"));
            assert!(fx.snapshot().is_empty());
        }

        it "counts already installed combinations as skipped on rerun" {
            let tools = orchestrator.select_tools(Some("windsurf,copilot"), None).expect("Failed");
            orchestrator.init(&names(&["ui"]), false, &tools).expect("Failed to init");
            let before = fx.snapshot();

            let report = orchestrator.init(&names(&["ui"]), false, &tools).expect("Failed to init");

            assert_eq!(report.applied(), 0);
            assert_eq!(report.skipped(), 2);
            assert_eq!(fx.snapshot(), before);
            let out = render::render_report(&report, orchestrator.settings());
            assert!(out.contains("All skills already installed."));
        }

        it "skips projections when the primary step fails and carries on" {
            fx.write_manifest("broken", r#"{"version": "1.0.0", "description": "No templates"}"#);
            let tools = orchestrator.select_tools(Some("windsurf"), None).expect("Failed");

            let report = orchestrator.init(&names(&["broken", "ui"]), false, &tools).expect("Failed to init");

            let broken = &report.skills[0];
            assert!(matches!(broken.primary, StepResult::Failed(_)));
            assert!(broken.targets.is_empty());
            assert!(!fx.path(".agents/skills/broken").exists());
            assert!(!fx.path(".windsurf/rules/broken.md").exists());

            let ui = &report.skills[1];
            assert!(ui.primary.is_applied());
            assert_eq!(ui.targets.len(), 1);
            assert_eq!(report.applied(), 1);
            assert_eq!(report.failed(), 1);
        }
    }

    describe "update" {
        before {
            fx.add_skill("ui");
            fx.add_skill("forms");
        }

        it "needs names or --all" {
            let tools = orchestrator.select_tools(None, None).expect("Failed");
            let err = orchestrator.update(&[], false, &tools).unwrap_err();
            assert!(matches!(err, Error::NoUpdateSelection));
        }

        it "errors when --all finds nothing installed" {
            let tools = orchestrator.select_tools(None, None).expect("Failed");
            let err = orchestrator.update(&[], true, &tools).unwrap_err();
            assert!(matches!(err, Error::NothingInstalled));
            assert!(fx.snapshot().is_empty());
        }

        it "with --all touches only installed skills" {
            let tools = orchestrator.select_tools(Some("windsurf"), None).expect("Failed");
            orchestrator.init(&names(&["ui"]), false, &tools).expect("Failed to init");

            let report = orchestrator.update(&[], true, &tools).expect("Failed to update");

            assert_eq!(report.skills.len(), 1);
            assert_eq!(report.skills[0].skill_id, "ui");
            assert_eq!(report.applied(), 1);
            assert!(!fx.path(".agents/skills/forms").exists());
        }

        it "skips projections of a skill whose primary is missing" {
            let tools = orchestrator.select_tools(Some("windsurf"), None).expect("Failed");

            let report = orchestrator.update(&names(&["forms"]), false, &tools).expect("Failed to update");

            assert_eq!(
                report.skills[0].primary.reason(),
                Some(&Reason::NotInstalled)
            );
            assert!(report.skills[0].targets.is_empty());
            let out = render::render_report(&report, orchestrator.settings());
            assert!(out.contains("Primary: not installed (use init first)"));
        }

        it "reports targets that were never installed as skipped" {
            let init_tools = orchestrator.select_tools(Some("windsurf"), None).expect("Failed");
            orchestrator.init(&names(&["ui"]), false, &init_tools).expect("Failed to init");

            let tools = orchestrator.select_tools(Some("windsurf,copilot"), None).expect("Failed");
            let report = orchestrator.update(&names(&["ui"]), false, &tools).expect("Failed to update");

            assert_eq!(report.applied(), 1);
            assert_eq!(report.skipped(), 1);
            let out = render::render_report(&report, orchestrator.settings());
            assert!(out.contains("◆ GitHub Copilot: not installed"));
            assert!(out.contains("✓ Updated 1 skill-tool combination(s)"));
        }
    }
}
