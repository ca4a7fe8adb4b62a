#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use skillport::catalog;
use skillport::commands::Orchestrator;
use skillport::config::Settings;
use skillport::models::{SkillDefinition, ToolRegistry, ToolTarget};
use tempfile::TempDir;

/// A package skills root and an empty project, both in one temp dir.
pub struct Fixture {
    _tmp: TempDir,
    pub skills_root: PathBuf,
    pub project: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("Failed to create temp dir");
        let skills_root = tmp.path().join("package/skills");
        let project = tmp.path().join("project");
        fs::create_dir_all(&skills_root).expect("Failed to create skills root");
        fs::create_dir_all(&project).expect("Failed to create project");
        Self {
            _tmp: tmp,
            skills_root,
            project,
        }
    }

    pub fn write_manifest(&self, id: &str, json: &str) {
        write(&self.skills_root.join(id).join("skill.json"), json);
    }

    pub fn write_template(&self, id: &str, relative: &str, content: &str) {
        write(
            &self.skills_root.join(id).join("templates").join(relative),
            content,
        );
    }

    /// A skill with front matter, references in two categories, and a stray text file.
    pub fn add_skill(&self, id: &str) {
        self.write_manifest(
            id,
            &format!(
                r#"{{"version": "1.0.0", "description": "{} rules", "displayName": "{} Skill"}}"#,
                id, id
            ),
        );
        self.write_template(
            id,
            "SKILL.md",
            &format!("---\nname: {}\ndescription: test\n---\n\n# {}\n\nMain body.\n", id, id),
        );
        self.write_template(id, "references/components/button.md", "# Button\n");
        self.write_template(id, "references/foundations/color.md", "# Color\n");
        self.write_template(id, "references/readme.txt", "not markdown");
    }

    pub fn settings(&self) -> Settings {
        Settings::new(&self.project, &self.skills_root, ".agents/skills")
    }

    pub fn orchestrator(&self) -> Orchestrator {
        Orchestrator::new(self.settings(), ToolRegistry::builtin())
    }

    pub fn skill(&self, id: &str) -> SkillDefinition {
        let skills = catalog::discover(&self.skills_root).expect("Failed to discover skills");
        catalog::find(&skills, id)
            .cloned()
            .expect("Skill not found")
    }

    pub fn target(&self, id: &str) -> ToolTarget {
        ToolRegistry::builtin()
            .get(id)
            .cloned()
            .expect("Unknown tool")
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.project.join(relative)
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).expect("Failed to read file")
    }

    /// Entries in `dir` (project-relative) whose names start with `prefix`.
    pub fn entries_with_prefix(&self, dir: &str, prefix: &str) -> Vec<PathBuf> {
        let mut found: Vec<PathBuf> = fs::read_dir(self.path(dir))
            .expect("Failed to read dir")
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(prefix))
            .map(|e| e.path())
            .collect();
        found.sort();
        found
    }

    /// Every path under the project with file contents and link targets.
    pub fn snapshot(&self) -> Vec<(PathBuf, String)> {
        snapshot(&self.project)
    }
}

pub fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().expect("path has a parent")).expect("Failed to create dirs");
    fs::write(path, content).expect("Failed to write file");
}

pub fn snapshot(root: &Path) -> Vec<(PathBuf, String)> {
    let mut entries: Vec<(PathBuf, String)> = walkdir::WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| {
            let path = e.path().strip_prefix(root).unwrap().to_path_buf();
            let kind = e.file_type();
            let detail = if kind.is_symlink() {
                format!("link:{}", fs::read_link(e.path()).unwrap().display())
            } else if kind.is_file() {
                format!("file:{}", fs::read_to_string(e.path()).unwrap())
            } else {
                "dir".to_string()
            };
            (path, detail)
        })
        .collect();
    entries.sort();
    entries
}
