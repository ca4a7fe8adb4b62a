//! Discovery of the skills shipped in a package.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Error, IoContext, Result};
use crate::models::{SkillDefinition, SkillManifest, MANIFEST_FILE};

/// Load every skill under `skills_root`.
///
/// Each immediate subdirectory with a `skill.json` is one skill. Directories
/// without a manifest are ignored; a manifest that does not parse is logged and
/// skipped. The result is in directory enumeration order, which is not sorted.
pub fn discover(skills_root: &Path) -> Result<Vec<SkillDefinition>> {
    if !skills_root.is_dir() {
        return Err(Error::SkillsRootMissing(skills_root.to_path_buf()));
    }

    let mut skills = Vec::new();
    for entry in fs::read_dir(skills_root).at(skills_root)? {
        let entry = entry.at(skills_root)?;
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_dir() {
            continue;
        }

        let dir = entry.path();
        let manifest_path = dir.join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            debug!("No {} in {:?}, skipping", MANIFEST_FILE, dir);
            continue;
        }

        let id = entry.file_name().to_string_lossy().into_owned();
        match load_manifest(&manifest_path) {
            Ok(manifest) => {
                debug!("Loaded skill: {} from {:?}", id, dir);
                skills.push(SkillDefinition::new(id, manifest, &dir));
            }
            Err(e) => {
                warn!("Skipping skill \"{}\": invalid {}: {}", id, MANIFEST_FILE, e);
            }
        }
    }

    Ok(skills)
}

fn load_manifest(path: &Path) -> anyhow::Result<SkillManifest> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Find a skill by its identifier.
pub fn find<'a>(skills: &'a [SkillDefinition], id: &str) -> Option<&'a SkillDefinition> {
    skills.iter().find(|s| s.id == id)
}

/// Number of markdown files anywhere under `dir`.
pub fn count_markdown_files(dir: &Path) -> usize {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn missing_root_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let err = discover(&tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, Error::SkillsRootMissing(_)));
    }

    #[test]
    fn skips_malformed_and_manifestless_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        write(
            &root.join("good/skill.json"),
            r#"{"version": "1.0.0", "description": "Good"}"#,
        );
        write(&root.join("broken/skill.json"), "{ not json");
        fs::create_dir_all(root.join("empty")).unwrap();
        write(&root.join("stray.txt"), "hello");

        let skills = discover(root).unwrap();
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].id, "good");
        assert_eq!(skills[0].templates_dir, root.join("good/templates"));
        assert!(find(&skills, "good").is_some());
        assert!(find(&skills, "broken").is_none());
    }

    #[test]
    fn counts_markdown_recursively() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        write(&root.join("SKILL.md"), "");
        write(&root.join("references/a/b.md"), "");
        write(&root.join("references/notes.txt"), "");
        assert_eq!(count_markdown_files(root), 2);
    }

    #[test]
    fn keeps_skills_with_sparse_or_loose_manifests() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        write(&root.join("bare/skill.json"), r#"{"version": "1.0.0"}"#);
        write(
            &root.join("numeric/skill.json"),
            r#"{"version": 2, "description": "d", "tags": "solo"}"#,
        );

        let skills = discover(root).unwrap();
        assert_eq!(skills.len(), 2);

        let bare = find(&skills, "bare").unwrap();
        assert_eq!(bare.version(), "1.0.0");
        assert_eq!(bare.description(), "");

        let numeric = find(&skills, "numeric").unwrap();
        assert_eq!(numeric.version(), "2");
        assert_eq!(numeric.description(), "d");
        assert!(numeric.tags().is_empty());
    }
}
