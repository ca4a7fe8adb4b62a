use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// File name of the per-skill manifest inside the package.
pub const MANIFEST_FILE: &str = "skill.json";

/// Directory holding a skill's canonical template tree.
pub const TEMPLATES_DIR: &str = "templates";

/// The main document of every skill. Its presence marks an installation as real.
pub const MAIN_DOCUMENT: &str = "SKILL.md";

/// Subtree of a skill holding reference documents.
pub const REFERENCES_DIR: &str = "references";

/// The manifest record as it appears in `skill.json`.
///
/// Unknown fields are kept in `extra` so that they survive onto the loaded skill.
/// Any JSON object is a valid manifest: missing fields default to empty and
/// scalar values are read as their text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkillManifest {
    #[serde(default, deserialize_with = "loose_string")]
    pub version: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub description: String,
    #[serde(default, deserialize_with = "loose_optional")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "loose_tags")]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn text_of(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn loose_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(text_of(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn loose_optional<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(text_of(Value::deserialize(deserializer)?))
}

/// Only an array is a tag list; its non-null items are read as text.
fn loose_tags<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(text_of).collect(),
        _ => Vec::new(),
    })
}

/// A skill shipped by the package.
///
/// Constructed once per run from a manifest and never mutated afterwards.
/// The identifier is the name of the skill's directory in the package, so it is
/// directory-safe and unique within one skills root.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillDefinition {
    pub id: String,
    pub manifest: SkillManifest,
    /// Root of the canonical template tree (`<skills_root>/<id>/templates`).
    pub templates_dir: PathBuf,
}

impl SkillDefinition {
    pub fn new(id: impl Into<String>, manifest: SkillManifest, package_dir: &Path) -> Self {
        Self {
            id: id.into(),
            manifest,
            templates_dir: package_dir.join(TEMPLATES_DIR),
        }
    }

    /// Display name, falling back to the identifier.
    pub fn display_name(&self) -> &str {
        self.manifest.display_name.as_deref().unwrap_or(&self.id)
    }

    pub fn version(&self) -> &str {
        &self.manifest.version
    }

    pub fn description(&self) -> &str {
        &self.manifest.description
    }

    pub fn tags(&self) -> &[String] {
        &self.manifest.tags
    }

    /// Location of this skill's primary installation, relative to the project root.
    pub fn primary_path(&self, primary_base: &Path) -> PathBuf {
        primary_base.join(&self.id)
    }
}
