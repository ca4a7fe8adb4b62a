//! Error types for skillport.
//!
//! Only two kinds of failure are errors. Selection problems stop the run before
//! anything is written. I/O failures abort the current skill. Everything else
//! ("already installed", "not installed", a failed symlink) is an
//! [`Outcome`](crate::models::Outcome), not an error.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Skills directory not found at {}. Package may be corrupted.", .0.display())]
    SkillsRootMissing(PathBuf),

    #[error("No skills found in {}", .0.display())]
    NoSkills(PathBuf),

    #[error("Unknown skill: \"{0}\"")]
    UnknownSkill(String),

    #[error("Unknown tool: \"{name}\" (available: {})", .available.join(", "))]
    UnknownTool {
        name: String,
        available: Vec<String>,
    },

    #[error("Please specify which skill(s) to install. Available: {}", .0.join(", "))]
    AmbiguousSelection(Vec<String>),

    #[error("Please specify which skill(s) to update, or use --all.")]
    NoUpdateSelection,

    #[error("No installed skills found to update.")]
    NothingInstalled,

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid block pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl Error {
    /// Whether this error comes from resolving what to do rather than from doing it.
    ///
    /// Selection errors map to exit code 1.
    pub fn is_selection(&self) -> bool {
        !matches!(self, Self::Io { .. } | Self::Pattern(_))
    }

    /// A follow-up hint for the user, if there is one.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::UnknownSkill(_) => Some("Run \"skillport list\" to see available skills."),
            Self::AmbiguousSelection(_) => Some("Or use --all to install everything."),
            Self::NothingInstalled => Some("Use \"init\" to install skills first."),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Attach the offending path to an I/O error.
pub(crate) trait IoContext<T> {
    fn at(self, path: &Path) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at(self, path: &Path) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
