use std::fmt;
use std::path::PathBuf;

/// Result of one install or update step.
///
/// Soft failures are values so that one refused step never stops its siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The step did its job. `path` is relative to the project root.
    Applied { path: PathBuf, action: Action },
    /// The step wrote nothing.
    Refused(Reason),
}

impl Outcome {
    pub fn applied(path: impl Into<PathBuf>, action: Action) -> Self {
        Self::Applied {
            path: path.into(),
            action,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    pub fn reason(&self) -> Option<&Reason> {
        match self {
            Self::Applied { .. } => None,
            Self::Refused(reason) => Some(reason),
        }
    }
}

/// What an applied step actually did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Installed,
    /// Existing content was backed up to `backup` and then refreshed.
    Updated { backup: PathBuf },
    /// A symlink was created (or recreated) pointing at `target`.
    Linked { target: PathBuf },
    /// The symlink was already correct; nothing was touched.
    LinkValid,
    /// A real directory sits where the link would go. It belongs to the user.
    UserDirectory,
}

/// Why a step wrote nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    AlreadyInstalled,
    NotInstalled,
    PrimaryNotInstalled,
    SymlinkFailed(String),
    /// A begin marker without its end marker; the block cannot be replaced safely.
    UnterminatedBlock,
}

impl Reason {
    pub fn code(&self) -> &'static str {
        match self {
            Self::AlreadyInstalled => "already_installed",
            Self::NotInstalled => "not_installed",
            Self::PrimaryNotInstalled => "primary_not_installed",
            Self::SymlinkFailed(_) => "symlink_failed",
            Self::UnterminatedBlock => "unterminated_block",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SymlinkFailed(msg) => write!(f, "{}: {}", self.code(), msg),
            _ => f.write_str(self.code()),
        }
    }
}

/// What the filesystem says about one artifact, before anything is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactState {
    Absent,
    /// Present and recognised as ours. The path is relative to the project root.
    Installed(PathBuf),
    Conflicting(Conflict),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conflict {
    /// A symlink that resolves somewhere other than the primary installation.
    LinkElsewhere(PathBuf),
    /// A real directory where a symlink is expected.
    RealDirectory,
    /// Something else entirely (a plain file, say) where a directory or link is expected.
    Occupied,
    UnterminatedBlock,
}
