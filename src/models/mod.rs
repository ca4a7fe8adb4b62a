//! Domain models for skillport.
//!
//! # Core Concepts
//!
//! ## Package Side
//!
//! - [`SkillDefinition`]: One skill shipped by the package, loaded from its `skill.json`
//!   manifest. Read-only for the rest of the run.
//!
//! ## Project Side
//!
//! - Primary installation: the canonical copy of a skill under the primary base path
//!   (`.agents/skills/{id}` by default). Every projection derives from it.
//! - [`ToolTarget`]: Where and how one AI tool wants to see a skill.
//!   The set of targets is a [`ToolRegistry`], built once at startup.
//! - [`ArtifactState`]: What the filesystem currently says about one projected artifact.
//!   There is no state file; the filesystem is the state.
//!
//! ## Results
//!
//! - [`Outcome`]: The value every install/update step returns. Soft failures are
//!   [`Reason`]s, not errors.

mod outcome;
mod skill;
mod tool;

pub use outcome::*;
pub use skill::*;
pub use tool::*;
