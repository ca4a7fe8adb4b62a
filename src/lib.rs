//! skillport: install markdown skills into a project for every AI coding tool at once.
//!
//! One canonical copy of each skill (the primary installation) lives in the
//! project; each tool gets a projection of it in the shape that tool reads:
//! a symlink, a private copy, one consolidated file, or a block in a shared
//! instructions file.

pub mod catalog;
pub mod commands;
pub mod config;
pub mod consolidate;
pub mod error;
pub mod mirror;
pub mod models;
pub mod projector;
pub mod store;

pub use error::{Error, Result};
