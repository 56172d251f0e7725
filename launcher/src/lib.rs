//! Builds the `jbang` argument vector for running, debugging and deploying
//! Camel integration files.
//!
//! The external launcher is positional-flag sensitive, so token order is
//! fixed by [`compose`] and identical inputs always produce an identical
//! vector.

use std::path::{Path, PathBuf};

mod compose;
mod vector;

pub use compose::compose;
pub use vector::{ArgToken, ArgumentVector, Quoting};

/// What the launch is supposed to do. Closed set: the composer matches
/// exhaustively, so a new mode has to be handled everywhere it matters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchMode {
    /// Plain `camel run`.
    Run,
    /// `camel run` with the debugger enabled and suspended until a client
    /// attaches.
    Debug,
    /// `camel kubernetes run`: deploy the integration to a cluster.
    Deploy,
    /// `camel plugin add <name>`.
    AddPlugin { name: String },
}

/// File-selection breadth of a launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchScope {
    /// A single integration file, given relative to the workspace root.
    OpenedFile { relative_path: String },
    /// Every integration file in the workspace.
    Workspace,
    /// Every integration file in one directory, run from that directory.
    ContainingFolder { dir: PathBuf },
}

impl LaunchScope {
    /// The positional file pattern handed to the launcher.
    pub fn pattern(&self) -> &str {
        match self {
            LaunchScope::OpenedFile { relative_path } => relative_path,
            LaunchScope::Workspace | LaunchScope::ContainingFolder { .. } => "*",
        }
    }

    /// Working directory override, `None` meaning inherit.
    pub fn working_dir(&self) -> Option<&Path> {
        match self {
            LaunchScope::ContainingFolder { dir } => Some(dir),
            LaunchScope::OpenedFile { .. } | LaunchScope::Workspace => None,
        }
    }
}
