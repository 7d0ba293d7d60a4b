//! Provides the error type used at the fallible boundaries of this crate.
//!
//! Lookups that find nothing are not errors: they return `None` or do nothing.
//! [TreeError] is only produced when parsing input or by the hardened `try_*` operations
//! on [crate::Tree].

use thiserror::Error;

/// The error type of this crate
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("No root node set")]
    RootNotSet,
    #[error("Node not in tree: {0}")]
    UnknownNode(String),
    #[error("Node {0} cannot become a descendant of itself")]
    Ancestry(String),
    #[error("Unknown traversal: {0}")]
    UnknownTraversal(String),
    #[error("Invalid tree data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Shortcut for results carrying a [TreeError]
pub type Result<T> = std::result::Result<T, TreeError>;
