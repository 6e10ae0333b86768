//! Error types for hostfrag-inventory

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::store::FragmentKind;

/// Errors that abort inventory assembly
///
/// Every variant is fatal: callers are expected to stop and report rather than
/// emit a partial inventory.
#[derive(Error, Debug, Clone)]
pub enum InventoryError {
    /// A fragment directory could not be listed
    #[error("cannot read directory {}: {reason}", path.display())]
    DirectoryUnreadable {
        /// Directory that failed to list
        path: PathBuf,
        /// Underlying I/O error
        reason: String,
    },

    /// A fragment that should exist could not be read
    #[error("cannot read fragment {}: {reason}", path.display())]
    FragmentUnreadable {
        /// Fragment location
        path: PathBuf,
        /// Underlying I/O error
        reason: String,
    },

    /// A fragment is not valid JSON of the expected shape
    #[error("malformed fragment {}: {reason}", path.display())]
    MalformedFragment {
        /// Fragment location
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// Two fragments of the same kind derive the same name
    #[error("duplicate {kind} fragment '{name}': {} and {}", first.display(), second.display())]
    DuplicateFragment {
        /// Group or host
        kind: FragmentKind,
        /// Derived name shared by both fragments
        name: String,
        /// Fragment seen first in listing order
        first: PathBuf,
        /// Fragment seen second
        second: PathBuf,
    },

    /// A group fragment uses a name reserved by the output format
    #[error("group name '{0}' is reserved")]
    ReservedName(String),

    /// The assembled document could not be serialized
    #[error("failed to render JSON: {0}")]
    Render(String),
}

impl InventoryError {
    /// Path of the file or directory the error is about, if any
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            InventoryError::DirectoryUnreadable { path, .. }
            | InventoryError::FragmentUnreadable { path, .. }
            | InventoryError::MalformedFragment { path, .. } => Some(path),
            InventoryError::DuplicateFragment { second, .. } => Some(second),
            InventoryError::ReservedName(_) | InventoryError::Render(_) => None,
        }
    }
}
