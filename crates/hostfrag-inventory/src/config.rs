//! Data directory layout

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::store::FragmentKind;

/// Where fragments live on disk
///
/// Groups are read from `<data_dir>/<environment>/groups` and hosts from
/// `<data_dir>/<environment>/hosts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataLayout {
    /// Base inventory directory
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Environment segment below the base directory
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl Default for DataLayout {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            environment: default_environment(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("inventory")
}

fn default_environment() -> String {
    "production".to_string()
}

impl DataLayout {
    /// Create a layout for a base directory and environment
    pub fn new(data_dir: impl Into<PathBuf>, environment: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            environment: environment.into(),
        }
    }

    /// Root of the selected environment
    #[must_use]
    pub fn environment_dir(&self) -> PathBuf {
        self.data_dir.join(&self.environment)
    }

    /// Directory holding group fragments
    #[must_use]
    pub fn groups_dir(&self) -> PathBuf {
        self.environment_dir().join("groups")
    }

    /// Directory holding host fragments
    #[must_use]
    pub fn hosts_dir(&self) -> PathBuf {
        self.environment_dir().join("hosts")
    }

    /// Directory for a fragment kind
    #[must_use]
    pub fn dir_for(&self, kind: FragmentKind) -> PathBuf {
        match kind {
            FragmentKind::Group => self.groups_dir(),
            FragmentKind::Host => self.hosts_dir(),
        }
    }
}
