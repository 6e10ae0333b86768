//! Filesystem-backed fragment store

use std::fs;
use std::io::ErrorKind;

use tracing::{debug, instrument, trace};

use crate::config::DataLayout;
use crate::error::InventoryError;
use crate::store::{
    FragmentKind, FragmentRef, FragmentStore, ensure_unique, fragment_name, is_valid_fragment_name,
};

/// Fragment store reading `*.json` files from a [`DataLayout`]
///
/// Only regular files (symlinks are followed) with a `json` extension count as
/// fragments. Other directory entries are skipped.
#[derive(Debug, Clone, Default)]
pub struct DirectoryStore {
    layout: DataLayout,
}

impl DirectoryStore {
    /// Create a store over the given layout
    #[must_use]
    pub fn new(layout: DataLayout) -> Self {
        Self { layout }
    }

    /// Layout this store reads from
    #[must_use]
    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }
}

impl FragmentStore for DirectoryStore {
    #[instrument(skip(self), level = "debug")]
    fn list(&self, kind: FragmentKind) -> Result<Vec<FragmentRef>, InventoryError> {
        let dir = self.layout.dir_for(kind);
        let unreadable = |e: std::io::Error| InventoryError::DirectoryUnreadable {
            path: dir.clone(),
            reason: e.to_string(),
        };

        let mut fragments = Vec::new();
        for entry in fs::read_dir(&dir).map_err(unreadable)? {
            let entry = entry.map_err(unreadable)?;
            let path = entry.path();

            let Some(file_name) = entry.file_name().to_str().map(str::to_owned) else {
                debug!(path = %path.display(), "skipping non UTF-8 file name");
                continue;
            };
            let Some(name) = fragment_name(&file_name) else {
                trace!(path = %path.display(), "skipping non-fragment entry");
                continue;
            };

            let metadata = fs::metadata(&path).map_err(|e| InventoryError::FragmentUnreadable {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            if !metadata.is_file() {
                debug!(path = %path.display(), "skipping entry that is not a regular file");
                continue;
            }

            fragments.push(FragmentRef::new(kind, name, path.clone()));
        }

        fragments.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.location.cmp(&b.location)));
        debug!(dir = %dir.display(), count = fragments.len(), "listed fragments");
        Ok(fragments)
    }

    /// Scans the directory for entries deriving `name`, so `web.JSON` is found
    /// and `web.json` next to `web.JSON` is a duplicate here as in [`list`].
    /// Entries deriving other names are never inspected.
    ///
    /// [`list`]: FragmentStore::list
    fn locate(
        &self,
        kind: FragmentKind,
        name: &str,
    ) -> Result<Option<FragmentRef>, InventoryError> {
        if !is_valid_fragment_name(name) {
            return Ok(None);
        }

        let dir = self.layout.dir_for(kind);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(dir = %dir.display(), "fragment directory not found");
                return Ok(None);
            }
            Err(e) => {
                return Err(InventoryError::DirectoryUnreadable {
                    path: dir,
                    reason: e.to_string(),
                });
            }
        };

        let mut matches = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| InventoryError::DirectoryUnreadable {
                path: dir.clone(),
                reason: e.to_string(),
            })?;
            let file_name = entry.file_name();
            if file_name.to_str().and_then(fragment_name) != Some(name) {
                continue;
            }

            let path = entry.path();
            match fs::metadata(&path) {
                Ok(metadata) if metadata.is_file() => {
                    matches.push(FragmentRef::new(kind, name, path));
                }
                Ok(_) => {
                    debug!(path = %path.display(), "skipping entry that is not a regular file");
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!(path = %path.display(), "skipping dangling fragment link");
                }
                Err(e) => {
                    return Err(InventoryError::FragmentUnreadable {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        matches.sort_by(|a, b| a.location.cmp(&b.location));
        ensure_unique(&matches)?;
        if matches.is_empty() {
            debug!(dir = %dir.display(), %name, "fragment not found");
        }
        Ok(matches.into_iter().next())
    }

    fn read(&self, fragment: &FragmentRef) -> Result<String, InventoryError> {
        trace!(path = %fragment.location.display(), "reading fragment");
        fs::read_to_string(&fragment.location).map_err(|e| InventoryError::FragmentUnreadable {
            path: fragment.location.clone(),
            reason: e.to_string(),
        })
    }
}
