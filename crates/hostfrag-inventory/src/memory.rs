//! In-memory fragment store

use std::collections::HashSet;
use std::path::PathBuf;

use crate::error::InventoryError;
use crate::store::{FRAGMENT_EXTENSION, FragmentKind, FragmentRef, FragmentStore, ensure_unique};

/// Fragment store holding fragment text in memory
///
/// Useful for assembling inventories from generated data and for tests.
/// Fragments are addressed by a synthetic `groups/<name>.json` or
/// `hosts/<name>.json` location unless one is given explicitly.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    fragments: Vec<(FragmentRef, String)>,
    unlisted: HashSet<FragmentKind>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a group fragment
    #[must_use]
    pub fn with_group(self, name: &str, text: impl Into<String>) -> Self {
        let location = default_location(FragmentKind::Group, name);
        self.with_fragment(FragmentKind::Group, name, location, text)
    }

    /// Add a host fragment
    #[must_use]
    pub fn with_host(self, name: &str, text: impl Into<String>) -> Self {
        let location = default_location(FragmentKind::Host, name);
        self.with_fragment(FragmentKind::Host, name, location, text)
    }

    /// Add a fragment at an explicit location
    #[must_use]
    pub fn with_fragment(
        mut self,
        kind: FragmentKind,
        name: &str,
        location: impl Into<PathBuf>,
        text: impl Into<String>,
    ) -> Self {
        self.fragments
            .push((FragmentRef::new(kind, name, location), text.into()));
        self
    }

    /// Make listing a fragment kind fail, as if its directory were missing
    #[must_use]
    pub fn without_listing(mut self, kind: FragmentKind) -> Self {
        self.unlisted.insert(kind);
        self
    }
}

fn default_location(kind: FragmentKind, name: &str) -> PathBuf {
    let dir = match kind {
        FragmentKind::Group => "groups",
        FragmentKind::Host => "hosts",
    };
    PathBuf::from(dir).join(format!("{name}.{FRAGMENT_EXTENSION}"))
}

impl FragmentStore for MemoryStore {
    fn list(&self, kind: FragmentKind) -> Result<Vec<FragmentRef>, InventoryError> {
        if self.unlisted.contains(&kind) {
            return Err(InventoryError::DirectoryUnreadable {
                path: PathBuf::from(format!("{kind}s")),
                reason: "listing disabled".to_string(),
            });
        }

        let mut refs: Vec<FragmentRef> = self
            .fragments
            .iter()
            .filter(|(fragment, _)| fragment.kind == kind)
            .map(|(fragment, _)| fragment.clone())
            .collect();
        refs.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.location.cmp(&b.location)));
        Ok(refs)
    }

    fn locate(
        &self,
        kind: FragmentKind,
        name: &str,
    ) -> Result<Option<FragmentRef>, InventoryError> {
        let mut matches: Vec<FragmentRef> = self
            .fragments
            .iter()
            .filter(|(fragment, _)| fragment.kind == kind && fragment.name == name)
            .map(|(fragment, _)| fragment.clone())
            .collect();
        matches.sort_by(|a, b| a.location.cmp(&b.location));
        ensure_unique(&matches)?;
        Ok(matches.into_iter().next())
    }

    fn read(&self, fragment: &FragmentRef) -> Result<String, InventoryError> {
        self.fragments
            .iter()
            .find(|(stored, _)| stored == fragment)
            .map(|(_, text)| text.clone())
            .ok_or_else(|| InventoryError::FragmentUnreadable {
                path: fragment.location.clone(),
                reason: "no such fragment".to_string(),
            })
    }
}
