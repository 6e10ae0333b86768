//! Host variable resolution
//!
//! Host vars are returned exactly as declared; group vars never flow into them.

use std::collections::BTreeMap;

use tracing::{debug, instrument, warn};

use crate::error::InventoryError;
use crate::store::{
    FragmentKind, FragmentRef, FragmentStore, ensure_unique, is_valid_fragment_name, load,
};
use crate::types::{HostFragment, Vars};

/// Load the vars of one located host fragment
///
/// # Errors
/// Returns an error if the fragment cannot be read or parsed.
pub fn host_vars<S>(store: &S, fragment: &FragmentRef) -> Result<Vars, InventoryError>
where
    S: FragmentStore + ?Sized,
{
    let parsed: HostFragment = load(store, fragment)?;
    Ok(parsed.into_vars())
}

/// Resolve a single host by name
///
/// An unknown host, or a name that cannot denote a fragment, yields an empty
/// map.
///
/// # Errors
/// Returns an error if the host fragment exists but cannot be read or parsed.
#[instrument(skip(store), level = "debug")]
pub fn resolve_host<S>(store: &S, name: &str) -> Result<Vars, InventoryError>
where
    S: FragmentStore + ?Sized,
{
    if !is_valid_fragment_name(name) {
        warn!(host = %name, "host name cannot refer to a fragment");
        return Ok(Vars::new());
    }

    match store.locate(FragmentKind::Host, name)? {
        Some(fragment) => host_vars(store, &fragment),
        None => {
            debug!(host = %name, "unknown host");
            Ok(Vars::new())
        }
    }
}

/// Build the `hostvars` block from every host fragment
///
/// Hosts with no vars are left out.
///
/// # Errors
/// Fails if the host listing cannot be read, if any listed fragment cannot be
/// read or parsed, or if two fragments derive the same host name.
#[instrument(skip(store), level = "debug")]
pub fn collect_hostvars<S>(store: &S) -> Result<BTreeMap<String, Vars>, InventoryError>
where
    S: FragmentStore + ?Sized,
{
    let fragments = store.list(FragmentKind::Host)?;
    ensure_unique(&fragments)?;

    let mut hostvars = BTreeMap::new();
    for fragment in fragments {
        let vars = host_vars(store, &fragment)?;
        if vars.is_empty() {
            debug!(host = %fragment.name, "host declares no vars");
            continue;
        }
        hostvars.insert(fragment.name, vars);
    }

    Ok(hostvars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use serde_json::json;

    #[test]
    fn test_resolve_known_host() {
        let store = MemoryStore::new().with_host("web1", r#"{"vars": {"role": "web"}}"#);
        assert_eq!(json!(resolve_host(&store, "web1").unwrap()), json!({"role": "web"}));
    }

    #[test]
    fn test_resolve_unknown_host() {
        let store = MemoryStore::new();
        assert!(resolve_host(&store, "ghost").unwrap().is_empty());
    }

    #[test]
    fn test_resolve_invalid_name() {
        let store = MemoryStore::new().with_host("web1", r#"{"vars": {"a": 1}}"#);
        assert!(resolve_host(&store, "../hosts/web1").unwrap().is_empty());
        assert!(resolve_host(&store, "").unwrap().is_empty());
    }

    #[test]
    fn test_resolve_malformed_is_fatal() {
        let store = MemoryStore::new().with_host("web1", r#"{"vars": 1}"#);
        assert!(resolve_host(&store, "web1").is_err());
    }

    #[test]
    fn test_collect_skips_empty_hosts() {
        let store = MemoryStore::new()
            .with_host("a", r#"{"vars": {"x": 1}}"#)
            .with_host("b", "{}")
            .with_host("c", r#"{"vars": {}}"#)
            .with_host("d", r#"{"vars": null}"#);
        let hostvars = collect_hostvars(&store).unwrap();
        assert_eq!(hostvars.keys().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_collect_missing_listing_is_fatal() {
        let store = MemoryStore::new().without_listing(FragmentKind::Host);
        let err = collect_hostvars(&store).unwrap_err();
        assert!(matches!(err, InventoryError::DirectoryUnreadable { .. }));
    }

    #[test]
    fn test_collect_duplicate_hosts() {
        let store = MemoryStore::new()
            .with_fragment(FragmentKind::Host, "h", "hosts/h.json", "{}")
            .with_fragment(FragmentKind::Host, "h", "hosts/h.Json", "{}");
        assert!(matches!(
            collect_hostvars(&store).unwrap_err(),
            InventoryError::DuplicateFragment { kind: FragmentKind::Host, .. }
        ));
    }

    #[test]
    fn test_resolve_duplicate_hosts() {
        let store = MemoryStore::new()
            .with_fragment(FragmentKind::Host, "h", "hosts/h.json", r#"{"vars": {"v": 1}}"#)
            .with_fragment(FragmentKind::Host, "h", "hosts/h.JSON", r#"{"vars": {"v": 2}}"#);
        assert!(matches!(
            resolve_host(&store, "h").unwrap_err(),
            InventoryError::DuplicateFragment { kind: FragmentKind::Host, .. }
        ));
    }
}
