//! Group assembly
//!
//! Every group fragment except the baseline becomes one inventory group whose
//! vars are the baseline vars overlaid with the group's own.

use std::collections::BTreeMap;

use tracing::{debug, instrument, trace};

use crate::defaults::BASELINE_GROUP;
use crate::error::InventoryError;
use crate::store::{FragmentKind, FragmentStore, ensure_unique, load};
use crate::types::{GroupEntry, GroupFragment, META_KEY, Vars};

/// Overlay group-local vars onto a copy of the baseline
///
/// Keys present in `local` replace the baseline value; values are replaced
/// whole, nested objects are not merged.
#[must_use]
pub fn merge_vars(defaults: &Vars, local: Vars) -> Vars {
    let mut merged = defaults.clone();
    merged.extend(local);
    merged
}

/// Assemble every non-baseline group
///
/// # Errors
/// Fails on the first fragment that cannot be read or parsed, on two fragments
/// deriving the same group name, and on a group named `_meta`.
#[instrument(skip(store, defaults), level = "debug")]
pub fn assemble_groups<S>(
    store: &S,
    defaults: &Vars,
) -> Result<BTreeMap<String, GroupEntry>, InventoryError>
where
    S: FragmentStore + ?Sized,
{
    let fragments = store.list(FragmentKind::Group)?;
    ensure_unique(&fragments)?;

    let mut groups = BTreeMap::new();
    for fragment in fragments {
        if fragment.name == BASELINE_GROUP {
            trace!("skipping baseline group");
            continue;
        }
        if fragment.name == META_KEY {
            return Err(InventoryError::ReservedName(fragment.name));
        }

        let parsed: GroupFragment = load(store, &fragment)?;
        let (hosts, local) = parsed.into_parts();
        let vars = merge_vars(defaults, local);

        debug!(
            group = %fragment.name,
            hosts = hosts.len(),
            vars = vars.len(),
            "assembled group"
        );
        groups.insert(fragment.name, GroupEntry { hosts, vars });
    }

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use serde_json::json;

    fn vars(value: serde_json::Value) -> Vars {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn test_merge_group_wins() {
        let merged = merge_vars(&vars(json!({"a": 0, "b": 2})), vars(json!({"a": 1})));
        assert_eq!(json!(merged), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_merge_replaces_nested_values_whole() {
        let defaults = vars(json!({"ssh": {"port": 22, "user": "root"}}));
        let merged = merge_vars(&defaults, vars(json!({"ssh": {"port": 2222}})));
        assert_eq!(json!(merged), json!({"ssh": {"port": 2222}}));
        // baseline untouched
        assert_eq!(defaults["ssh"]["user"], json!("root"));
    }

    #[test]
    fn test_merge_keeps_null_override() {
        let merged = merge_vars(&vars(json!({"proxy": "squid"})), vars(json!({"proxy": null})));
        assert_eq!(json!(merged), json!({"proxy": null}));
    }

    #[test]
    fn test_assemble_skips_baseline() {
        let store = MemoryStore::new()
            .with_group("all", r#"{"hosts": ["x"], "vars": {"a": 0}}"#)
            .with_group("web", r#"{"hosts": ["web1", "web2"], "vars": {"b": 1}}"#);
        let defaults = vars(json!({"a": 0}));

        let groups = assemble_groups(&store, &defaults).unwrap();
        assert_eq!(groups.len(), 1);
        let web = &groups["web"];
        assert_eq!(web.hosts, vec!["web1", "web2"]);
        assert_eq!(json!(web.vars), json!({"a": 0, "b": 1}));
    }

    #[test]
    fn test_assemble_group_without_anything() {
        let store = MemoryStore::new().with_group("empty", "{}");
        let groups = assemble_groups(&store, &Vars::new()).unwrap();
        assert_eq!(json!(groups["empty"]), json!({"hosts": []}));
    }

    #[test]
    fn test_assemble_defaults_reach_groups_without_vars() {
        let store = MemoryStore::new().with_group("db", r#"{"hosts": ["db1"]}"#);
        let groups = assemble_groups(&store, &vars(json!({"env": "prod"}))).unwrap();
        assert_eq!(json!(groups["db"].vars), json!({"env": "prod"}));
    }

    #[test]
    fn test_assemble_malformed_group_is_fatal() {
        let store = MemoryStore::new()
            .with_group("good", "{}")
            .with_group("bad", "{not json");
        let err = assemble_groups(&store, &Vars::new()).unwrap_err();
        assert_eq!(err.path(), Some(std::path::Path::new("groups/bad.json")));
    }

    #[test]
    fn test_assemble_duplicate_names() {
        let store = MemoryStore::new()
            .with_fragment(FragmentKind::Group, "web", "groups/web.JSON", "{}")
            .with_fragment(FragmentKind::Group, "web", "groups/web.json", "{}");
        let err = assemble_groups(&store, &Vars::new()).unwrap_err();
        assert!(matches!(
            err,
            InventoryError::DuplicateFragment { ref name, .. } if name == "web"
        ));
    }

    #[test]
    fn test_assemble_reserved_name() {
        let store = MemoryStore::new().with_group("_meta", "{}");
        let err = assemble_groups(&store, &Vars::new()).unwrap_err();
        assert!(matches!(err, InventoryError::ReservedName(_)));
    }
}
