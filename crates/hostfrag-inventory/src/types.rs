//! Fragment and inventory type definitions

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Variable mapping attached to a group or host
///
/// Keys iterate in lexicographic order, which keeps rendered output stable.
pub type Vars = Map<String, Value>;

/// Key of the meta block in the full inventory
pub const META_KEY: &str = "_meta";

// ============================================================================
// Source fragments
// ============================================================================

/// Contents of one group fragment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupFragment {
    /// Member host names, in declaration order
    #[serde(default)]
    pub hosts: Option<Vec<String>>,
    /// Group-local variables
    #[serde(default)]
    pub vars: Option<Vars>,
}

impl GroupFragment {
    /// Split into host list and variables, treating absent keys as empty
    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Vars) {
        (self.hosts.unwrap_or_default(), self.vars.unwrap_or_default())
    }
}

/// Contents of one host fragment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostFragment {
    /// Host variables
    #[serde(default)]
    pub vars: Option<Vars>,
}

impl HostFragment {
    /// Host variables, empty if the fragment declares none
    #[must_use]
    pub fn into_vars(self) -> Vars {
        self.vars.unwrap_or_default()
    }
}

// ============================================================================
// Output
// ============================================================================

/// One group as it appears in the inventory
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupEntry {
    /// Member host names
    pub hosts: Vec<String>,
    /// Baseline vars overlaid with group-local vars
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub vars: Vars,
}

/// The `_meta` block
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Meta {
    /// Variables of every host that declares at least one
    pub hostvars: BTreeMap<String, Vars>,
}

/// Full inventory document
///
/// Serializes as a single object holding every group by name plus the
/// [`META_KEY`] entry, all keys in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    /// Groups keyed by derived name
    pub groups: BTreeMap<String, GroupEntry>,
    /// Host variable block
    pub meta: Meta,
}

impl Inventory {
    /// Look up a group by name
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&GroupEntry> {
        self.groups.get(name)
    }

    /// Variables recorded for a host in the meta block
    #[must_use]
    pub fn hostvars(&self, name: &str) -> Option<&Vars> {
        self.meta.hostvars.get(name)
    }
}

impl Serialize for Inventory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len() + 1))?;
        let mut meta_written = false;
        for (name, group) in &self.groups {
            if !meta_written && name.as_str() > META_KEY {
                map.serialize_entry(META_KEY, &self.meta)?;
                meta_written = true;
            }
            map.serialize_entry(name, group)?;
        }
        if !meta_written {
            map.serialize_entry(META_KEY, &self.meta)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_group_fragment_defaults() {
        let fragment: GroupFragment = serde_json::from_str("{}").unwrap();
        assert_eq!(fragment.into_parts(), (Vec::new(), Vars::new()));

        let fragment: GroupFragment =
            serde_json::from_str(r#"{"hosts": null, "vars": null}"#).unwrap();
        assert_eq!(fragment.into_parts(), (Vec::new(), Vars::new()));
    }

    #[test]
    fn test_group_fragment_keeps_duplicate_hosts() {
        let fragment: GroupFragment =
            serde_json::from_str(r#"{"hosts": ["b", "a", "b"], "extra": true}"#).unwrap();
        let (hosts, vars) = fragment.into_parts();
        assert_eq!(hosts, vec!["b", "a", "b"]);
        assert!(vars.is_empty());
    }

    #[test]
    fn test_fragment_shape_errors() {
        assert!(serde_json::from_str::<GroupFragment>(r#"{"hosts": [1]}"#).is_err());
        assert!(serde_json::from_str::<GroupFragment>(r#"{"vars": []}"#).is_err());
        assert!(serde_json::from_str::<HostFragment>(r#"["vars"]"#).is_err());
    }

    #[test]
    fn test_group_entry_omits_empty_vars() {
        let entry = GroupEntry {
            hosts: vec!["web1".to_string()],
            vars: Vars::new(),
        };
        assert_eq!(serde_json::to_value(&entry).unwrap(), json!({"hosts": ["web1"]}));
    }

    #[test]
    fn test_meta_key_sorted_among_groups() {
        let mut inventory = Inventory::default();
        for name in ["Zeta", "alpha", "web"] {
            inventory.groups.insert(name.to_string(), GroupEntry::default());
        }
        let rendered = serde_json::to_string(&inventory).unwrap();
        let zeta = rendered.find("\"Zeta\"").unwrap();
        let meta = rendered.find("\"_meta\"").unwrap();
        let alpha = rendered.find("\"alpha\"").unwrap();
        assert!(zeta < meta && meta < alpha);
    }

    #[test]
    fn test_empty_inventory_has_meta() {
        let rendered = serde_json::to_value(Inventory::default()).unwrap();
        assert_eq!(rendered, json!({"_meta": {"hostvars": {}}}));
    }
}
