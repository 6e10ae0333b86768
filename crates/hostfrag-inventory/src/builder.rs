//! High-level inventory API

use serde::Serialize;
use tracing::{info, instrument};

use crate::assembler::assemble_groups;
use crate::defaults::load_default_vars;
use crate::error::InventoryError;
use crate::hostvars::{collect_hostvars, resolve_host};
use crate::store::FragmentStore;
use crate::types::{Inventory, Meta, Vars};

/// What the caller wants printed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Every group plus the `_meta.hostvars` block
    List,
    /// Variables of one host
    Host(String),
}

/// Inventory builder
///
/// Each call recomputes everything from the store; nothing is cached.
#[derive(Debug, Clone)]
pub struct InventoryBuilder<S> {
    store: S,
}

impl<S: FragmentStore> InventoryBuilder<S> {
    /// Create a builder reading from `store`
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying fragment store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Assemble the full inventory
    ///
    /// # Errors
    /// Returns the first fatal error from loading the baseline, assembling
    /// groups, or collecting host vars.
    #[instrument(skip(self))]
    pub fn build(&self) -> Result<Inventory, InventoryError> {
        let defaults = load_default_vars(&self.store)?;
        let groups = assemble_groups(&self.store, &defaults)?;
        let hostvars = collect_hostvars(&self.store)?;

        info!(
            groups = groups.len(),
            hosts_with_vars = hostvars.len(),
            "assembled inventory"
        );
        Ok(Inventory {
            groups,
            meta: Meta { hostvars },
        })
    }

    /// Vars of a single host, empty if the host is unknown
    ///
    /// # Errors
    /// Returns an error if the host fragment exists but is unreadable or malformed.
    pub fn host(&self, name: &str) -> Result<Vars, InventoryError> {
        resolve_host(&self.store, name)
    }

    /// Answer a query with the text to print
    ///
    /// The full inventory has no trailing newline; host output ends with one.
    ///
    /// # Errors
    /// Propagates assembly and serialization failures. Nothing is returned on
    /// failure, so callers never see a partial document.
    pub fn answer(&self, query: &Query) -> Result<String, InventoryError> {
        match query {
            Query::List => to_pretty_json(&self.build()?),
            Query::Host(name) => {
                let mut out = to_pretty_json(&self.host(name)?)?;
                out.push('\n');
                Ok(out)
            }
        }
    }
}

/// Serialize with two-space indentation
///
/// # Errors
/// Returns [`InventoryError::Render`] if serialization fails.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, InventoryError> {
    serde_json::to_string_pretty(value).map_err(|e| InventoryError::Render(e.to_string()))
}
