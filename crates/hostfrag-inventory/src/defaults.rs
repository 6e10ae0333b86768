//! Baseline ("all") group variables

use tracing::{debug, instrument};

use crate::error::InventoryError;
use crate::store::{FragmentKind, FragmentStore, load};
use crate::types::{GroupFragment, Vars};

/// Name of the group whose vars seed every other group
pub const BASELINE_GROUP: &str = "all";

/// Load the baseline group's variables
///
/// A missing baseline fragment means "no defaults" and yields an empty map.
/// The baseline's `hosts` list is ignored.
///
/// # Errors
/// Returns an error if the fragment exists but cannot be read or parsed.
#[instrument(skip(store), level = "debug")]
pub fn load_default_vars<S>(store: &S) -> Result<Vars, InventoryError>
where
    S: FragmentStore + ?Sized,
{
    let Some(fragment) = store.locate(FragmentKind::Group, BASELINE_GROUP)? else {
        debug!("no baseline group fragment, using empty defaults");
        return Ok(Vars::new());
    };

    let baseline: GroupFragment = load(store, &fragment)?;
    let (_, vars) = baseline.into_parts();
    debug!(count = vars.len(), "loaded baseline vars");
    Ok(vars)
}
