//! Fragment store abstraction

use std::fmt;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::InventoryError;

/// File extension that marks a fragment
pub const FRAGMENT_EXTENSION: &str = "json";

/// Kind of fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    /// Group definition (`hosts` + `vars`)
    Group,
    /// Host definition (`vars`)
    Host,
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FragmentKind::Group => write!(f, "group"),
            FragmentKind::Host => write!(f, "host"),
        }
    }
}

/// Handle to one fragment in a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentRef {
    /// Group or host
    pub kind: FragmentKind,
    /// Name derived from the fragment's file name
    pub name: String,
    /// Where the fragment lives, used for reading and error reporting
    pub location: PathBuf,
}

impl FragmentRef {
    /// Create a fragment handle
    pub fn new(kind: FragmentKind, name: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            name: name.into(),
            location: location.into(),
        }
    }

    /// Parse fragment text into `T`
    ///
    /// The top-level value must be a JSON object.
    ///
    /// # Errors
    /// Returns [`InventoryError::MalformedFragment`] if the text is not JSON or
    /// does not have the expected shape.
    pub fn parse<T: DeserializeOwned>(&self, text: &str) -> Result<T, InventoryError> {
        let malformed = |reason: String| InventoryError::MalformedFragment {
            path: self.location.clone(),
            reason,
        };
        let value: Value = serde_json::from_str(text).map_err(|e| malformed(e.to_string()))?;
        if !value.is_object() {
            return Err(malformed(format!(
                "expected a JSON object, found {}",
                json_type_name(&value)
            )));
        }
        serde_json::from_value(value).map_err(|e| malformed(e.to_string()))
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Source of group and host fragments
///
/// Implementations must be deterministic: `list` returns fragments sorted by
/// name so that assembly does not depend on directory iteration order.
pub trait FragmentStore {
    /// List every fragment of a kind
    ///
    /// # Errors
    /// Returns an error if the underlying location cannot be enumerated.
    fn list(&self, kind: FragmentKind) -> Result<Vec<FragmentRef>, InventoryError>;

    /// Find a fragment by derived name
    ///
    /// Returns `Ok(None)` when no such fragment exists.
    ///
    /// # Errors
    /// Returns an error if existence cannot be determined.
    fn locate(&self, kind: FragmentKind, name: &str) -> Result<Option<FragmentRef>, InventoryError>;

    /// Read a fragment's text
    ///
    /// # Errors
    /// Returns [`InventoryError::FragmentUnreadable`] if the fragment cannot be read.
    fn read(&self, fragment: &FragmentRef) -> Result<String, InventoryError>;
}

/// Read and parse a fragment from a store
///
/// # Errors
/// Propagates read and parse failures.
pub fn load<S, T>(store: &S, fragment: &FragmentRef) -> Result<T, InventoryError>
where
    S: FragmentStore + ?Sized,
    T: DeserializeOwned,
{
    let text = store.read(fragment)?;
    fragment.parse(&text)
}

/// Reject listings in which two fragments derive the same name
///
/// Expects `fragments` sorted by name, as [`FragmentStore::list`] returns them.
///
/// # Errors
/// Returns [`InventoryError::DuplicateFragment`] for the first collision.
pub fn ensure_unique(fragments: &[FragmentRef]) -> Result<(), InventoryError> {
    match fragments.windows(2).find(|pair| pair[0].name == pair[1].name) {
        Some([first, second]) => Err(InventoryError::DuplicateFragment {
            kind: second.kind,
            name: second.name.clone(),
            first: first.location.clone(),
            second: second.location.clone(),
        }),
        _ => Ok(()),
    }
}

/// Strip the fragment extension from a file name
///
/// The extension is matched ASCII case-insensitively. Returns `None` for names
/// that are not fragments, including a bare `.json`.
#[must_use]
pub fn fragment_name(file_name: &str) -> Option<&str> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || !ext.eq_ignore_ascii_case(FRAGMENT_EXTENSION) {
        return None;
    }
    Some(stem)
}

/// Check whether a requested name can refer to a fragment at all
#[must_use]
pub fn is_valid_fragment_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains('\0')
}
